//! Timeout configuration for backend requests

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default timeout values for asset downloads
pub mod download {
    use super::*;

    /// Timeout for fetching a generated image (30 seconds)
    pub const REQUEST_SECS: u64 = 30;

    /// Attempts made by the image downloader
    pub const MAX_ATTEMPTS: u32 = 3;

    pub fn request_timeout() -> Duration {
        Duration::from_secs(REQUEST_SECS)
    }
}

/// Timeout configuration for backend requests
///
/// - **Connection timeout**: time allowed to establish a connection
/// - **Request timeout**: time allowed for a complete request/response cycle.
///   For streaming calls it bounds each read instead, so a stream may run
///   as long as the backend keeps sending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeoutConfig {
    /// Connection timeout in seconds. Default: 30
    #[serde(default = "TimeoutConfig::default_connection_timeout")]
    pub connection_timeout_secs: u64,

    /// Request timeout in seconds. Default: 60
    #[serde(default = "TimeoutConfig::default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl TimeoutConfig {
    const fn default_connection_timeout() -> u64 {
        30
    }

    const fn default_request_timeout() -> u64 {
        60
    }

    pub fn new() -> Self {
        Self::default()
    }

    /// Set connection timeout in seconds
    pub fn with_connection_timeout_secs(mut self, secs: u64) -> Self {
        self.connection_timeout_secs = secs;
        self
    }

    /// Set request timeout in seconds
    pub fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    pub fn connection_timeout(&self) -> Duration {
        Duration::from_secs(self.connection_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate timeout configuration
    ///
    /// Returns an error if any timeout is zero or the request timeout is
    /// shorter than the connection timeout.
    pub fn validate(&self) -> Result<(), String> {
        if self.connection_timeout_secs == 0 {
            return Err("Connection timeout must be greater than 0".to_string());
        }
        if self.request_timeout_secs == 0 {
            return Err("Request timeout must be greater than 0".to_string());
        }
        if self.request_timeout_secs < self.connection_timeout_secs {
            return Err(
                "Request timeout must be greater than or equal to connection timeout".to_string(),
            );
        }
        Ok(())
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connection_timeout_secs: Self::default_connection_timeout(),
            request_timeout_secs: Self::default_request_timeout(),
        }
    }
}
