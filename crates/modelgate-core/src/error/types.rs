//! Core error types

use thiserror::Error;

/// Result type alias for modelgate operations
pub type GateResult<T> = Result<T, GateError>;

/// Main error type for modelgate
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GateError {
    /// The configuration source does not exist
    #[error("Configuration not found: {path}")]
    ConfigMissing { path: String },

    /// The configuration source could not be parsed, or a field has the wrong shape
    #[error("Malformed configuration in {path}: {message}")]
    ConfigMalformed { path: String, message: String },

    /// A required platform section or field is absent
    #[error("Incomplete configuration for '{platform}': {message}")]
    ConfigIncomplete { platform: String, message: String },

    /// The requested model is not in the platform's model map
    #[error(
        "Model '{model}' is not configured for platform '{platform}'. Available models: [{}]",
        .available.join(", ")
    )]
    ModelNotConfigured {
        model: String,
        platform: String,
        available: Vec<String>,
    },

    /// No adapter exists for the requested platform name
    #[error(
        "Unsupported platform: {platform}. Supported platforms: [{}]",
        .supported.join(", ")
    )]
    UnsupportedPlatform {
        platform: String,
        supported: Vec<String>,
    },

    /// Transport or HTTP-layer failure reported by a backend
    #[error(
        "{platform} API error (status {}): {body}",
        .status.map_or_else(|| "none".to_string(), |s| s.to_string())
    )]
    Backend {
        platform: String,
        status: Option<u16>,
        body: String,
    },

    /// The backend answered successfully but the payload was unusable
    #[error("Invalid response from {platform}: {message}")]
    InvalidResponse { platform: String, message: String },

    /// A stream failed after fragments were already delivered
    #[error("Stream from {platform} interrupted: {message}")]
    StreamInterrupted { platform: String, message: String },

    /// The adapter does not offer this operation
    #[error("Operation '{operation}' is not supported by platform '{platform}'")]
    Unsupported { platform: String, operation: String },

    /// The caller passed arguments the backend cannot accept
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    /// Local filesystem failure
    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<String>,
    },
}

/// Terminal outcome of a call whose attempts were used up.
///
/// Returned to the caller as a value so that a degraded answer and a
/// successful one can be handled the same way.
#[derive(Error, Debug, Clone, PartialEq)]
#[error(
    "An error occurred, and the request could not be completed after {attempts} retries. Error: {last_error}"
)]
pub struct RetryFailure {
    /// The error raised by the final attempt
    pub last_error: GateError,
    /// How many attempts were made
    pub attempts: u32,
}

impl RetryFailure {
    pub fn new(last_error: GateError, attempts: u32) -> Self {
        Self {
            last_error,
            attempts,
        }
    }
}
