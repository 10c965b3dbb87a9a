//! Client construction

use super::retry::RetryPolicy;
use super::types::Client;
use crate::config::{LlmConfig, Platform, PlatformConfig, load_config};
use crate::error::GateResult;
use crate::llm::providers::AdapterInstance;
use std::path::Path;
use std::time::Duration;
use tracing::info;

impl Client {
    /// Build a client for `platform` and `model` from a loaded config.
    ///
    /// # Errors
    ///
    /// - `UnsupportedPlatform` if `platform` is not a known platform name
    /// - `ConfigIncomplete` / `ConfigMalformed` if its section is missing or invalid
    /// - `ModelNotConfigured` if `model` is not in the section's model map and
    ///   `ALLOW_ANY_MODEL` is off
    pub fn initialize(platform: &str, model: &str, config: &LlmConfig) -> GateResult<Self> {
        let platform: Platform = platform.parse()?;
        let platform_config = config.platform(platform)?;
        Self::from_platform_config(platform_config, model)
    }

    /// Load configuration from `source` and build a client
    pub fn from_source(platform: &str, model: &str, source: impl AsRef<Path>) -> GateResult<Self> {
        let config = load_config(source)?;
        Self::initialize(platform, model, &config)
    }

    /// Build a client from an already validated platform config
    pub fn from_platform_config(config: PlatformConfig, model: &str) -> GateResult<Self> {
        let platform = config.platform;
        let retry = RetryPolicy::new(config.max_retries);
        let credentials = config.credentials.len();
        let adapter = AdapterInstance::build(config, model)?;

        info!(
            platform = %platform,
            model = %model,
            credentials,
            max_retries = retry.max_retries,
            "client initialized"
        );

        Ok(Self {
            platform,
            model: model.to_string(),
            adapter,
            retry,
        })
    }

    /// Replace the retry policy
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Keep the configured attempt count but scale backoff by `unit`
    pub fn with_backoff_unit(mut self, unit: Duration) -> Self {
        self.retry = self.retry.with_backoff_unit(unit);
        self
    }
}
