//! Client type definition

use super::retry::RetryPolicy;
use crate::config::Platform;
use crate::llm::providers::{AdapterInstance, BackendAdapter};
use std::fmt;

/// Client for one backend platform and model.
///
/// # Examples
///
/// ```no_run
/// use modelgate_core::{Client, Message, load_config};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config("config/")?.with_env_overrides();
/// let client = Client::initialize("gemini", "gemini-2.0-flash", &config)?;
///
/// let answer = client
///     .get_answer(&[Message::user("Summarize this project")], false)
///     .await;
/// println!("{}", answer.into_text().await);
/// # Ok(())
/// # }
/// ```
pub struct Client {
    pub(super) platform: Platform,
    pub(super) model: String,
    pub(super) adapter: AdapterInstance,
    pub(super) retry: RetryPolicy,
}

impl Client {
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Model name as given at initialization
    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Index of the credential the next request will use
    pub fn credential_index(&self) -> usize {
        self.adapter.rotator().index()
    }

    /// Number of configured credentials
    pub fn credential_count(&self) -> usize {
        self.adapter.rotator().len()
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("platform", &self.platform)
            .field("model", &self.model)
            .field("credential_index", &self.credential_index())
            .field("retry", &self.retry)
            .finish()
    }
}
