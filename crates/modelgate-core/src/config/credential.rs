//! Credential pairs

use std::fmt;

/// An API key together with the base endpoint it authenticates against
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub key: String,
    pub base_url: String,
}

impl Credential {
    pub fn new(key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Display-safe version of the key
    pub fn masked_key(&self) -> String {
        mask_api_key(&self.key)
    }
}

// Keys must never reach logs through `{:?}`.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("key", &self.masked_key())
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Mask an API key for display, keeping the first and last four characters
pub fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    let len = chars.len();
    if len <= 12 {
        return "*".repeat(len);
    }

    let prefix: String = chars[..4].iter().collect();
    let suffix: String = chars[len - 4..].iter().collect();
    format!("{}{}...{}", prefix, "*".repeat((len - 8).min(8)), suffix)
}
