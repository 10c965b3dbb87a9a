//! Per-platform configuration and its validation

use super::credential::Credential;
use super::platform::{AdapterFamily, Platform};
use super::timeouts::TimeoutConfig;
use crate::error::{GateError, GateResult};
use serde::Deserialize;
use std::collections::BTreeMap;

const DEFAULT_MAX_TOKENS: u32 = 4096;
const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_MAX_RETRIES: u32 = 3;

/// A platform section exactly as written in the config file.
///
/// Legacy key spellings (`OPENAI_KEYS_BASES`, `OPENAI_MAX_TOKENS`, ...) are
/// accepted as aliases.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub(crate) struct RawSection {
    #[serde(default, alias = "OPENAI_KEYS_BASES")]
    pub keys_bases: Vec<RawCredential>,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    #[serde(default)]
    pub models: BTreeMap<String, String>,
    #[serde(alias = "OPENAI_MAX_TOKENS")]
    pub max_tokens: Option<u32>,
    #[serde(alias = "OPENAI_TEMPERATURE")]
    pub temperature: Option<f32>,
    pub max_retries: Option<u32>,
    pub allow_any_model: Option<bool>,
    pub connect_timeout_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawCredential {
    #[serde(rename = "KEY", alias = "OPENAI_KEY", alias = "API_KEY")]
    pub key: String,
    #[serde(rename = "BASE", alias = "OPENAI_BASE", alias = "BASE_URL", default)]
    pub base: Option<String>,
}

/// Validated configuration for one platform.
///
/// Built once when an adapter is constructed and never mutated afterwards.
/// `credentials` is guaranteed non-empty.
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformConfig {
    pub platform: Platform,
    pub credentials: Vec<Credential>,
    /// Model name → model id, endpoint id, or endpoint URL
    pub models: BTreeMap<String, String>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub max_retries: u32,
    pub allow_any_model: bool,
    pub timeouts: TimeoutConfig,
}

impl PlatformConfig {
    /// Create a config with default tunables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigIncomplete` when `credentials` is empty.
    pub fn new(platform: Platform, credentials: Vec<Credential>) -> GateResult<Self> {
        if credentials.is_empty() {
            return Err(GateError::config_incomplete(
                platform.name(),
                "no credentials configured",
            ));
        }

        Ok(Self {
            platform,
            credentials,
            models: BTreeMap::new(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            max_retries: DEFAULT_MAX_RETRIES,
            allow_any_model: platform.default_allow_any_model(),
            timeouts: TimeoutConfig::default(),
        })
    }

    /// Add a model alias
    pub fn with_model(mut self, name: impl Into<String>, target: impl Into<String>) -> Self {
        self.models.insert(name.into(), target.into());
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_allow_any_model(mut self, allow: bool) -> Self {
        self.allow_any_model = allow;
        self
    }

    pub fn with_timeouts(mut self, timeouts: TimeoutConfig) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Validate a raw section read from `source`
    pub(crate) fn from_section(
        platform: Platform,
        raw: RawSection,
        source: &str,
    ) -> GateResult<Self> {
        let section_base = raw
            .base_url
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty());

        let pairs: Vec<(String, Option<String>)> = if !raw.keys_bases.is_empty() {
            raw.keys_bases
                .into_iter()
                .map(|c| (c.key, c.base))
                .collect()
        } else if let Some(key) = raw.api_key {
            vec![(key, None)]
        } else {
            Vec::new()
        };

        if pairs.is_empty() {
            return Err(GateError::config_incomplete(
                platform.name(),
                format!(
                    "no credentials configured (set KEYS_BASES or API_KEY in {})",
                    platform.config_key()
                ),
            ));
        }

        let mut credentials = Vec::with_capacity(pairs.len());
        for (index, (key, base)) in pairs.into_iter().enumerate() {
            if key.trim().is_empty() {
                return Err(GateError::config_incomplete(
                    platform.name(),
                    format!("credential #{} has an empty key", index + 1),
                ));
            }

            let base = base
                .as_deref()
                .map(str::trim)
                .filter(|b| !b.is_empty())
                .or(section_base)
                .or(platform.default_base_url());

            let base = match (base, platform.family()) {
                (Some(base), _) => base.to_string(),
                // REST endpoints usually come from MODELS as absolute URLs.
                (None, AdapterFamily::Rest) => String::new(),
                (None, _) => {
                    return Err(GateError::config_incomplete(
                        platform.name(),
                        format!("credential #{} has no base URL and BASE_URL is not set", index + 1),
                    ));
                }
            };

            credentials.push(Credential::new(key.trim(), base));
        }

        let mut config = Self::new(platform, credentials)?;
        config.models = raw.models;
        if let Some(max_tokens) = raw.max_tokens {
            config.max_tokens = max_tokens;
        }
        if let Some(temperature) = raw.temperature {
            config.temperature = temperature;
        }
        if let Some(max_retries) = raw.max_retries {
            config.max_retries = max_retries;
        }
        if let Some(allow) = raw.allow_any_model {
            config.allow_any_model = allow;
        }
        if let Some(secs) = raw.connect_timeout_secs {
            config.timeouts.connection_timeout_secs = secs;
        }
        if let Some(secs) = raw.request_timeout_secs {
            config.timeouts.request_timeout_secs = secs;
        }

        config
            .validate()
            .map_err(|message| GateError::config_malformed(source, message))?;

        Ok(config)
    }

    /// Check tunables for values no backend would accept
    pub fn validate(&self) -> Result<(), String> {
        let section = self.platform.config_key();
        if self.max_retries == 0 {
            return Err(format!("{section}.MAX_RETRIES must be at least 1"));
        }
        if self.max_tokens == 0 {
            return Err(format!("{section}.MAX_TOKENS must be greater than 0"));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!(
                "{section}.TEMPERATURE must be between 0.0 and 2.0, got {}",
                self.temperature
            ));
        }
        self.timeouts
            .validate()
            .map_err(|e| format!("{section}: {e}"))
    }

    /// Configured model names in sorted order
    pub fn model_names(&self) -> Vec<String> {
        self.models.keys().cloned().collect()
    }

    /// Resolve a caller-facing model name to the id sent to the backend.
    ///
    /// # Errors
    ///
    /// Returns `ModelNotConfigured` when the name is absent from the model
    /// map and `allow_any_model` is off.
    pub fn resolve_model(&self, model: &str) -> GateResult<String> {
        if let Some(target) = self.models.get(model) {
            return Ok(target.clone());
        }
        if self.allow_any_model {
            return Ok(model.to_string());
        }
        Err(GateError::model_not_configured(
            model,
            self.platform.name(),
            self.model_names(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> RawSection {
        serde_json::from_value(value).expect("section should deserialize")
    }

    #[test]
    fn legacy_openai_keys() {
        let section = raw(json!({
            "OPENAI_KEYS_BASES": [
                {"OPENAI_KEY": "k1", "OPENAI_BASE": "https://b1/v1"},
                {"OPENAI_KEY": "k2", "OPENAI_BASE": "https://b2/v1/"}
            ],
            "OPENAI_MAX_TOKENS": 2048,
            "OPENAI_TEMPERATURE": 0.2,
            "MAX_RETRIES": 5
        }));

        let config = PlatformConfig::from_section(Platform::OpenAi, section, "cfg.json").unwrap();
        assert_eq!(
            config.credentials,
            vec![Credential::new("k1", "https://b1/v1"), Credential::new("k2", "https://b2/v1")]
        );
        assert_eq!(config.max_tokens, 2048);
        assert_eq!(config.temperature, 0.2);
        assert_eq!(config.max_retries, 5);
        assert!(config.allow_any_model);
    }

    #[test]
    fn single_key_uses_platform_default_base() {
        let section = raw(json!({"API_KEY": "g-key", "MODELS": {"flash": "gemini-2.0-flash"}}));
        let config = PlatformConfig::from_section(Platform::Gemini, section, "cfg.json").unwrap();

        assert_eq!(config.credentials.len(), 1);
        assert_eq!(
            config.credentials[0].base_url,
            "https://generativelanguage.googleapis.com"
        );
        assert_eq!(config.max_tokens, DEFAULT_MAX_TOKENS);
        assert_eq!(config.max_retries, DEFAULT_MAX_RETRIES);
        assert!(!config.allow_any_model);
    }

    #[test]
    fn section_base_url_applies_to_single_key() {
        let section = raw(json!({"API_KEY": "v-key", "BASE_URL": "https://ark.example.com/api/v3"}));
        let config =
            PlatformConfig::from_section(Platform::Volcengine, section, "cfg.json").unwrap();
        assert_eq!(config.credentials[0].base_url, "https://ark.example.com/api/v3");
    }

    #[test]
    fn missing_credentials_is_incomplete() {
        let err = PlatformConfig::from_section(Platform::OpenAi, RawSection::default(), "cfg.json")
            .unwrap_err();
        assert!(matches!(err, GateError::ConfigIncomplete { .. }), "{err:?}");
    }

    #[test]
    fn image_platform_requires_base_url() {
        let section = raw(json!({"API_KEY": "d-key"}));
        let err =
            PlatformConfig::from_section(Platform::Deepbricks, section, "cfg.json").unwrap_err();
        assert!(matches!(err, GateError::ConfigIncomplete { .. }), "{err:?}");
    }

    #[test]
    fn rest_platform_tolerates_missing_base() {
        let section = raw(json!({
            "API_KEY": "i-key",
            "MODELS": {"qwen2.5-7b-instruct": "https://cloud.example.com/qwen/chat/completions"}
        }));
        let config =
            PlatformConfig::from_section(Platform::Infingence, section, "cfg.json").unwrap();
        assert_eq!(config.credentials[0].base_url, "");
    }

    #[test]
    fn zero_retries_is_malformed() {
        let section = raw(json!({"API_KEY": "k", "MAX_RETRIES": 0}));
        let err = PlatformConfig::from_section(Platform::OpenAi, section, "cfg.json").unwrap_err();
        match err {
            GateError::ConfigMalformed { path, message } => {
                assert_eq!(path, "cfg.json");
                assert!(message.contains("MAX_RETRIES"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_key_is_incomplete() {
        let section = raw(json!({"KEYS_BASES": [{"KEY": "  ", "BASE": "https://b"}]}));
        let err = PlatformConfig::from_section(Platform::OpenAi, section, "cfg.json").unwrap_err();
        assert!(matches!(err, GateError::ConfigIncomplete { .. }));
    }

    #[test]
    fn resolve_model_maps_aliases() {
        let config = PlatformConfig::new(
            Platform::Volcengine,
            vec![Credential::new("k", "https://ark")],
        )
        .unwrap()
        .with_model("deepseek-v3", "ep-20250101-abc")
        .with_allow_any_model(false);

        assert_eq!(config.resolve_model("deepseek-v3").unwrap(), "ep-20250101-abc");
    }

    #[test]
    fn resolve_unknown_model_lists_known_models() {
        let config = PlatformConfig::new(Platform::Gemini, vec![Credential::new("k", "https://g")])
            .unwrap()
            .with_model("b-model", "b")
            .with_model("a-model", "a");

        let err = config.resolve_model("c-model").unwrap_err();
        assert_eq!(
            err,
            GateError::model_not_configured(
                "c-model",
                "gemini",
                vec!["a-model".to_string(), "b-model".to_string()]
            )
        );
    }

    #[test]
    fn resolve_unknown_model_passes_through_when_allowed() {
        let config = PlatformConfig::new(Platform::Gemini, vec![Credential::new("k", "https://g")])
            .unwrap()
            .with_model("a-model", "a")
            .with_allow_any_model(true);

        assert_eq!(
            config.resolve_model("gemini-2.5-pro-exp").unwrap(),
            "gemini-2.5-pro-exp"
        );
    }

    #[test]
    fn new_rejects_empty_credentials() {
        let err = PlatformConfig::new(Platform::OpenAi, Vec::new()).unwrap_err();
        assert!(matches!(err, GateError::ConfigIncomplete { .. }));
    }
}
