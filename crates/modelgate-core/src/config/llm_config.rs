//! The whole configuration document

use super::platform::Platform;
use super::platform_config::{PlatformConfig, RawSection};
use crate::error::{GateError, GateResult};
use serde_json::Value;
use std::collections::BTreeMap;

/// All platform sections loaded from one config source.
///
/// Sections are kept raw until a platform is requested, so a malformed
/// section only fails the platform that needs it.
#[derive(Debug, Clone, Default)]
pub struct LlmConfig {
    source: String,
    sections: BTreeMap<String, Value>,
}

impl LlmConfig {
    /// Create a config from already-parsed sections
    pub fn from_sections(source: impl Into<String>, sections: BTreeMap<String, Value>) -> Self {
        Self {
            source: source.into(),
            sections,
        }
    }

    /// Parse a JSON document of `"<PLATFORM>_CONFIG"` sections
    pub fn from_json_str(source: impl Into<String>, content: &str) -> GateResult<Self> {
        let source = source.into();
        let sections = serde_json::from_str(content)
            .map_err(|e| GateError::config_malformed(&source, format!("invalid JSON: {e}")))?;
        Ok(Self::from_sections(source, sections))
    }

    /// Where this config was read from
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Check if a section exists for `platform`
    pub fn has_platform(&self, platform: Platform) -> bool {
        self.sections.contains_key(&platform.config_key())
    }

    /// Platforms that have a section in this config
    pub fn configured_platforms(&self) -> Vec<Platform> {
        Platform::ALL
            .into_iter()
            .filter(|p| self.has_platform(*p))
            .collect()
    }

    /// Insert or replace a raw section
    pub fn set_section(&mut self, platform: Platform, section: Value) {
        self.sections.insert(platform.config_key(), section);
    }

    pub(crate) fn section_mut(&mut self, platform: Platform) -> Option<&mut Value> {
        self.sections.get_mut(&platform.config_key())
    }

    /// Validated configuration for one platform.
    ///
    /// # Errors
    ///
    /// - `ConfigIncomplete` if the section is absent or lacks credentials
    /// - `ConfigMalformed` if a field has the wrong type or an invalid value
    pub fn platform(&self, platform: Platform) -> GateResult<PlatformConfig> {
        let key = platform.config_key();
        let section = self.sections.get(&key).ok_or_else(|| {
            GateError::config_incomplete(
                platform.name(),
                format!("section {key} is missing from {}", self.source),
            )
        })?;

        let raw: RawSection = serde_json::from_value(section.clone())
            .map_err(|e| GateError::config_malformed(&self.source, format!("{key}: {e}")))?;

        PlatformConfig::from_section(platform, raw, &self.source)
    }
}
