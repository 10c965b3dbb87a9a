//! Environment variable credential overlay

use super::llm_config::LlmConfig;
use super::platform::Platform;
use serde_json::{Map, Value, json};
use std::collections::HashMap;
use tracing::debug;

impl LlmConfig {
    /// Fill credential gaps from `MODELGATE_<PLATFORM>_API_KEY` and
    /// `MODELGATE_<PLATFORM>_BASE_URL`.
    ///
    /// Credentials already present in a section always win. A platform with
    /// no section gets one built from the environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(std::env::vars())
    }

    /// Same as [`with_env_overrides`](Self::with_env_overrides) with an
    /// explicit variable set
    pub fn with_overrides_from<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: HashMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        for platform in Platform::ALL {
            let prefix = platform.env_prefix();
            let Some(key) = vars
                .get(&format!("{prefix}_API_KEY"))
                .filter(|k| !k.trim().is_empty())
            else {
                continue;
            };
            let base = vars
                .get(&format!("{prefix}_BASE_URL"))
                .filter(|b| !b.trim().is_empty());

            match self.section_mut(platform) {
                Some(Value::Object(section)) => {
                    if has_credentials(section) {
                        continue;
                    }
                    section.insert("API_KEY".to_string(), json!(key));
                    if let Some(base) = base {
                        section
                            .entry("BASE_URL".to_string())
                            .or_insert_with(|| json!(base));
                    }
                    debug!(platform = %platform, "credential supplied from environment");
                }
                // A non-object section is left alone so validation reports it.
                Some(_) => {}
                None => {
                    let mut section = Map::new();
                    section.insert("API_KEY".to_string(), json!(key));
                    if let Some(base) = base {
                        section.insert("BASE_URL".to_string(), json!(base));
                    }
                    self.set_section(platform, Value::Object(section));
                    debug!(platform = %platform, "section created from environment");
                }
            }
        }

        self
    }
}

fn has_credentials(section: &Map<String, Value>) -> bool {
    let has_list = ["KEYS_BASES", "OPENAI_KEYS_BASES"].iter().any(|k| {
        section
            .get(*k)
            .and_then(Value::as_array)
            .is_some_and(|list| !list.is_empty())
    });
    has_list || section.get("API_KEY").is_some_and(|k| !k.is_null())
}
