//! File-based configuration loading

use super::llm_config::LlmConfig;
use crate::error::{GateError, GateResult};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File names searched, in order, when a directory is given
pub const CONFIG_FILE_NAMES: [&str; 4] = [
    "llm_config.json",
    "llm_config.toml",
    "llm_config.yaml",
    "llm_config.yml",
];

/// Load configuration from a file or a config directory.
///
/// A directory is searched for [`CONFIG_FILE_NAMES`]. A file is parsed by
/// extension: TOML, YAML, anything else as JSON.
///
/// # Errors
///
/// - `ConfigMissing` if the path (or every candidate in a directory) is absent
/// - `ConfigMalformed` if the file cannot be read or parsed
pub fn load_config(source: impl AsRef<Path>) -> GateResult<LlmConfig> {
    let path = resolve_config_path(source.as_ref())?;
    let shown = path.display().to_string();

    let content = fs::read_to_string(&path).map_err(|e| {
        GateError::config_malformed(&shown, format!("failed to read config file: {e}"))
    })?;

    let sections: BTreeMap<String, Value> = match path.extension().and_then(|s| s.to_str()) {
        Some("toml") => toml::from_str(&content).map_err(|e| {
            GateError::config_malformed(&shown, format!("failed to parse TOML config: {e}"))
        })?,
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content).map_err(|e| {
            GateError::config_malformed(&shown, format!("failed to parse YAML config: {e}"))
        })?,
        _ => serde_json::from_str(&content).map_err(|e| {
            GateError::config_malformed(&shown, format!("failed to parse JSON config: {e}"))
        })?,
    };

    debug!(
        path = %shown,
        sections = sections.len(),
        "loaded llm configuration"
    );

    Ok(LlmConfig::from_sections(shown, sections))
}

fn resolve_config_path(source: &Path) -> GateResult<PathBuf> {
    if source.is_dir() {
        return CONFIG_FILE_NAMES
            .iter()
            .map(|name| source.join(name))
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| GateError::config_missing(source.join(CONFIG_FILE_NAMES[0]).display().to_string()));
    }

    if source.is_file() {
        Ok(source.to_path_buf())
    } else {
        Err(GateError::config_missing(source.display().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Platform;
    use tempfile::TempDir;

    #[test]
    fn test_load_from_json_dir() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("llm_config.json"),
            r#"{
                "OPENAI_CONFIG": {
                    "OPENAI_KEYS_BASES": [{"OPENAI_KEY": "k1", "OPENAI_BASE": "https://b1/v1"}],
                    "MAX_RETRIES": 2
                }
            }"#,
        )
        .unwrap();

        let config = load_config(temp_dir.path()).unwrap();
        let openai = config.platform(Platform::OpenAi).unwrap();
        assert_eq!(openai.max_retries, 2);
        assert!(config.source().ends_with("llm_config.json"));
    }

    #[test]
    fn test_load_from_toml_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("gate.toml");
        fs::write(
            &path,
            r#"
[GEMINI_CONFIG]
API_KEY = "g-key"
TEMPERATURE = 0.3
ALLOW_ANY_MODEL = true

[GEMINI_CONFIG.MODELS]
"gemini-2.0-flash" = "gemini-2.0-flash"
"#,
        )
        .unwrap();

        let gemini = load_config(&path).unwrap().platform(Platform::Gemini).unwrap();
        assert_eq!(gemini.temperature, 0.3);
        assert!(gemini.allow_any_model);
        assert_eq!(gemini.model_names(), vec!["gemini-2.0-flash".to_string()]);
    }

    #[test]
    fn test_load_from_yaml_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("gate.yaml");
        fs::write(
            &path,
            r#"
DEEPBRICKS_CONFIG:
  API_KEY: d-key
  BASE_URL: https://api.deepbricks.example/v1
  MAX_RETRIES: 4
"#,
        )
        .unwrap();

        let image = load_config(&path).unwrap().platform(Platform::Deepbricks).unwrap();
        assert_eq!(image.max_retries, 4);
        assert_eq!(image.credentials[0].base_url, "https://api.deepbricks.example/v1");
    }

    #[test]
    fn test_load_from_nonexistent_file() {
        let err = load_config("/nonexistent/llm_config.json").unwrap_err();
        assert!(matches!(err, GateError::ConfigMissing { .. }));
    }

    #[test]
    fn test_load_from_empty_dir() {
        let temp_dir = TempDir::new().unwrap();
        let err = load_config(temp_dir.path()).unwrap_err();
        match err {
            GateError::ConfigMissing { path } => assert!(path.ends_with("llm_config.json")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_load_from_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("invalid.json");
        fs::write(&path, "{ invalid json }").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, GateError::ConfigMalformed { .. }));
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(std::sync::Arc<parking_lot::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_load_logs_source_path_at_debug() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("llm_config.json");
        fs::write(&path, r#"{"GEMINI_CONFIG": {"API_KEY": "g"}}"#).unwrap();

        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let config = tracing::subscriber::with_default(subscriber, || load_config(&path)).unwrap();
        assert!(config.has_platform(Platform::Gemini));

        let output = String::from_utf8(logs.0.lock().clone()).unwrap();
        assert!(output.contains("loaded llm configuration"), "{output}");
        assert!(output.contains(&path.display().to_string()), "{output}");
    }
}
