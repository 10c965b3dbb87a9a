//! `check` subcommand

use crate::console::CliConsole;
use anyhow::{Result, bail};
use modelgate_core::config::mask_api_key;
use modelgate_core::{LlmConfig, Platform, PlatformConfig};

pub fn run(config: &LlmConfig, only: Option<&str>, console: &CliConsole) -> Result<()> {
    let platforms = match only {
        Some(name) => vec![name.parse::<Platform>()?],
        None => config.configured_platforms(),
    };

    if platforms.is_empty() {
        console.warn(&format!("no platform sections found in {}", config.source()));
        return Ok(());
    }

    let mut failed = 0;
    for platform in platforms {
        match config.platform(platform) {
            Ok(platform_config) => print_platform(&platform_config, console),
            Err(e) => {
                failed += 1;
                console.print_header(platform.name());
                console.error(&e.to_string());
            }
        }
    }

    if failed > 0 {
        bail!("{failed} platform section(s) in {} are invalid", config.source());
    }
    console.success("configuration is valid");
    Ok(())
}

fn print_platform(config: &PlatformConfig, console: &CliConsole) {
    console.print_header(&format!("{} ({})", config.platform, config.platform.config_key()));

    for (index, credential) in config.credentials.iter().enumerate() {
        let base = if credential.base_url.is_empty() {
            "(per-model endpoints)"
        } else {
            credential.base_url.as_str()
        };
        console.field(
            &format!("key #{}", index + 1),
            &format!("{} @ {base}", mask_api_key(&credential.key)),
        );
    }

    let models = if config.models.is_empty() {
        "(none)".to_string()
    } else {
        config
            .models
            .iter()
            .map(|(name, target)| format!("{name} -> {target}"))
            .collect::<Vec<_>>()
            .join(", ")
    };
    console.field("models", &models);
    console.field("allow any model", &config.allow_any_model.to_string());
    console.field("max retries", &config.max_retries.to_string());
    console.field("max tokens", &config.max_tokens.to_string());
    console.field("temperature", &config.temperature.to_string());
    console.field(
        "timeouts",
        &format!(
            "connect {}s, request {}s",
            config.timeouts.connection_timeout_secs, config.timeouts.request_timeout_secs
        ),
    );
}
