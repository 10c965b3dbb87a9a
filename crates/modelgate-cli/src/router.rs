//! Command routing logic for CLI

use crate::args::{Cli, Commands};
use crate::commands;
use crate::console::CliConsole;
use anyhow::{Context, Result};
use modelgate_core::{LlmConfig, load_config};
use tracing::debug;

/// Route CLI commands to their respective handlers
pub async fn route(cli: Cli) -> Result<()> {
    let console = CliConsole::new(cli.verbose);
    let config = load(&cli)?;
    debug!(
        source = %config.source(),
        platforms = ?config.configured_platforms(),
        "configuration loaded"
    );

    match cli.command {
        Commands::Ask {
            platform,
            model,
            system,
            stream,
            max_retries,
            prompt,
        } => {
            let request = commands::ask::AskRequest {
                platform,
                model,
                system,
                stream,
                max_retries,
                prompt,
            };
            commands::ask::run(&config, request).await
        }
        Commands::Image {
            platform,
            model,
            size,
            quality,
            output,
            prompt,
        } => {
            let request = commands::image::ImageJob {
                platform,
                model,
                size,
                quality,
                output,
                prompt,
            };
            commands::image::run(&config, request, &console).await
        }
        Commands::Check { platform } => commands::check::run(&config, platform.as_deref(), &console),
    }
}

fn load(cli: &Cli) -> Result<LlmConfig> {
    let config = load_config(&cli.config)
        .with_context(|| format!("cannot load configuration from {}", cli.config.display()))?;
    Ok(config.with_env_overrides())
}
