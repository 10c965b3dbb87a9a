//! `image` subcommand

use crate::console::CliConsole;
use anyhow::Result;
use modelgate_core::{Client, LlmConfig, save_image};
use std::path::PathBuf;

/// Arguments of one `image` invocation
pub struct ImageJob {
    pub platform: String,
    pub model: String,
    pub size: String,
    pub quality: String,
    pub output: PathBuf,
    pub prompt: String,
}

pub async fn run(config: &LlmConfig, job: ImageJob, console: &CliConsole) -> Result<()> {
    let client = Client::initialize(&job.platform, &job.model, config)?;
    console.info(&format!("generating {} image with {}", job.size, client.model()));

    let bytes = client
        .generate_image(&job.prompt, &job.size, &job.quality)
        .await
        .into_result()?;

    save_image(&job.output, &bytes)?;
    console.success(&format!(
        "saved {} bytes to {}",
        bytes.len(),
        job.output.display()
    ));
    Ok(())
}
