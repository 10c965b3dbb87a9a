//! CLI argument definitions using clap
//!
//! - modelgate ask --platform openai --model gpt-4o "question"
//! - modelgate image --platform deepbricks --model dall-e-3 -o out.png "prompt"
//! - modelgate check

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Default configuration location, a directory searched for `llm_config.*`
pub const DEFAULT_CONFIG_PATH: &str = "config";

#[derive(Parser)]
#[command(name = "modelgate")]
#[command(about = "Query LLM and image backends through one configuration")]
#[command(version)]
pub struct Cli {
    /// Path to a config file or a directory containing llm_config.{json,toml,yaml}
    #[arg(long, global = true, env = "MODELGATE_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value = "text")]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Send a prompt and print the answer
    Ask {
        /// Platform name (openai, volcengine, gemini, infingence, deepbricks)
        #[arg(long, short)]
        platform: String,

        /// Model name as listed in the platform's MODELS map
        #[arg(long, short)]
        model: String,

        /// Optional system message sent before the prompt
        #[arg(long, short)]
        system: Option<String>,

        /// Print fragments as they arrive
        #[arg(long)]
        stream: bool,

        /// Override MAX_RETRIES from the config
        #[arg(long)]
        max_retries: Option<u32>,

        /// Prompt text; `-` reads it from stdin
        prompt: String,
    },

    /// Generate an image and write it to a file
    Image {
        #[arg(long, short)]
        platform: String,

        #[arg(long, short)]
        model: String,

        /// Image size, e.g. 1024x1024
        #[arg(long, default_value = modelgate_core::llm::image::DEFAULT_IMAGE_SIZE)]
        size: String,

        /// Image quality (DALL-E models only)
        #[arg(long, default_value = modelgate_core::llm::image::DEFAULT_IMAGE_QUALITY)]
        quality: String,

        /// Output file; parent directories are created
        #[arg(long, short)]
        output: PathBuf,

        /// Image description
        prompt: String,
    },

    /// Validate the configuration and list what each platform offers
    Check {
        /// Only check this platform
        #[arg(long, short)]
        platform: Option<String>,
    },
}
