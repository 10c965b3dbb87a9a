//! modelgate command-line interface
//!
//! Sends prompts and image requests to any backend described in the
//! modelgate configuration.
//!
//! ```bash
//! modelgate --config config/ ask -p gemini -m gemini-2.0-flash "Explain RAII"
//! modelgate ask -p openai -m gpt-4o --stream -s "Be brief." "Why is the sky blue?"
//! modelgate image -p deepbricks -m dall-e-3 -o out/kite.png "a red kite"
//! modelgate check
//! ```
//!
//! Set `RUST_LOG` to override the log filter.

mod args;
mod commands;
mod console;
mod router;

use anyhow::Result;
use args::{Cli, LogFormat};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_format);
    router::route(cli).await
}

fn init_logging(verbose: bool, format: LogFormat) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}
