//! `ask` subcommand

use anyhow::{Context, Result};
use futures::StreamExt;
use modelgate_core::{Answer, Client, LlmConfig, Message, RetryPolicy};
use std::io::{self, Read, Write};
use tracing::debug;

/// Arguments of one `ask` invocation
pub struct AskRequest {
    pub platform: String,
    pub model: String,
    pub system: Option<String>,
    pub stream: bool,
    pub max_retries: Option<u32>,
    pub prompt: String,
}

pub async fn run(config: &LlmConfig, request: AskRequest) -> Result<()> {
    let mut client = Client::initialize(&request.platform, &request.model, config)?;
    if let Some(max_retries) = request.max_retries {
        let policy = RetryPolicy::new(max_retries).with_backoff_unit(client.retry_policy().backoff_unit);
        client = client.with_retry_policy(policy);
    }

    let messages = build_messages(request.system, read_prompt(request.prompt)?);

    match client.get_answer(&messages, request.stream).await {
        Answer::Text(text) => println!("{text}"),
        Answer::Stream(mut stream) => {
            let mut stdout = io::stdout();
            while let Some(fragment) = stream.next().await {
                match fragment {
                    Ok(fragment) => {
                        stdout.write_all(fragment.as_bytes())?;
                        stdout.flush()?;
                    }
                    Err(e) => {
                        writeln!(stdout)?;
                        return Err(e).context("stream ended early");
                    }
                }
            }
            writeln!(stdout)?;
            debug!(
                fragments = stream.fragments(),
                dropped_frames = stream.dropped_frames(),
                "stream finished"
            );
        }
        Answer::Failed(failure) => return Err(failure.into()),
    }
    Ok(())
}

fn build_messages(system: Option<String>, prompt: String) -> Vec<Message> {
    system
        .into_iter()
        .map(Message::system)
        .chain(std::iter::once(Message::user(prompt)))
        .collect()
}

/// `-` means read the prompt from stdin
fn read_prompt(prompt: String) -> Result<String> {
    if prompt != "-" {
        return Ok(prompt);
    }
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("failed to read prompt from stdin")?;
    Ok(buffer.trim_end().to_string())
}
