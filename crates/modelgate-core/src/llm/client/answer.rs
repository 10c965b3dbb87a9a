//! Call outcomes returned as values

use crate::error::RetryFailure;
use crate::llm::streaming::TextStream;
use bytes::Bytes;
use futures::StreamExt;
use tracing::warn;

/// Outcome of [`Client::get_answer`](super::Client::get_answer)
#[derive(Debug)]
pub enum Answer {
    /// Full completion text
    Text(String),
    /// Lazily produced fragments
    Stream(TextStream),
    /// Every attempt failed
    Failed(RetryFailure),
}

impl Answer {
    pub fn is_failed(&self) -> bool {
        matches!(self, Answer::Failed(_))
    }

    pub fn failure(&self) -> Option<&RetryFailure> {
        match self {
            Answer::Failed(failure) => Some(failure),
            _ => None,
        }
    }

    /// Reduce the answer to a string.
    ///
    /// A stream is drained; if it is interrupted the text received so far is
    /// returned and the interruption is logged. A failure renders as its
    /// message.
    pub async fn into_text(self) -> String {
        match self {
            Answer::Text(text) => text,
            Answer::Failed(failure) => failure.to_string(),
            Answer::Stream(mut stream) => {
                let mut text = String::new();
                while let Some(fragment) = stream.next().await {
                    match fragment {
                        Ok(fragment) => text.push_str(&fragment),
                        Err(e) => {
                            warn!(error = %e, received = text.len(), "stream ended early");
                            break;
                        }
                    }
                }
                text
            }
        }
    }
}

/// Outcome of [`Client::generate_image`](super::Client::generate_image)
#[derive(Debug, Clone, PartialEq)]
pub enum ImageOutcome {
    /// Raw image bytes
    Image(Bytes),
    /// Every attempt failed
    Failed(RetryFailure),
}

impl ImageOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, ImageOutcome::Failed(_))
    }

    pub fn into_result(self) -> Result<Bytes, RetryFailure> {
        match self {
            ImageOutcome::Image(bytes) => Ok(bytes),
            ImageOutcome::Failed(failure) => Err(failure),
        }
    }
}

impl From<Result<Bytes, RetryFailure>> for ImageOutcome {
    fn from(result: Result<Bytes, RetryFailure>) -> Self {
        match result {
            Ok(bytes) => ImageOutcome::Image(bytes),
            Err(failure) => ImageOutcome::Failed(failure),
        }
    }
}
