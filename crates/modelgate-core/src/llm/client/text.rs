//! Text completion entry points

use super::answer::Answer;
use super::types::Client;
use crate::error::{GateError, RetryFailure};
use crate::llm::messages::Message;
use crate::llm::providers::BackendAdapter;
use crate::llm::streaming::TextStream;
use tracing::instrument;

impl Client {
    /// Ask the model and get the answer back as a value.
    ///
    /// With `stream` set, the answer is a [`TextStream`]; only opening the
    /// stream is retried. Exhausted retries come back as
    /// [`Answer::Failed`] rather than an error.
    pub async fn get_answer(&self, messages: &[Message], stream: bool) -> Answer {
        let result = if stream {
            self.complete_stream(messages).await.map(Answer::Stream)
        } else {
            self.complete(messages).await.map(Answer::Text)
        };
        result.unwrap_or_else(Answer::Failed)
    }

    /// Non-streaming completion with retries
    #[instrument(skip(self, messages), fields(platform = %self.platform, model = %self.model, messages = messages.len()))]
    pub async fn complete(&self, messages: &[Message]) -> Result<String, RetryFailure> {
        check_messages(messages)?;
        self.retry
            .execute(self.adapter.rotator(), || self.adapter.complete(messages))
            .await
    }

    /// Open a streaming completion with retries
    #[instrument(skip(self, messages), fields(platform = %self.platform, model = %self.model, messages = messages.len()))]
    pub async fn complete_stream(&self, messages: &[Message]) -> Result<TextStream, RetryFailure> {
        check_messages(messages)?;
        self.retry
            .execute(self.adapter.rotator(), || {
                self.adapter.complete_stream(messages)
            })
            .await
    }
}

fn check_messages(messages: &[Message]) -> Result<(), RetryFailure> {
    if messages.is_empty() {
        return Err(RetryFailure::new(
            GateError::invalid_request("at least one message is required"),
            0,
        ));
    }
    Ok(())
}
