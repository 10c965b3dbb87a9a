//! OpenAI-compatible adapter (OpenAI, Volcengine Ark)

use super::error_utils::{handle_http_error, handle_parse_error, handle_transport_error};
use super::openai_stream::{openai_message_text, openai_sse_stream};
use super::request_builder::{GenerationParams, build_chat_body};
use crate::config::{Platform, PlatformConfig};
use crate::error::{GateError, GateResult};
use crate::llm::messages::Message;
use crate::llm::rotator::KeyRotator;
use crate::llm::streaming::TextStream;
use serde_json::Value;
use tracing::instrument;

/// Adapter for backends speaking `/chat/completions`
#[derive(Debug)]
pub struct OpenAiAdapter {
    platform: Platform,
    model: String,
    params: GenerationParams,
    rotator: KeyRotator,
}

impl OpenAiAdapter {
    /// Create a new adapter, resolving `model` against the model map
    pub fn new(config: PlatformConfig, model: &str) -> GateResult<Self> {
        let model = config.resolve_model(model)?;
        let rotator = KeyRotator::new(config.platform, config.credentials, config.timeouts)?;
        Ok(Self {
            platform: config.platform,
            model,
            params: GenerationParams {
                max_tokens: config.max_tokens,
                temperature: config.temperature,
            },
            rotator,
        })
    }

    /// Model id sent to the backend
    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn rotator(&self) -> &KeyRotator {
        &self.rotator
    }

    async fn send(&self, messages: &[Message], stream: bool) -> GateResult<reqwest::Response> {
        let transport = self.rotator.current();
        let url = format!("{}/chat/completions", transport.credential.base_url);
        let body = build_chat_body(&self.model, messages, self.params, stream);

        let response = transport
            .post(&url, stream)
            .bearer_auth(&transport.credential.key)
            .json(&body)
            .send()
            .await
            .map_err(|e| handle_transport_error(e, self.platform))?;

        if !response.status().is_success() {
            return Err(handle_http_error(response, self.platform).await);
        }
        Ok(response)
    }

    /// Chat completion returning the first choice's text
    #[instrument(skip(self, messages), fields(platform = %self.platform, model = %self.model), level = "debug")]
    pub async fn complete(&self, messages: &[Message]) -> GateResult<String> {
        let response = self.send(messages, false).await?;
        let json: Value = response
            .json()
            .await
            .map_err(|e| handle_parse_error(e, self.platform))?;

        openai_message_text(&json).ok_or_else(|| {
            GateError::invalid_response(
                self.platform.name(),
                "response has no choices[0].message.content",
            )
        })
    }

    /// Streaming chat completion
    #[instrument(skip(self, messages), fields(platform = %self.platform, model = %self.model), level = "debug")]
    pub async fn complete_stream(&self, messages: &[Message]) -> GateResult<TextStream> {
        let response = self.send(messages, true).await?;
        Ok(openai_sse_stream(response.bytes_stream(), self.platform.name()))
    }
}
