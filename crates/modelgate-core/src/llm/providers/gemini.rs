//! Gemini adapter

use super::error_utils::{handle_http_error, handle_parse_error, handle_transport_error};
use super::request_builder::{GenerationParams, build_gemini_body};
use crate::config::{Platform, PlatformConfig};
use crate::error::{GateError, GateResult};
use crate::llm::frame_decoder::Frame;
use crate::llm::messages::Message;
use crate::llm::prompt::flatten_messages;
use crate::llm::rotator::KeyRotator;
use crate::llm::streaming::{FrameContent, TextStream};
use serde_json::Value;
use tracing::{debug, instrument};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Adapter for the Gemini `generateContent` API.
///
/// The conversation is flattened into a single user turn.
#[derive(Debug)]
pub struct GeminiAdapter {
    platform: Platform,
    model: String,
    params: GenerationParams,
    rotator: KeyRotator,
}

impl GeminiAdapter {
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

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn rotator(&self) -> &KeyRotator {
        &self.rotator
    }

    async fn send(&self, messages: &[Message], stream: bool) -> GateResult<reqwest::Response> {
        let transport = self.rotator.current();
        let method = if stream {
            "streamGenerateContent?alt=sse"
        } else {
            "generateContent"
        };
        let url = format!(
            "{}/v1beta/models/{}:{}",
            transport.credential.base_url, self.model, method
        );
        let body = build_gemini_body(&flatten_messages(messages), self.params);

        let response = transport
            .post(&url, stream)
            .header(API_KEY_HEADER, &transport.credential.key)
            .json(&body)
            .send()
            .await
            .map_err(|e| handle_transport_error(e, self.platform))?;

        if !response.status().is_success() {
            return Err(handle_http_error(response, self.platform).await);
        }
        Ok(response)
    }

    /// Gemini content generation
    #[instrument(skip(self, messages), fields(model = %self.model), level = "debug")]
    pub async fn complete(&self, messages: &[Message]) -> GateResult<String> {
        let response = self.send(messages, false).await?;
        let json: Value = response
            .json()
            .await
            .map_err(|e| handle_parse_error(e, self.platform))?;

        if let Some(text) = candidate_text(&json) {
            return Ok(text);
        }

        let reason = json["promptFeedback"]["blockReason"]
            .as_str()
            .map(|r| format!("prompt blocked: {r}"))
            .unwrap_or_else(|| "response has no candidate text".to_string());
        debug!(model = %self.model, reason = %reason, "gemini returned no text");
        Err(GateError::invalid_response(self.platform.name(), reason))
    }

    /// Gemini streaming content generation over SSE
    #[instrument(skip(self, messages), fields(model = %self.model), level = "debug")]
    pub async fn complete_stream(&self, messages: &[Message]) -> GateResult<TextStream> {
        let response = self
            .send(messages, true)
            .await?;
        Ok(TextStream::from_body(
            response.bytes_stream(),
            gemini_frame,
            self.platform.name(),
        ))
    }
}

/// Concatenate `candidates[0].content.parts[*].text`
fn candidate_text(json: &Value) -> Option<String> {
    let parts = json["candidates"][0]["content"]["parts"].as_array()?;
    let texts: Vec<&str> = parts.iter().filter_map(|p| p["text"].as_str()).collect();
    if texts.is_empty() {
        None
    } else {
        Some(texts.concat())
    }
}

fn gemini_frame(frame: &Frame) -> FrameContent {
    let Ok(json) = serde_json::from_str::<Value>(&frame.data) else {
        return FrameContent::Skip;
    };
    match candidate_text(&json) {
        Some(text) if !text.is_empty() => FrameContent::Text(text),
        _ => FrameContent::Skip,
    }
}
