//! Generic REST adapter for per-model endpoints (Infingence)

use super::error_utils::{handle_http_error, handle_parse_error, handle_transport_error};
use super::request_builder::{GenerationParams, build_prompt_body};
use crate::config::{Platform, PlatformConfig};
use crate::error::{GateError, GateResult};
use crate::llm::frame_decoder::Frame;
use crate::llm::messages::Message;
use crate::llm::prompt::flatten_messages;
use crate::llm::rotator::KeyRotator;
use crate::llm::streaming::{FrameContent, TextStream};
use serde_json::Value;
use tracing::instrument;

const PASSTHROUGH_ROUTE: &str = "chat/completions";

/// Adapter posting a flattened prompt to the model's own endpoint.
///
/// The endpoint is the model's entry in `MODELS`: an absolute URL, or a path
/// joined onto the credential's base URL. Models passed through by
/// `ALLOW_ANY_MODEL` go to `{base}/chat/completions`.
#[derive(Debug)]
pub struct RestAdapter {
    platform: Platform,
    model: String,
    route: String,
    params: GenerationParams,
    rotator: KeyRotator,
}

impl RestAdapter {
    pub fn new(config: PlatformConfig, model: &str) -> GateResult<Self> {
        let target = config.resolve_model(model)?;
        let route = if config.models.contains_key(model) {
            target
        } else {
            PASSTHROUGH_ROUTE.to_string()
        };

        let rotator = KeyRotator::new(config.platform, config.credentials, config.timeouts)?;
        Ok(Self {
            platform: config.platform,
            model: model.to_string(),
            route,
            params: GenerationParams {
                max_tokens: config.max_tokens,
                temperature: config.temperature,
            },
            rotator,
        })
    }

    pub fn rotator(&self) -> &KeyRotator {
        &self.rotator
    }

    /// Full endpoint URL for a credential's base
    pub fn endpoint_url(&self, base_url: &str) -> String {
        if self.route.starts_with("http://") || self.route.starts_with("https://") {
            self.route.clone()
        } else {
            format!(
                "{}/{}",
                base_url.trim_end_matches('/'),
                self.route.trim_start_matches('/')
            )
        }
    }

    async fn send(&self, messages: &[Message], stream: bool) -> GateResult<reqwest::Response> {
        let transport = self.rotator.current();
        let url = self.endpoint_url(&transport.credential.base_url);
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(GateError::invalid_request(format!(
                "endpoint for model '{}' is not an absolute URL and no BASE_URL is set: {url}",
                self.model
            )));
        }

        let body = build_prompt_body(&self.model, &flatten_messages(messages), self.params, stream);
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

    #[instrument(skip(self, messages), fields(model = %self.model), level = "debug")]
    pub async fn complete(&self, messages: &[Message]) -> GateResult<String> {
        let response = self.send(messages, false).await?;
        let json: Value = response
            .json()
            .await
            .map_err(|e| handle_parse_error(e, self.platform))?;

        response_text(&json).ok_or_else(|| {
            GateError::invalid_response(self.platform.name(), "response carries no text field")
        })
    }

    #[instrument(skip(self, messages), fields(model = %self.model), level = "debug")]
    pub async fn complete_stream(&self, messages: &[Message]) -> GateResult<TextStream> {
        let response = self.send(messages, true).await?;
        Ok(TextStream::from_body(
            response.bytes_stream(),
            rest_frame,
            self.platform.name(),
        ))
    }
}

/// First text found among the shapes REST backends commonly return
fn response_text(json: &Value) -> Option<String> {
    [
        &json["choices"][0]["message"]["content"],
        &json["choices"][0]["text"],
        &json["response"],
        &json["text"],
    ]
    .into_iter()
    .find_map(|v| v.as_str())
    .map(str::to_string)
}

fn rest_frame(frame: &Frame) -> FrameContent {
    if frame.is_done() {
        return FrameContent::Done;
    }
    let Ok(json) = serde_json::from_str::<Value>(&frame.data) else {
        return FrameContent::Skip;
    };

    let text = json["choices"][0]["delta"]["content"]
        .as_str()
        .map(str::to_string)
        .or_else(|| response_text(&json));
    let done = json["done"].as_bool() == Some(true);

    match text {
        Some(text) if !text.is_empty() => FrameContent::Text(text),
        // NDJSON backends end with a final `"done": true` object.
        _ if done => FrameContent::Done,
        _ => FrameContent::Skip,
    }
}
