//! Request body builders shared by the adapters

use crate::llm::messages::Message;
use serde_json::{Value, json};

/// Generation tunables copied from the platform config
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Build an OpenAI-compatible chat completion request body
pub fn build_chat_body(
    model: &str,
    messages: &[Message],
    params: GenerationParams,
    stream: bool,
) -> Value {
    json!({
        "model": model,
        "messages": messages,
        "max_tokens": params.max_tokens,
        "temperature": params.temperature,
        "stream": stream,
    })
}

/// Build a single-prompt request body for generic REST endpoints
pub fn build_prompt_body(model: &str, prompt: &str, params: GenerationParams, stream: bool) -> Value {
    json!({
        "model": model,
        "prompt": prompt,
        "stream": stream,
        "max_tokens": params.max_tokens,
        "temperature": params.temperature,
    })
}

/// Build a `generateContent` request body
pub fn build_gemini_body(prompt: &str, params: GenerationParams) -> Value {
    json!({
        "contents": [{
            "role": "user",
            "parts": [{"text": prompt}],
        }],
        "generationConfig": {
            "temperature": params.temperature,
            "maxOutputTokens": params.max_tokens,
        },
    })
}

/// Build an `/images/generations` request body.
///
/// `quality` is only understood by DALL-E models and is left out otherwise.
pub fn build_image_body(model: &str, prompt: &str, size: &str, quality: &str) -> Value {
    let mut body = json!({
        "model": model,
        "prompt": prompt,
        "n": 1,
        "size": size,
    });
    if model.starts_with("dall-e") {
        body["quality"] = json!(quality);
    }
    body
}
