//! Shared OpenAI-compatible stream parsing
//!
//! Used by: openai, volcengine

use crate::llm::frame_decoder::Frame;
use crate::llm::streaming::{FrameContent, TextStream};
use futures::Stream;
use serde_json::Value;

/// Parse an OpenAI-compatible SSE body into a [`TextStream`].
///
/// - Lines prefixed with `data: `
/// - JSON with `choices[0].delta.content`
/// - `[DONE]` termination marker
pub fn openai_sse_stream<S, B>(body: S, platform: &'static str) -> TextStream
where
    S: Stream<Item = Result<B, reqwest::Error>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
{
    TextStream::from_body(body, openai_delta_frame, platform)
}

/// Extract `choices[0].delta.content` from one frame
pub fn openai_delta_frame(frame: &Frame) -> FrameContent {
    if frame.is_done() {
        return FrameContent::Done;
    }

    let Ok(json) = serde_json::from_str::<Value>(&frame.data) else {
        return FrameContent::Skip;
    };

    match json["choices"][0]["delta"]["content"].as_str() {
        Some(content) if !content.is_empty() => FrameContent::Text(content.to_string()),
        _ => FrameContent::Skip,
    }
}

/// Extract `choices[0].message.content` from a completion body
pub fn openai_message_text(json: &Value) -> Option<String> {
    json["choices"][0]["message"]["content"]
        .as_str()
        .map(str::to_string)
}
