//! Decoded stream frames

/// One payload line from a streaming response, with any `data:` prefix removed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub data: String,
}

impl Frame {
    pub fn new(data: impl Into<String>) -> Self {
        Self { data: data.into() }
    }

    /// Check if this is the `[DONE]` terminator used by OpenAI-style streams
    pub fn is_done(&self) -> bool {
        self.data.trim() == "[DONE]"
    }
}
