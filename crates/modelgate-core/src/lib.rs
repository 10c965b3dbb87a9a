//! Modelgate Core Library
//!
//! A unified client for chat-style LLM backends and image generation.
//! A [`Client`] is built once for a (platform, model) pair and hides the
//! backend's wire format, rotates API keys on failure and retries with
//! exponential backoff.

pub mod config;
pub mod error;
pub mod llm;

// Re-export commonly used types
pub use config::{LlmConfig, Platform, PlatformConfig, load_config};
pub use error::{GateError, GateResult, RetryFailure};
pub use llm::{
    Answer, Client, ImageOutcome, ImageRequest, Message, RetryPolicy, Role, TextStream,
    save_image,
};
