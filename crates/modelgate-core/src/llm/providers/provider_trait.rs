//! Adapter trait and unified enum

use super::{GeminiAdapter, ImageAdapter, OpenAiAdapter, RestAdapter};
use crate::config::{AdapterFamily, Platform, PlatformConfig};
use crate::error::{GateError, GateResult};
use crate::llm::image::ImageRequest;
use crate::llm::messages::Message;
use crate::llm::rotator::KeyRotator;
use crate::llm::streaming::TextStream;
use async_trait::async_trait;
use bytes::Bytes;

/// Uniform contract every backend adapter offers.
///
/// Text adapters reject `generate_image` and the image adapter rejects the
/// text calls, both with `GateError::Unsupported`.
#[async_trait]
pub trait BackendAdapter: Send + Sync {
    fn platform(&self) -> Platform;

    /// The adapter's credential rotator
    fn rotator(&self) -> &KeyRotator;

    /// One non-streaming completion
    async fn complete(&self, messages: &[Message]) -> GateResult<String>;

    /// Open a streaming completion
    async fn complete_stream(&self, messages: &[Message]) -> GateResult<TextStream>;

    /// Generate one image
    async fn generate_image(&self, request: &ImageRequest) -> GateResult<Bytes>;
}

/// Unified adapter enum, one variant per protocol family
#[derive(Debug)]
pub enum AdapterInstance {
    OpenAi(OpenAiAdapter),
    Gemini(GeminiAdapter),
    Rest(RestAdapter),
    Image(ImageAdapter),
}

impl AdapterInstance {
    /// Build the adapter for `config.platform`'s family.
    ///
    /// # Errors
    ///
    /// `ModelNotConfigured` if `model` cannot be resolved, `ConfigIncomplete`
    /// if the transport cannot be created.
    pub fn build(config: PlatformConfig, model: &str) -> GateResult<Self> {
        Ok(match config.platform.family() {
            AdapterFamily::OpenAiCompatible => Self::OpenAi(OpenAiAdapter::new(config, model)?),
            AdapterFamily::Gemini => Self::Gemini(GeminiAdapter::new(config, model)?),
            AdapterFamily::Rest => Self::Rest(RestAdapter::new(config, model)?),
            AdapterFamily::Image => Self::Image(ImageAdapter::new(config, model)?),
        })
    }

    fn unsupported(&self, operation: &str) -> GateError {
        GateError::unsupported(self.platform().name(), operation)
    }
}

#[async_trait]
impl BackendAdapter for AdapterInstance {
    fn platform(&self) -> Platform {
        self.rotator().platform()
    }

    fn rotator(&self) -> &KeyRotator {
        match self {
            Self::OpenAi(a) => a.rotator(),
            Self::Gemini(a) => a.rotator(),
            Self::Rest(a) => a.rotator(),
            Self::Image(a) => a.rotator(),
        }
    }

    async fn complete(&self, messages: &[Message]) -> GateResult<String> {
        match self {
            Self::OpenAi(a) => a.complete(messages).await,
            Self::Gemini(a) => a.complete(messages).await,
            Self::Rest(a) => a.complete(messages).await,
            Self::Image(_) => Err(self.unsupported("complete")),
        }
    }

    async fn complete_stream(&self, messages: &[Message]) -> GateResult<TextStream> {
        match self {
            Self::OpenAi(a) => a.complete_stream(messages).await,
            Self::Gemini(a) => a.complete_stream(messages).await,
            Self::Rest(a) => a.complete_stream(messages).await,
            Self::Image(_) => Err(self.unsupported("complete_stream")),
        }
    }

    async fn generate_image(&self, request: &ImageRequest) -> GateResult<Bytes> {
        match self {
            Self::Image(a) => a.generate_image(request).await,
            _ => Err(self.unsupported("generate_image")),
        }
    }
}
