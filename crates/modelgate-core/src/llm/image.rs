//! Image generation requests and persistence

use crate::error::{GateError, GateResult};
use std::path::Path;
use tracing::debug;

pub const DEFAULT_IMAGE_SIZE: &str = "1792x1024";
pub const DEFAULT_IMAGE_QUALITY: &str = "hd";

/// Parameters of one image generation call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    pub prompt: String,
    /// `WIDTHxHEIGHT`, e.g. `1792x1024`
    pub size: String,
    /// Only forwarded to DALL-E models
    pub quality: String,
}

impl ImageRequest {
    /// Request with the default size and quality
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            size: DEFAULT_IMAGE_SIZE.to_string(),
            quality: DEFAULT_IMAGE_QUALITY.to_string(),
        }
    }

    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = size.into();
        self
    }

    pub fn with_quality(mut self, quality: impl Into<String>) -> Self {
        self.quality = quality.into();
        self
    }
}

/// Write image bytes to `path`, creating missing parent directories
pub fn save_image(path: impl AsRef<Path>, bytes: &[u8]) -> GateResult<()> {
    let path = path.as_ref();
    let shown = path.display().to_string();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            GateError::io_with_path(format!("failed to create directory: {e}"), &shown)
        })?;
    }

    std::fs::write(path, bytes)
        .map_err(|e| GateError::io_with_path(format!("failed to write image: {e}"), &shown))?;

    debug!(path = %shown, bytes = bytes.len(), "image saved");
    Ok(())
}
