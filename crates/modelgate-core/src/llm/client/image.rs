//! Image generation entry points

use super::answer::ImageOutcome;
use super::types::Client;
use crate::error::RetryFailure;
use crate::llm::image::ImageRequest;
use crate::llm::providers::BackendAdapter;
use bytes::Bytes;
use tracing::instrument;

impl Client {
    /// Generate an image and get the outcome back as a value
    pub async fn generate_image(&self, prompt: &str, size: &str, quality: &str) -> ImageOutcome {
        let request = ImageRequest::new(prompt)
            .with_size(size)
            .with_quality(quality);
        self.generate(&request).await.into()
    }

    /// Image generation with retries
    #[instrument(skip(self, request), fields(platform = %self.platform, model = %self.model))]
    pub async fn generate(&self, request: &ImageRequest) -> Result<Bytes, RetryFailure> {
        self.retry
            .execute(self.adapter.rotator(), || self.adapter.generate_image(request))
            .await
    }
}
