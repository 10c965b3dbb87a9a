//! Image generation adapter (Deepbricks and other `/images/generations` hosts)

use super::error_utils::{handle_http_error, handle_parse_error, handle_transport_error};
use super::request_builder::build_image_body;
use crate::config::timeouts::download;
use crate::config::{Platform, PlatformConfig};
use crate::error::{GateError, GateResult};
use crate::llm::image::ImageRequest;
use crate::llm::rotator::KeyRotator;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, instrument, warn};

/// Adapter that generates an image and fetches the resulting asset
#[derive(Debug)]
pub struct ImageAdapter {
    platform: Platform,
    model: String,
    rotator: KeyRotator,
    /// Separate client for asset downloads with its own timeout
    downloader: Client,
    download_backoff_unit: Duration,
}

impl ImageAdapter {
    pub fn new(config: PlatformConfig, model: &str) -> GateResult<Self> {
        let model = config.resolve_model(model)?;
        let rotator = KeyRotator::new(config.platform, config.credentials, config.timeouts)?;

        let downloader = Client::builder()
            .connect_timeout(config.timeouts.connection_timeout().min(download::request_timeout()))
            .timeout(download::request_timeout())
            .build()
            .map_err(|e| {
                GateError::config_incomplete(
                    config.platform.name(),
                    format!("failed to create download client: {e}"),
                )
            })?;

        Ok(Self {
            platform: config.platform,
            model,
            rotator,
            downloader,
            download_backoff_unit: Duration::from_secs(1),
        })
    }

    /// Scale the pause between download attempts
    pub fn with_download_backoff_unit(mut self, unit: Duration) -> Self {
        self.download_backoff_unit = unit;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn rotator(&self) -> &KeyRotator {
        &self.rotator
    }

    /// Generate one image and return its raw bytes
    #[instrument(skip(self, request), fields(model = %self.model, size = %request.size), level = "debug")]
    pub async fn generate_image(&self, request: &ImageRequest) -> GateResult<Bytes> {
        if request.prompt.trim().is_empty() {
            return Err(GateError::invalid_request("image prompt is empty"));
        }

        let transport = self.rotator.current();
        let url = format!("{}/images/generations", transport.credential.base_url);
        let body = build_image_body(&self.model, &request.prompt, &request.size, &request.quality);

        let response = transport
            .post(&url, false)
            .bearer_auth(&transport.credential.key)
            .json(&body)
            .send()
            .await
            .map_err(|e| handle_transport_error(e, self.platform))?;

        if !response.status().is_success() {
            return Err(handle_http_error(response, self.platform).await);
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| handle_parse_error(e, self.platform))?;

        let image = &json["data"][0];
        if let Some(asset_url) = image["url"].as_str() {
            return self.download(asset_url).await;
        }
        if let Some(encoded) = image["b64_json"].as_str() {
            return STANDARD.decode(encoded).map(Bytes::from).map_err(|e| {
                GateError::invalid_response(self.platform.name(), format!("invalid b64_json: {e}"))
            });
        }

        Err(GateError::invalid_response(
            self.platform.name(),
            "response has neither data[0].url nor data[0].b64_json",
        ))
    }

    /// Fetch a generated asset, pausing `2^attempt` units between attempts
    async fn download(&self, url: &str) -> GateResult<Bytes> {
        let mut last_error = None;

        for attempt in 0..download::MAX_ATTEMPTS {
            match self.fetch(url).await {
                Ok(bytes) => {
                    debug!(bytes = bytes.len(), attempt = attempt + 1, "image downloaded");
                    return Ok(bytes);
                }
                Err(e) => {
                    if attempt + 1 < download::MAX_ATTEMPTS {
                        let delay = self.download_backoff_unit * 2u32.pow(attempt);
                        warn!(
                            attempt = attempt + 1,
                            max_attempts = download::MAX_ATTEMPTS,
                            delay_secs = delay.as_secs_f64(),
                            error = %e,
                            "image download failed, retrying"
                        );
                        sleep(delay).await;
                    }
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            GateError::transport(self.platform.name(), "image download was not attempted")
        }))
    }

    async fn fetch(&self, url: &str) -> GateResult<Bytes> {
        let response = self
            .downloader
            .get(url)
            .send()
            .await
            .map_err(|e| handle_transport_error(e, self.platform))?;

        if !response.status().is_success() {
            return Err(handle_http_error(response, self.platform).await);
        }

        response
            .bytes()
            .await
            .map_err(|e| handle_transport_error(e, self.platform))
    }
}
