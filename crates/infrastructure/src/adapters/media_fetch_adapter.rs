//! Media fetch adapter - Implements MediaFetchPort with reqwest

use std::time::Duration;

use application::error::ApplicationError;
use application::ports::{MediaFetchPort, RemoteMedia};
use async_trait::async_trait;
use bytes::BytesMut;
use domain::ImageUrl;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, instrument};

use crate::config::MediaConfig;

/// Fetches third-party images with a bounded body size
#[derive(Debug, Clone)]
pub struct HttpMediaFetcher {
    client: Client,
    timeout_secs: u64,
    max_bytes: usize,
}

impl HttpMediaFetcher {
    /// Create a fetcher from media settings
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` if the HTTP client cannot be
    /// built.
    pub fn new(config: &MediaConfig) -> Result<Self, ApplicationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| {
                ApplicationError::Configuration(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            timeout_secs: config.timeout_secs,
            max_bytes: config.max_bytes,
        })
    }

    fn map_reqwest(&self, err: &reqwest::Error) -> ApplicationError {
        if err.is_timeout() {
            ApplicationError::UpstreamUnavailable(format!(
                "Image fetch timed out after {}s",
                self.timeout_secs
            ))
        } else {
            ApplicationError::UpstreamUnavailable(format!("Image fetch failed: {err}"))
        }
    }

    fn too_large(&self) -> ApplicationError {
        ApplicationError::Validation(format!(
            "Remote image exceeds the {} byte limit",
            self.max_bytes
        ))
    }
}

/// Whether a content type names an image (`image/*`)
fn is_image_content_type(content_type: &str) -> bool {
    content_type
        .trim()
        .get(..6)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("image/"))
}

#[async_trait]
impl MediaFetchPort for HttpMediaFetcher {
    #[instrument(skip(self, url), fields(host = %url.host()))]
    async fn fetch(&self, url: &ImageUrl) -> Result<RemoteMedia, ApplicationError> {
        let mut response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| self.map_reqwest(&e))?;

        let status = response.status();
        if !status.is_success() {
            debug!(status = %status, "Remote image missing");
            return Ok(RemoteMedia::Missing {
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        if !is_image_content_type(&content_type) {
            debug!(content_type = %content_type, "Remote resource is not an image");
            return Ok(RemoteMedia::NotAnImage { content_type });
        }

        if response
            .content_length()
            .is_some_and(|len| len > self.max_bytes as u64)
        {
            return Err(self.too_large());
        }

        let mut body = BytesMut::new();
        while let Some(chunk) = response.chunk().await.map_err(|e| self.map_reqwest(&e))? {
            if body.len() + chunk.len() > self.max_bytes {
                return Err(self.too_large());
            }
            body.extend_from_slice(&chunk);
        }

        debug!(size = body.len(), content_type = %content_type, "Remote image fetched");

        Ok(RemoteMedia::Image {
            content_type,
            bytes: body.freeze(),
        })
    }
}
