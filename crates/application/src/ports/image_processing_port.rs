//! Image processing port

use async_trait::async_trait;
use bytes::Bytes;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Content type every proxied image is delivered as
pub const OUTPUT_CONTENT_TYPE: &str = "image/jpeg";

/// Port for CPU-bound image transformations
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ImageProcessingPort: Send + Sync {
    /// Blur the whole image and encode it as JPEG
    async fn blur(&self, image: Bytes) -> Result<Bytes, ApplicationError>;

    /// Re-encode an image as JPEG without altering it otherwise
    async fn to_jpeg(&self, image: Bytes) -> Result<Bytes, ApplicationError>;
}
