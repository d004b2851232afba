//! Remote media fetch port

use async_trait::async_trait;
use bytes::Bytes;
use domain::ImageUrl;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// What a remote fetch produced
///
/// The body is only read once status and content type have been checked,
/// so the non-image variants never carry bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteMedia {
    /// 2xx with an `image/*` content type
    Image { content_type: String, bytes: Bytes },
    /// 2xx but the content type is not an image
    NotAnImage { content_type: String },
    /// Non-success status
    Missing { status: u16 },
}

/// Port for fetching remote images
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MediaFetchPort: Send + Sync {
    /// Fetch `url`, checking status and content type before reading the body
    ///
    /// Network failures and timeouts map to
    /// [`ApplicationError::UpstreamUnavailable`]; oversized bodies to
    /// [`ApplicationError::Validation`].
    async fn fetch(&self, url: &ImageUrl) -> Result<RemoteMedia, ApplicationError>;
}
