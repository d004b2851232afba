//! Explicit-content detector port
//!
//! Detector failures are a typed result rather than a generic application
//! error: the moderation gate is the only consumer and always resolves them
//! by releasing the image uncensored.

use async_trait::async_trait;
use bytes::Bytes;
use domain::Detection;
#[cfg(test)]
use mockall::automock;
use thiserror::Error;

/// Why a detector run produced no decision
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DetectorError {
    /// Backend could not be constructed or reached
    #[error("Detector unavailable: {0}")]
    Unavailable(String),

    /// Image could not be decoded by the detector
    #[error("Detector could not read image: {0}")]
    InvalidImage(String),

    /// Model or service failed while running
    #[error("Detection failed: {0}")]
    Failed(String),
}

/// Port for nudity detection
#[cfg_attr(test, automock)]
#[async_trait]
pub trait NudityDetectorPort: Send + Sync {
    /// Run detection over encoded image bytes
    async fn detect(&self, image: Bytes) -> Result<Vec<Detection>, DetectorError>;

    /// Check if the backend is usable
    async fn is_healthy(&self) -> bool;

    /// Backend name for logs
    fn name(&self) -> &str;
}
