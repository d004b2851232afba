//! Port definitions for explicit-content detection
//!
//! Defines the trait detector backends must implement.

use async_trait::async_trait;
use bytes::Bytes;
use domain::Detection;

use crate::error::VisionError;

/// Port for explicit-content detectors
///
/// Implementations receive encoded image bytes (any format the backend can
/// decode) and report the labelled regions they found.
///
/// # Example
///
/// ```ignore
/// use ai_vision::ExplicitContentDetector;
///
/// async fn any_exposure(
///     detector: &impl ExplicitContentDetector,
///     image: bytes::Bytes,
/// ) -> Result<bool, ai_vision::VisionError> {
///     let detections = detector.detect(image).await?;
///     Ok(detections.iter().any(|d| d.label.is_explicit_exposure()))
/// }
/// ```
#[async_trait]
pub trait ExplicitContentDetector: Send + Sync {
    /// Detect labelled regions in an image
    ///
    /// Returns at most one detection per label, carrying the best score.
    ///
    /// # Errors
    ///
    /// Returns `VisionError` if the backend is unreachable, the image cannot
    /// be decoded, or inference fails.
    async fn detect(&self, image: Bytes) -> Result<Vec<Detection>, VisionError>;

    /// Check if the backend is ready to serve requests
    async fn is_available(&self) -> bool;

    /// Short backend identifier used in logs and health reports
    fn name(&self) -> &str;
}
