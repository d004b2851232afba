//! Image moderation gate
//!
//! Decides whether an image is released as-is or blurred. Detector failures
//! fail open: the original bytes go out uncensored. A failed blur after a
//! positive detection does not, because that would release content already
//! known to be explicit.

use std::sync::Arc;

use bytes::Bytes;
use domain::{FilterMode, ModerationDecision, ModerationThresholds};
use tracing::{debug, info, instrument, warn};

use crate::error::ApplicationError;
use crate::ports::{ImageProcessingPort, NudityDetectorPort};

/// Use case: moderate one image under an effective filter mode
pub struct ModerationGate {
    detector: Arc<dyn NudityDetectorPort>,
    processor: Arc<dyn ImageProcessingPort>,
    thresholds: ModerationThresholds,
}

impl std::fmt::Debug for ModerationGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModerationGate")
            .field("detector", &self.detector.name())
            .field("thresholds", &self.thresholds)
            .finish_non_exhaustive()
    }
}

impl ModerationGate {
    #[must_use]
    pub fn new(
        detector: Arc<dyn NudityDetectorPort>,
        processor: Arc<dyn ImageProcessingPort>,
        thresholds: ModerationThresholds,
    ) -> Self {
        Self {
            detector,
            processor,
            thresholds,
        }
    }

    #[must_use]
    pub const fn thresholds(&self) -> ModerationThresholds {
        self.thresholds
    }

    /// Whether the detector backend is usable
    pub async fn detector_healthy(&self) -> bool {
        self.detector.is_healthy().await
    }

    /// Name of the detector backend
    #[must_use]
    pub fn detector_name(&self) -> &str {
        self.detector.name()
    }

    /// Decide what to release for `image` under `mode`
    ///
    /// The caller must already have confirmed the bytes are an image.
    ///
    /// # Errors
    ///
    /// Only when a qualifying detection was found and blurring failed.
    #[instrument(skip(self, image), fields(bytes = image.len(), mode = %mode))]
    pub async fn decide(
        &self,
        image: Bytes,
        mode: FilterMode,
    ) -> Result<ModerationDecision, ApplicationError> {
        let Some(threshold) = self.thresholds.threshold_for(mode) else {
            debug!("Mode does not inspect images");
            return Ok(ModerationDecision::passthrough(image));
        };

        let detections = match self.detector.detect(image.clone()).await {
            Ok(detections) => detections,
            Err(e) => {
                warn!(
                    detector = %self.detector.name(),
                    error = %e,
                    "Detector failed, releasing image uncensored"
                );
                return Ok(ModerationDecision::passthrough(image));
            },
        };

        if !self.thresholds.should_censor(&detections, mode) {
            debug!(detections = detections.len(), threshold, "No qualifying detection");
            return Ok(ModerationDecision::passthrough(image));
        }

        let blurred = self.processor.blur(image).await.map_err(|e| {
            ApplicationError::Internal(format!("failed to censor explicit image: {e}"))
        })?;

        info!(threshold, "Image censored");
        Ok(ModerationDecision::censored(blurred))
    }
}
