//! Nudity detector adapter - Implements NudityDetectorPort using ai_vision
//!
//! The backend is built on first use. A failed build is reported as an
//! unavailable detector and attempted again on the next call.

use std::sync::Arc;

use ai_vision::{ExplicitContentDetector, VisionBackend, VisionConfig, VisionError, build_detector};
use application::ports::{DetectorError, NudityDetectorPort};
use async_trait::async_trait;
use bytes::Bytes;
use domain::Detection;
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument};

type SharedDetector = Arc<dyn ExplicitContentDetector>;

/// Builds a detector backend from configuration
pub type DetectorFactory =
    Arc<dyn Fn(&VisionConfig) -> Result<SharedDetector, VisionError> + Send + Sync>;

/// Lazily initialized detector
pub struct LazyNudityDetector {
    config: VisionConfig,
    factory: DetectorFactory,
    detector: OnceCell<SharedDetector>,
}

impl std::fmt::Debug for LazyNudityDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyNudityDetector")
            .field("backend", &self.config.backend)
            .field("initialized", &self.detector.initialized())
            .finish_non_exhaustive()
    }
}

impl LazyNudityDetector {
    /// Create an adapter that builds the configured `ai_vision` backend
    #[must_use]
    pub fn new(config: VisionConfig) -> Self {
        Self::with_factory(config, Arc::new(build_detector))
    }

    /// Create an adapter with a custom backend factory
    #[must_use]
    pub fn with_factory(config: VisionConfig, factory: DetectorFactory) -> Self {
        Self {
            config,
            factory,
            detector: OnceCell::new(),
        }
    }

    /// Whether the backend has been built
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.detector.initialized()
    }

    async fn detector(&self) -> Result<&SharedDetector, DetectorError> {
        self.detector
            .get_or_try_init(|| async {
                let config = self.config.clone();
                let factory = Arc::clone(&self.factory);
                // ONNX model loading blocks
                let detector = tokio::task::spawn_blocking(move || factory(&config))
                    .await
                    .map_err(|e| {
                        DetectorError::Unavailable(format!("Detector init task failed: {e}"))
                    })?
                    .map_err(|e| DetectorError::Unavailable(e.to_string()))?;

                info!(
                    backend = %self.config.backend,
                    detector = detector.name(),
                    "Nudity detector initialized"
                );
                Ok::<SharedDetector, DetectorError>(detector)
            })
            .await
    }

    /// Map a backend error onto the detector failure taxonomy
    fn map_error(err: VisionError) -> DetectorError {
        match err {
            VisionError::Decode(e) => DetectorError::InvalidImage(e),
            VisionError::ConnectionFailed(_)
            | VisionError::Timeout { .. }
            | VisionError::ModelLoad(_)
            | VisionError::Configuration(_) => DetectorError::Unavailable(err.to_string()),
            VisionError::HttpStatus { .. }
            | VisionError::ParseError(_)
            | VisionError::Inference(_)
            | VisionError::Encode(_) => DetectorError::Failed(err.to_string()),
        }
    }
}

#[async_trait]
impl NudityDetectorPort for LazyNudityDetector {
    #[instrument(skip(self, image), fields(image_size = image.len()))]
    async fn detect(&self, image: Bytes) -> Result<Vec<Detection>, DetectorError> {
        let detector = self.detector().await?;
        let detections = detector.detect(image).await.map_err(Self::map_error)?;
        debug!(detections = detections.len(), "Detection finished");
        Ok(detections)
    }

    async fn is_healthy(&self) -> bool {
        match self.detector().await {
            Ok(detector) => detector.is_available().await,
            Err(_) => false,
        }
    }

    fn name(&self) -> &str {
        match self.config.backend {
            VisionBackend::Http => "nudenet-http",
            VisionBackend::Onnx => "nudenet-onnx",
        }
    }
}
