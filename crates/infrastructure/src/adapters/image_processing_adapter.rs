//! Image processing adapter - Implements ImageProcessingPort using ai_vision
//!
//! Decoding, blurring and encoding are CPU-bound and run on the blocking pool.

use ai_vision::{ImageCensor, VisionConfig, VisionError};
use application::error::ApplicationError;
use application::ports::ImageProcessingPort;
use async_trait::async_trait;
use bytes::Bytes;
use tracing::instrument;

/// Blur and transcode images off the async workers
#[derive(Debug, Clone, Copy, Default)]
pub struct CensorImageProcessor {
    censor: ImageCensor,
}

impl CensorImageProcessor {
    #[must_use]
    pub const fn new(censor: ImageCensor) -> Self {
        Self { censor }
    }

    #[must_use]
    pub const fn from_config(config: &VisionConfig) -> Self {
        Self::new(ImageCensor::from_config(config))
    }

    async fn run<F>(&self, image: Bytes, op: F) -> Result<Bytes, ApplicationError>
    where
        F: FnOnce(&ImageCensor, &[u8]) -> Result<Vec<u8>, VisionError> + Send + 'static,
    {
        let censor = self.censor;
        tokio::task::spawn_blocking(move || op(&censor, &image[..]))
            .await
            .map_err(|e| ApplicationError::Internal(format!("Image task failed: {e}")))?
            .map(Bytes::from)
            .map_err(Self::map_error)
    }

    fn map_error(err: VisionError) -> ApplicationError {
        match err {
            VisionError::Decode(e) => {
                ApplicationError::Validation(format!("Unreadable image: {e}"))
            },
            other => ApplicationError::Internal(other.to_string()),
        }
    }
}

#[async_trait]
impl ImageProcessingPort for CensorImageProcessor {
    #[instrument(skip(self, image), fields(image_size = image.len()))]
    async fn blur(&self, image: Bytes) -> Result<Bytes, ApplicationError> {
        self.run(image, ImageCensor::blur).await
    }

    #[instrument(skip(self, image), fields(image_size = image.len()))]
    async fn to_jpeg(&self, image: Bytes) -> Result<Bytes, ApplicationError> {
        self.run(image, ImageCensor::to_jpeg).await
    }
}

#[cfg(test)]
mod tests {
    use ai_vision::is_jpeg;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

    use super::*;

    fn png() -> Bytes {
        let img = RgbImage::from_fn(16, 16, |x, _| Rgb([(x * 16) as u8, 0, 0]));
        Bytes::from(ai_vision::censor::encode(&DynamicImage::ImageRgb8(img), ImageFormat::Png).unwrap())
    }

    #[tokio::test]
    async fn blur_returns_jpeg() {
        let processor = CensorImageProcessor::default();
        let output = processor.blur(png()).await.unwrap();
        assert!(is_jpeg(&output));
    }

    #[tokio::test]
    async fn to_jpeg_transcodes_png() {
        let processor = CensorImageProcessor::from_config(&VisionConfig::default());
        let output = processor.to_jpeg(png()).await.unwrap();
        assert!(is_jpeg(&output));
    }

    #[tokio::test]
    async fn garbage_is_validation_error() {
        let processor = CensorImageProcessor::default();
        let err = processor
            .to_jpeg(Bytes::from_static(b"<svg xmlns='http://www.w3.org/2000/svg'/>"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Validation(_)));
    }
}
