//! Whole-image censoring and JPEG re-encoding
//!
//! The entire image gets a strong Gaussian blur, regardless of where the
//! detector found the region.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat};
use tracing::debug;

use crate::config::VisionConfig;
use crate::error::VisionError;

/// Blurs and transcodes images to JPEG
///
/// All methods are CPU-bound and synchronous; async callers should run them
/// on a blocking thread.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageCensor {
    blur_sigma: f32,
    jpeg_quality: u8,
}

impl Default for ImageCensor {
    fn default() -> Self {
        Self::from_config(&VisionConfig::default())
    }
}

impl ImageCensor {
    /// Create a censor with explicit parameters
    #[must_use]
    pub const fn new(blur_sigma: f32, jpeg_quality: u8) -> Self {
        Self {
            blur_sigma,
            jpeg_quality,
        }
    }

    #[must_use]
    pub const fn from_config(config: &VisionConfig) -> Self {
        Self::new(config.blur_sigma, config.jpeg_quality)
    }

    #[must_use]
    pub const fn blur_sigma(&self) -> f32 {
        self.blur_sigma
    }

    #[must_use]
    pub const fn jpeg_quality(&self) -> u8 {
        self.jpeg_quality
    }

    /// Blur the whole image and return it as JPEG
    ///
    /// # Errors
    ///
    /// Returns `VisionError::Decode` if the bytes are not a readable image and
    /// `VisionError::Encode` if JPEG encoding fails.
    pub fn blur(&self, image: &[u8]) -> Result<Vec<u8>, VisionError> {
        let decoded = image::load_from_memory(image)?;
        let blurred = decoded.blur(self.blur_sigma);
        let output = self.encode_jpeg(&blurred)?;

        debug!(
            input_size = image.len(),
            output_size = output.len(),
            sigma = self.blur_sigma,
            "Image censored"
        );

        Ok(output)
    }

    /// Re-encode an image as JPEG without altering its content
    ///
    /// # Errors
    ///
    /// Returns `VisionError::Decode` if the bytes are not a readable image and
    /// `VisionError::Encode` if JPEG encoding fails.
    pub fn to_jpeg(&self, image: &[u8]) -> Result<Vec<u8>, VisionError> {
        let decoded = image::load_from_memory(image)?;
        self.encode_jpeg(&decoded)
    }

    fn encode_jpeg(&self, image: &DynamicImage) -> Result<Vec<u8>, VisionError> {
        // JPEG has no alpha channel
        let rgb = image.to_rgb8();
        let mut buffer = Vec::new();
        JpegEncoder::new_with_quality(&mut buffer, self.jpeg_quality)
            .encode_image(&rgb)
            .map_err(|e| VisionError::Encode(e.to_string()))?;
        Ok(buffer)
    }
}

/// Whether the bytes start with the JPEG SOI marker
#[must_use]
pub fn is_jpeg(bytes: &[u8]) -> bool {
    bytes.starts_with(&[0xFF, 0xD8, 0xFF])
}

/// Guess the image format from magic bytes
#[must_use]
pub fn sniff_format(bytes: &[u8]) -> Option<ImageFormat> {
    image::guess_format(bytes).ok()
}

/// Encode a decoded image in the given format (test fixtures, diagnostics)
///
/// # Errors
///
/// Returns `VisionError::Encode` if the format cannot be written.
pub fn encode(image: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>, VisionError> {
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, format)
        .map_err(|e| VisionError::Encode(e.to_string()))?;
    Ok(buffer.into_inner())
}
