//! Vision processing errors

use thiserror::Error;

/// Errors that can occur during detection or censoring
#[derive(Debug, Error)]
pub enum VisionError {
    /// Failed to connect to the detection service
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Detection service did not answer in time
    #[error("Detection timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout
        timeout_secs: u64,
    },

    /// Detection service answered with a non-success status
    #[error("Detection service returned HTTP {status}: {message}")]
    HttpStatus {
        /// HTTP status code
        status: u16,
        /// Response body (truncated)
        message: String,
    },

    /// Response body could not be understood
    #[error("Invalid detection response: {0}")]
    ParseError(String),

    /// ONNX model could not be loaded
    #[error("Model load failed: {0}")]
    ModelLoad(String),

    /// Inference run failed
    #[error("Inference failed: {0}")]
    Inference(String),

    /// Input bytes are not a decodable image
    #[error("Image decode failed: {0}")]
    Decode(String),

    /// Output image could not be encoded
    #[error("Image encode failed: {0}")]
    Encode(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl VisionError {
    /// Whether the input image itself is at fault
    #[must_use]
    pub const fn is_invalid_input(&self) -> bool {
        matches!(self, Self::Decode(_))
    }

    pub(crate) fn from_reqwest(err: &reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            Self::Timeout { timeout_secs }
        } else if err.is_connect() {
            Self::ConnectionFailed(err.to_string())
        } else if err.is_decode() {
            Self::ParseError(err.to_string())
        } else {
            Self::ConnectionFailed(err.to_string())
        }
    }
}

impl From<image::ImageError> for VisionError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::Encoding(e) => Self::Encode(e.to_string()),
            other => Self::Decode(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = VisionError::HttpStatus {
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "Detection service returned HTTP 500: boom");

        let err = VisionError::Timeout { timeout_secs: 3 };
        assert_eq!(err.to_string(), "Detection timed out after 3s");
    }

    #[test]
    fn test_invalid_input_classification() {
        assert!(VisionError::Decode("bad".into()).is_invalid_input());
        assert!(!VisionError::Inference("bad".into()).is_invalid_input());
    }

    #[test]
    fn test_image_error_maps_to_decode() {
        let err = image::load_from_memory(b"not an image").unwrap_err();
        assert!(matches!(VisionError::from(err), VisionError::Decode(_)));
    }
}
