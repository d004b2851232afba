//! Configuration for explicit-content detection and censoring

use serde::{Deserialize, Serialize};

/// Configuration for the vision backends
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisionConfig {
    /// Detector backend to use
    #[serde(default)]
    pub backend: VisionBackend,

    /// Base URL of the NudeNet HTTP service
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds for the HTTP backend
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Path to the NudeNet ONNX model (ONNX backend only)
    #[serde(default = "default_model_path")]
    pub model_path: String,

    /// Side length of the square model input in pixels
    #[serde(default = "default_input_size")]
    pub input_size: u32,

    /// Candidates scoring below this are discarded before thresholds apply
    #[serde(default = "default_min_score")]
    pub min_score: f32,

    /// Intra-op threads for ONNX Runtime
    #[serde(default = "default_intra_threads")]
    pub intra_threads: usize,

    /// Gaussian blur sigma applied to censored images
    #[serde(default = "default_blur_sigma")]
    pub blur_sigma: f32,

    /// JPEG quality for re-encoded output (1-100)
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
}

/// Detector backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VisionBackend {
    /// Remote NudeNet service over HTTP
    #[default]
    Http,
    /// In-process NudeNet model (requires the `onnx` feature)
    Onnx,
}

impl std::fmt::Display for VisionBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http => write!(f, "http"),
            Self::Onnx => write!(f, "onnx"),
        }
    }
}

fn default_endpoint() -> String {
    "http://localhost:8080".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

fn default_model_path() -> String {
    "models/320n.onnx".to_string()
}

const fn default_input_size() -> u32 {
    320
}

const fn default_min_score() -> f32 {
    0.2
}

const fn default_intra_threads() -> usize {
    2
}

const fn default_blur_sigma() -> f32 {
    25.0
}

const fn default_jpeg_quality() -> u8 {
    85
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            backend: VisionBackend::default(),
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            model_path: default_model_path(),
            input_size: default_input_size(),
            min_score: default_min_score(),
            intra_threads: default_intra_threads(),
            blur_sigma: default_blur_sigma(),
            jpeg_quality: default_jpeg_quality(),
        }
    }
}

impl VisionConfig {
    /// Configuration pointing the HTTP backend at a test server
    #[must_use]
    pub fn for_testing(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            timeout_secs: 2,
            ..Self::default()
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error message describing the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        match self.backend {
            VisionBackend::Http => {
                if self.endpoint.trim().is_empty() {
                    return Err("Vision endpoint cannot be empty".to_string());
                }
                if self.timeout_secs == 0 {
                    return Err("Vision timeout must be greater than zero".to_string());
                }
            },
            VisionBackend::Onnx => {
                if self.model_path.trim().is_empty() {
                    return Err("ONNX model path cannot be empty".to_string());
                }
                if self.input_size < 32 {
                    return Err(format!(
                        "Model input size {} is too small (minimum 32)",
                        self.input_size
                    ));
                }
                if self.intra_threads == 0 {
                    return Err("ONNX intra_threads must be at least 1".to_string());
                }
            },
        }

        if !(0.0..1.0).contains(&self.min_score) {
            return Err(format!(
                "min_score must be in [0, 1), got {}",
                self.min_score
            ));
        }

        if self.blur_sigma.is_nan() || self.blur_sigma <= 0.0 {
            return Err(format!(
                "blur_sigma must be positive, got {}",
                self.blur_sigma
            ));
        }

        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(format!(
                "jpeg_quality must be between 1 and 100, got {}",
                self.jpeg_quality
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = VisionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.backend, VisionBackend::Http);
        assert_eq!(config.input_size, 320);
        assert!((config.blur_sigma - 25.0).abs() < f32::EPSILON);
        assert_eq!(config.jpeg_quality, 85);
    }

    #[test]
    fn test_empty_endpoint_rejected() {
        let config = VisionConfig {
            endpoint: "  ".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_onnx_ignores_endpoint() {
        let config = VisionConfig {
            backend: VisionBackend::Onnx,
            endpoint: String::new(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_onnx_requires_model_path() {
        let config = VisionConfig {
            backend: VisionBackend::Onnx,
            model_path: String::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_jpeg_quality_bounds() {
        for quality in [0, 101] {
            let config = VisionConfig {
                jpeg_quality: quality,
                ..Default::default()
            };
            assert!(config.validate().is_err(), "quality {quality}");
        }
    }

    #[test]
    fn test_nan_blur_rejected() {
        let config = VisionConfig {
            blur_sigma: f32::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deserialize_partial_toml() {
        let config: VisionConfig = toml::from_str(
            r#"
            backend = "onnx"
            model_path = "/opt/nudenet/320n.onnx"
            "#,
        )
        .unwrap();
        assert_eq!(config.backend, VisionBackend::Onnx);
        assert_eq!(config.model_path, "/opt/nudenet/320n.onnx");
        assert!((config.min_score - 0.2).abs() < f32::EPSILON);
    }
}
