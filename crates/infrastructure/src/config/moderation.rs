//! Image moderation settings.

use ai_vision::VisionConfig;
use domain::{DomainError, ModerationThresholds};
use serde::{Deserialize, Serialize};

/// Moderation thresholds plus the detector backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModerationAppConfig {
    /// Minimum score that censors an image in moderate mode
    #[serde(default = "default_moderate")]
    pub moderate_threshold: f32,

    /// Minimum score that censors an image in strict mode
    #[serde(default = "default_strict")]
    pub strict_threshold: f32,

    /// Detector backend, blur strength and JPEG quality
    #[serde(default)]
    pub vision: VisionConfig,
}

const fn default_moderate() -> f32 {
    ModerationThresholds::DEFAULT_MODERATE
}

const fn default_strict() -> f32 {
    ModerationThresholds::DEFAULT_STRICT
}

impl Default for ModerationAppConfig {
    fn default() -> Self {
        Self {
            moderate_threshold: default_moderate(),
            strict_threshold: default_strict(),
            vision: VisionConfig::default(),
        }
    }
}

impl ModerationAppConfig {
    /// Validated thresholds
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidThresholds` unless
    /// `0 < strict <= moderate <= 1`.
    pub fn thresholds(&self) -> Result<ModerationThresholds, DomainError> {
        ModerationThresholds::new(self.moderate_threshold, self.strict_threshold)
    }

    /// Validate thresholds and the vision backend
    ///
    /// # Errors
    ///
    /// Returns a message describing the first invalid setting.
    pub fn validate(&self) -> Result<(), String> {
        self.thresholds().map_err(|e| e.to_string())?;
        self.vision
            .validate()
            .map_err(|e| format!("moderation.vision: {e}"))
    }
}
