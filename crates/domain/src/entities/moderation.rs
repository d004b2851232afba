//! Image moderation rules
//!
//! The detector reports `(label, score)` pairs. Whether an image gets blurred
//! depends on the effective filter mode: relaxed never inspects, moderate
//! only reacts to very confident detections, strict uses a lower threshold.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::value_objects::{FilterMode, NudityLabel};

/// A single detector finding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub label: NudityLabel,
    pub score: f32,
}

impl Detection {
    #[must_use]
    pub const fn new(label: NudityLabel, score: f32) -> Self {
        Self { label, score }
    }

    /// Explicit exposed region at or above `threshold`
    #[must_use]
    pub fn qualifies(&self, threshold: f32) -> bool {
        self.label.is_explicit_exposure() && self.score >= threshold
    }
}

/// Per-mode confidence thresholds
///
/// Invariant: `0 < strict <= moderate <= 1`, so strict censors at least
/// every image moderate censors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawThresholds")]
pub struct ModerationThresholds {
    moderate: f32,
    strict: f32,
}

/// Unvalidated wire form
#[derive(Deserialize)]
struct RawThresholds {
    moderate: f32,
    strict: f32,
}

impl TryFrom<RawThresholds> for ModerationThresholds {
    type Error = DomainError;

    fn try_from(raw: RawThresholds) -> Result<Self, Self::Error> {
        Self::new(raw.moderate, raw.strict)
    }
}

impl ModerationThresholds {
    pub const DEFAULT_MODERATE: f32 = 0.70;
    pub const DEFAULT_STRICT: f32 = 0.40;

    /// Create validated thresholds
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidThresholds`] unless
    /// `0 < strict <= moderate <= 1`.
    pub fn new(moderate: f32, strict: f32) -> Result<Self, DomainError> {
        let valid = strict > 0.0 && strict <= moderate && moderate <= 1.0;
        if !valid {
            return Err(DomainError::InvalidThresholds { moderate, strict });
        }
        Ok(Self { moderate, strict })
    }

    #[must_use]
    pub const fn moderate(&self) -> f32 {
        self.moderate
    }

    #[must_use]
    pub const fn strict(&self) -> f32 {
        self.strict
    }

    /// Threshold for a mode, `None` when the mode does not inspect images
    #[must_use]
    pub const fn threshold_for(&self, mode: FilterMode) -> Option<f32> {
        match mode {
            FilterMode::Relaxed => None,
            FilterMode::Moderate => Some(self.moderate),
            FilterMode::Strict => Some(self.strict),
        }
    }

    /// Whether any detection requires censoring under `mode`
    #[must_use]
    pub fn should_censor(&self, detections: &[Detection], mode: FilterMode) -> bool {
        self.threshold_for(mode)
            .is_some_and(|threshold| detections.iter().any(|d| d.qualifies(threshold)))
    }
}

impl Default for ModerationThresholds {
    fn default() -> Self {
        Self {
            moderate: Self::DEFAULT_MODERATE,
            strict: Self::DEFAULT_STRICT,
        }
    }
}

/// Output of the moderation gate
///
/// When `was_censored` is false, `output` is the caller's input unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModerationDecision {
    pub output: Bytes,
    pub was_censored: bool,
}

impl ModerationDecision {
    /// Release the original bytes untouched
    #[must_use]
    pub const fn passthrough(original: Bytes) -> Self {
        Self {
            output: original,
            was_censored: false,
        }
    }

    /// Release a censored rendition
    #[must_use]
    pub const fn censored(blurred: Bytes) -> Self {
        Self {
            output: blurred,
            was_censored: true,
        }
    }
}
