//! Filter mode value object

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::DomainError;

/// Safe search filter mode
///
/// Attached to a request as an optional override and to the global policy
/// as the default. Aggressiveness increases from `Relaxed` to `Strict`.
///
/// The mode drives two independent decisions: whether keyword/domain rules
/// run at all (anything but `Relaxed`), and which detection threshold the
/// image moderation gate uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum FilterMode {
    /// No keyword/domain rules, no image inspection
    Relaxed,
    /// Rules enforced, only very confident detections are blurred
    #[default]
    Moderate,
    /// Rules enforced, lower detection threshold
    Strict,
}

impl FilterMode {
    /// Resolve the effective mode for a request
    ///
    /// An explicit per-request override always wins over the stored default.
    #[must_use]
    pub fn resolve(requested: Option<Self>, default: Self) -> Self {
        requested.unwrap_or(default)
    }

    /// Whether keyword and domain rules apply in this mode
    #[must_use]
    pub const fn enforces_policy(&self) -> bool {
        !matches!(self, Self::Relaxed)
    }

    /// Whether images are run through the detector in this mode
    #[must_use]
    pub const fn inspects_images(&self) -> bool {
        !matches!(self, Self::Relaxed)
    }

    /// Lowercase wire name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Relaxed => "relaxed",
            Self::Moderate => "moderate",
            Self::Strict => "strict",
        }
    }

    const fn rank(self) -> u8 {
        match self {
            Self::Relaxed => 0,
            Self::Moderate => 1,
            Self::Strict => 2,
        }
    }

    /// All modes, least aggressive first
    #[must_use]
    pub const fn all() -> [Self; 3] {
        [Self::Relaxed, Self::Moderate, Self::Strict]
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "relaxed" => Ok(Self::Relaxed),
            "moderate" => Ok(Self::Moderate),
            "strict" => Ok(Self::Strict),
            other => Err(DomainError::InvalidFilterMode(other.to_string())),
        }
    }
}

impl TryFrom<String> for FilterMode {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl PartialOrd for FilterMode {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FilterMode {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.rank().cmp(&other.rank())
    }
}
