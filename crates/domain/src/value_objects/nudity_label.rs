//! Body-region labels reported by an explicit-content detector
//!
//! The taxonomy follows the NudeNet v3 class list. Only the exposed variants
//! of the breast/genitalia/buttocks/anus family count towards censoring.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A detector class label
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NudityLabel {
    FemaleGenitaliaCovered,
    FaceFemale,
    ButtocksExposed,
    FemaleBreastExposed,
    FemaleGenitaliaExposed,
    MaleBreastExposed,
    AnusExposed,
    FeetExposed,
    BellyCovered,
    FeetCovered,
    ArmpitsCovered,
    ArmpitsExposed,
    FaceMale,
    BellyExposed,
    MaleGenitaliaExposed,
    AnusCovered,
    FemaleBreastCovered,
    ButtocksCovered,
    /// Any label the taxonomy does not know; never explicit
    Other(String),
}

/// Known labels in the detector's output index order
const KNOWN: [NudityLabel; 18] = [
    NudityLabel::FemaleGenitaliaCovered,
    NudityLabel::FaceFemale,
    NudityLabel::ButtocksExposed,
    NudityLabel::FemaleBreastExposed,
    NudityLabel::FemaleGenitaliaExposed,
    NudityLabel::MaleBreastExposed,
    NudityLabel::AnusExposed,
    NudityLabel::FeetExposed,
    NudityLabel::BellyCovered,
    NudityLabel::FeetCovered,
    NudityLabel::ArmpitsCovered,
    NudityLabel::ArmpitsExposed,
    NudityLabel::FaceMale,
    NudityLabel::BellyExposed,
    NudityLabel::MaleGenitaliaExposed,
    NudityLabel::AnusCovered,
    NudityLabel::FemaleBreastCovered,
    NudityLabel::ButtocksCovered,
];

impl NudityLabel {
    /// Number of classes in the known taxonomy
    pub const CLASS_COUNT: usize = KNOWN.len();

    /// Parse a class name such as `FEMALE_BREAST_EXPOSED`
    ///
    /// Unknown names are kept verbatim as [`NudityLabel::Other`].
    #[must_use]
    pub fn parse(name: &str) -> Self {
        let normalized = name.trim().to_ascii_uppercase();
        KNOWN
            .iter()
            .find(|label| label.as_str() == normalized)
            .cloned()
            .unwrap_or_else(|| Self::Other(name.trim().to_string()))
    }

    /// Label for a model output class index
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        KNOWN.get(index).cloned()
    }

    /// Canonical upper-snake-case class name
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::FemaleGenitaliaCovered => "FEMALE_GENITALIA_COVERED",
            Self::FaceFemale => "FACE_FEMALE",
            Self::ButtocksExposed => "BUTTOCKS_EXPOSED",
            Self::FemaleBreastExposed => "FEMALE_BREAST_EXPOSED",
            Self::FemaleGenitaliaExposed => "FEMALE_GENITALIA_EXPOSED",
            Self::MaleBreastExposed => "MALE_BREAST_EXPOSED",
            Self::AnusExposed => "ANUS_EXPOSED",
            Self::FeetExposed => "FEET_EXPOSED",
            Self::BellyCovered => "BELLY_COVERED",
            Self::FeetCovered => "FEET_COVERED",
            Self::ArmpitsCovered => "ARMPITS_COVERED",
            Self::ArmpitsExposed => "ARMPITS_EXPOSED",
            Self::FaceMale => "FACE_MALE",
            Self::BellyExposed => "BELLY_EXPOSED",
            Self::MaleGenitaliaExposed => "MALE_GENITALIA_EXPOSED",
            Self::AnusCovered => "ANUS_COVERED",
            Self::FemaleBreastCovered => "FEMALE_BREAST_COVERED",
            Self::ButtocksCovered => "BUTTOCKS_COVERED",
            Self::Other(name) => name,
        }
    }

    /// Whether the label names an explicit body region
    ///
    /// Male chest is not part of the explicit family.
    #[must_use]
    pub const fn is_explicit_region(&self) -> bool {
        matches!(
            self,
            Self::FemaleBreastExposed
                | Self::FemaleBreastCovered
                | Self::FemaleGenitaliaExposed
                | Self::FemaleGenitaliaCovered
                | Self::MaleGenitaliaExposed
                | Self::ButtocksExposed
                | Self::ButtocksCovered
                | Self::AnusExposed
                | Self::AnusCovered
        )
    }

    /// Whether the region is reported as exposed rather than covered
    #[must_use]
    pub const fn is_exposed(&self) -> bool {
        matches!(
            self,
            Self::ButtocksExposed
                | Self::FemaleBreastExposed
                | Self::FemaleGenitaliaExposed
                | Self::MaleBreastExposed
                | Self::AnusExposed
                | Self::FeetExposed
                | Self::ArmpitsExposed
                | Self::BellyExposed
                | Self::MaleGenitaliaExposed
        )
    }

    /// Explicit region and exposed
    #[must_use]
    pub const fn is_explicit_exposure(&self) -> bool {
        self.is_explicit_region() && self.is_exposed()
    }
}

impl fmt::Display for NudityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for NudityLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NudityLabel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::parse(&name))
    }
}
