//! # Stage Registry
//!
//! The closed enumeration of lifecycle stage codes and their
//! human-readable names. This is a pure lookup table: no rule logic
//! lives here.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// STAGE CODES
// =============================================================================

/// Symbolic classification of an animal's current lifecycle phase.
///
/// The set is closed: juvenile stages, growth/fattening stages (male and
/// female variants), reproductive stages, administrative stages, and the
/// `Undetermined` fallback. Callers render codes through
/// [`StageCode::display_name`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StageCode {
    // Juvenile
    NewbornCalf,
    CalfWithDam,
    WeanedCalf,
    MaleGrowing,
    FemaleReplacement,

    // Growth / fattening
    FatteningBeef,
    FatteningBeef18to20,
    FatteningSmall,
    FatteningLarge,
    MaleReadyForSale,
    FemaleReadyForSale,

    // Reproductive
    FemaleAwaitingBreeding,
    AwaitingBreeding,
    RecentlyBred,
    PregnantEarly,
    PregnantLate,
    AwaitingCalving,
    NursingSmallCalf,
    NursingLargeCalf,

    // Administrative
    BreedingBull,
    Quarantine,
    ReproductionTreatment,

    // Fallback
    Undetermined,
}

/// Every stage code, in registry order.
pub const ALL_STAGES: [StageCode; 23] = [
    StageCode::NewbornCalf,
    StageCode::CalfWithDam,
    StageCode::WeanedCalf,
    StageCode::MaleGrowing,
    StageCode::FemaleReplacement,
    StageCode::FatteningBeef,
    StageCode::FatteningBeef18to20,
    StageCode::FatteningSmall,
    StageCode::FatteningLarge,
    StageCode::MaleReadyForSale,
    StageCode::FemaleReadyForSale,
    StageCode::FemaleAwaitingBreeding,
    StageCode::AwaitingBreeding,
    StageCode::RecentlyBred,
    StageCode::PregnantEarly,
    StageCode::PregnantLate,
    StageCode::AwaitingCalving,
    StageCode::NursingSmallCalf,
    StageCode::NursingLargeCalf,
    StageCode::BreedingBull,
    StageCode::Quarantine,
    StageCode::ReproductionTreatment,
    StageCode::Undetermined,
];

impl StageCode {
    /// The symbolic code as a string, stable across releases.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NewbornCalf => "NewbornCalf",
            Self::CalfWithDam => "CalfWithDam",
            Self::WeanedCalf => "WeanedCalf",
            Self::MaleGrowing => "MaleGrowing",
            Self::FemaleReplacement => "FemaleReplacement",
            Self::FatteningBeef => "FatteningBeef",
            Self::FatteningBeef18to20 => "FatteningBeef18to20",
            Self::FatteningSmall => "FatteningSmall",
            Self::FatteningLarge => "FatteningLarge",
            Self::MaleReadyForSale => "MaleReadyForSale",
            Self::FemaleReadyForSale => "FemaleReadyForSale",
            Self::FemaleAwaitingBreeding => "FemaleAwaitingBreeding",
            Self::AwaitingBreeding => "AwaitingBreeding",
            Self::RecentlyBred => "RecentlyBred",
            Self::PregnantEarly => "PregnantEarly",
            Self::PregnantLate => "PregnantLate",
            Self::AwaitingCalving => "AwaitingCalving",
            Self::NursingSmallCalf => "NursingSmallCalf",
            Self::NursingLargeCalf => "NursingLargeCalf",
            Self::BreedingBull => "BreedingBull",
            Self::Quarantine => "Quarantine",
            Self::ReproductionTreatment => "ReproductionTreatment",
            Self::Undetermined => "Undetermined",
        }
    }

    /// Human-readable stage name for display surfaces.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::NewbornCalf => "Newborn calf (0-2 months)",
            Self::CalfWithDam => "Calf with dam (>2-4 months)",
            Self::WeanedCalf => "Weaned calf (>4-7 months)",
            Self::MaleGrowing => "Growing male (>7-12 months)",
            Self::FemaleReplacement => "Replacement heifer (>7-12 months)",
            Self::FatteningBeef => "Fattening beef (>12-18 months)",
            Self::FatteningBeef18to20 => "Fattening beef (>18-20 months)",
            Self::FatteningSmall => "Fattening, small frame",
            Self::FatteningLarge => "Fattening, large frame",
            Self::MaleReadyForSale => "Finished male, ready for sale",
            Self::FemaleReadyForSale => "Finished female, ready for sale",
            Self::FemaleAwaitingBreeding => "Replacement heifer awaiting breeding (>12-18 months)",
            Self::AwaitingBreeding => "Cow awaiting breeding",
            Self::RecentlyBred => "Recently bred cow",
            Self::PregnantEarly => "Pregnant (2-7 months)",
            Self::PregnantLate => "Pregnant (8-9 months)",
            Self::AwaitingCalving => "Awaiting calving (>9 months)",
            Self::NursingSmallCalf => "Nursing cow, calf 0-2 months",
            Self::NursingLargeCalf => "Nursing cow, calf >2-4 months",
            Self::BreedingBull => "Breeding bull",
            Self::Quarantine => "Quarantined",
            Self::ReproductionTreatment => "Reproductive treatment",
            Self::Undetermined => "Undetermined",
        }
    }

    /// Whether this code is one of the administrative stages.
    #[must_use]
    pub fn is_administrative(&self) -> bool {
        matches!(
            self,
            Self::BreedingBull | Self::Quarantine | Self::ReproductionTreatment
        )
    }
}

impl fmt::Display for StageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a recognized stage code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown stage code: {0}")]
pub struct UnknownStageCode(pub String);

impl FromStr for StageCode {
    type Err = UnknownStageCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        ALL_STAGES
            .iter()
            .find(|code| code.as_str().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| UnknownStageCode(s.to_string()))
    }
}

// =============================================================================
// TESTS
// =============================================================================
