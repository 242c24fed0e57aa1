//! # Animal Snapshot
//!
//! The immutable input record the staging engine operates on, plus the
//! boundary normalization that turns an untyped storage record into one.
//!
//! Normalization never fails: malformed dates degrade to "unknown",
//! malformed numerics degrade to zero/absent, and unrecognized free-text
//! sex or group values map to an explicit `Unknown` variant instead of
//! silently falling through.

use crate::dates::parse_date;
use crate::stage::StageCode;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// =============================================================================
// CLOSED ENUMS
// =============================================================================

/// Biological sex, normalized from free-text synonyms at the boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
    #[default]
    Unknown,
}

impl Sex {
    /// Map a free-text sex value onto the closed enum.
    ///
    /// Recognized synonyms (case-insensitive, trimmed): `m`, `male`,
    /// `bull`, `steer` for males; `f`, `female`, `cow`, `heifer` for
    /// females. Anything else is `Unknown`.
    #[must_use]
    pub fn normalize(raw: &str) -> Self {
        let lowered = raw.trim().to_ascii_lowercase();
        match lowered.as_str() {
            "m" | "male" | "bull" | "steer" => Self::Male,
            "f" | "female" | "cow" | "heifer" => Self::Female,
            _ => Self::Unknown,
        }
    }
}

/// Administrative grouping assigned by the caller, independent of biology.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdminGroup {
    /// No administrative assignment.
    #[default]
    None,
    BreedingBull,
    Quarantine,
    FatteningTransfer,
    ReproductionTreatment,
    /// A value was present but not recognized. Treated like `None` by
    /// the rule table.
    Unknown,
}

impl AdminGroup {
    /// Map a free-text group value onto the closed enum.
    ///
    /// Matching is case-insensitive and separator-insensitive:
    /// `breeding-bull`, `breeding_bull` and `BreedingBull` are the same
    /// assignment. Empty input means no assignment.
    #[must_use]
    pub fn normalize(raw: &str) -> Self {
        let folded: String = raw
            .trim()
            .chars()
            .filter(|&c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();
        match folded.as_str() {
            "" | "none" => Self::None,
            "breedingbull" => Self::BreedingBull,
            "quarantine" => Self::Quarantine,
            "fatteningtransfer" => Self::FatteningTransfer,
            "reproductiontreatment" => Self::ReproductionTreatment,
            _ => Self::Unknown,
        }
    }

    /// Whether this is a recognized, explicit assignment.
    #[must_use]
    pub fn is_assigned(&self) -> bool {
        !matches!(self, Self::None | Self::Unknown)
    }
}

// =============================================================================
// SNAPSHOT
// =============================================================================

/// One animal record as seen by the staging engine.
///
/// Owned by the caller and never mutated by the core. The simulator
/// builds transient copies with derived pregnancy/nursing values, but
/// the original snapshot is left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimalSnapshot {
    /// Birth date; absent means age-based rules are skipped.
    pub birth_date: Option<NaiveDate>,
    /// Normalized sex.
    pub sex: Sex,
    /// Days pregnant; 0 means not pregnant.
    pub pregnancy_days: u32,
    /// Age in days of the calf this animal is nursing; absent means not
    /// nursing.
    pub nursing_calf_age_days: Option<u32>,
    /// Administrative override group.
    pub group: AdminGroup,
    /// Stage the record currently carries in storage. Only consulted for
    /// special-case lookups (an already-quarantined animal stays
    /// quarantined until regrouped).
    pub current_stage: Option<StageCode>,
}

impl AnimalSnapshot {
    /// Build a snapshot from an untyped storage record.
    ///
    /// This is the single normalization point: after it, the core never
    /// sees free text. It cannot fail — every malformed field degrades
    /// to its safe default.
    #[must_use]
    pub fn from_raw(raw: &RawAnimalRecord) -> Self {
        Self {
            birth_date: raw.birth_date.as_deref().and_then(parse_date),
            sex: raw.sex.as_deref().map(Sex::normalize).unwrap_or_default(),
            pregnancy_days: raw
                .pregnancy_days
                .as_ref()
                .and_then(RawCount::as_days)
                .unwrap_or(0),
            nursing_calf_age_days: raw.nursing_calf_age_days.as_ref().and_then(RawCount::as_days),
            group: raw
                .group
                .as_deref()
                .map(AdminGroup::normalize)
                .unwrap_or_default(),
            current_stage: raw
                .current_stage
                .as_deref()
                .and_then(|s| s.parse::<StageCode>().ok()),
        }
    }
}

// =============================================================================
// RAW RECORD (storage representation)
// =============================================================================

/// The untyped shape animal records arrive in from storage exports.
///
/// Every field is optional and stringly typed except the day counts,
/// which storage layers variously emit as integers, floats or strings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAnimalRecord {
    /// Ear-tag identifier, passed through to reports untouched.
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub sex: Option<String>,
    #[serde(default)]
    pub pregnancy_days: Option<RawCount>,
    #[serde(default)]
    pub nursing_calf_age_days: Option<RawCount>,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub current_stage: Option<String>,
}

/// A day count as it appears in the wild: integer, float or string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawCount {
    Int(i64),
    Float(f64),
    Text(String),
}

impl RawCount {
    /// Interpret the raw value as a non-negative whole number of days.
    ///
    /// Fractional days round up (a test result of "10.2 days pregnant"
    /// counts as 11), negatives clamp to zero, and unparsable text is
    /// `None`.
    #[must_use]
    pub fn as_days(&self) -> Option<u32> {
        match self {
            Self::Int(n) => Some((*n).max(0) as u32),
            Self::Float(f) => {
                if f.is_finite() {
                    Some(f.ceil().max(0.0) as u32)
                } else {
                    None
                }
            }
            Self::Text(s) => {
                let s = s.trim();
                if let Ok(n) = s.parse::<i64>() {
                    Some(n.max(0) as u32)
                } else if let Ok(f) = s.parse::<f64>() {
                    if f.is_finite() {
                        Some(f.ceil().max(0.0) as u32)
                    } else {
                        None
                    }
                } else {
                    None
                }
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
