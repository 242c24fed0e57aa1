//! # Stage Classifier
//!
//! The full lifecycle rule table: (animal snapshot, reference instant,
//! configuration) → stage code.
//!
//! `classify` is pure, total and deterministic. It never fails — every
//! malformed or absent input degrades to a safe default, and the worst
//! case is `Undetermined`, because the surrounding system depends on
//! always having a displayable classification.
//!
//! Rule precedence encodes a biological ordering: administrative status
//! overrides everything; juvenile growth dominates until sexual/market
//! maturity; among mature females, an active pregnancy or active nursing
//! always beats an inferred "awaiting breeding" default, because those
//! are directly observed facts.

use crate::config::LifecycleConfig;
use crate::dates::age_in_days;
use crate::snapshot::{AdminGroup, AnimalSnapshot, Sex};
use crate::stage::StageCode;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

// =============================================================================
// AGE BANDS (days, inclusive upper bounds)
// =============================================================================

const NEWBORN_MAX_AGE: i64 = 60;
const CALF_WITH_DAM_MAX_AGE: i64 = 120;
const WEANED_MAX_AGE: i64 = 210;
const JUVENILE_MAX_AGE: i64 = 360;
const SUB_ADULT_MAX_AGE: i64 = 540;
const FATTENING_18_20_MAX_AGE: i64 = 600;
const FATTENING_SMALL_MAX_AGE: i64 = 690;
const FATTENING_LARGE_MAX_AGE: i64 = 720;

/// Pregnancy bands (days pregnant, inclusive upper bounds).
const PREGNANT_EARLY_MAX_DAYS: u32 = 210;
const PREGNANT_LATE_MAX_DAYS: u32 = 270;

/// Nursing band split: a calf this old or younger is a "small" calf.
const NURSING_SMALL_MAX_DAYS: u32 = 60;

// =============================================================================
// CLASSIFICATION
// =============================================================================

/// Classify an animal's lifecycle stage at a reference instant.
///
/// Day arithmetic uses the date component of `at`; the time of day is
/// accepted so callers can pass wall-clock "now" unchanged.
///
/// First match wins, in this order:
///
/// 1. Administrative overrides (breeding bull, quarantine, and the
///    already-quarantined special case).
/// 2. Juvenile age bands.
/// 3. Sub-adult bands (male fattening / heifer awaiting breeding).
/// 4. Male terminal fattening bands.
/// 5. Female fattening bands, gated on the fattening-transfer group.
/// 6. Female reproductive state (pregnancy, then nursing, then the
///    waiting/bred defaults).
/// 7. Reproduction-treatment fallback, then `Undetermined`.
#[must_use]
pub fn classify(snapshot: &AnimalSnapshot, at: NaiveDateTime, config: &LifecycleConfig) -> StageCode {
    let on = at.date();
    let age = snapshot.birth_date.map(|birth| age_in_days(birth, on));

    // ── Rule 1: administrative overrides ────────────────────────────
    match snapshot.group {
        AdminGroup::BreedingBull => return StageCode::BreedingBull,
        AdminGroup::Quarantine => return StageCode::Quarantine,
        _ => {}
    }
    // An animal already staged as quarantined stays quarantined until
    // its group carries a recognized assignment again.
    if snapshot.current_stage == Some(StageCode::Quarantine) && !snapshot.group.is_assigned() {
        return StageCode::Quarantine;
    }

    if let Some(age) = age {
        // ── Rule 2: juvenile bands ──────────────────────────────────
        if age <= NEWBORN_MAX_AGE {
            return StageCode::NewbornCalf;
        }
        if age <= CALF_WITH_DAM_MAX_AGE {
            return StageCode::CalfWithDam;
        }
        if age <= WEANED_MAX_AGE {
            return StageCode::WeanedCalf;
        }
        if age <= JUVENILE_MAX_AGE {
            match snapshot.sex {
                Sex::Male => return StageCode::MaleGrowing,
                Sex::Female => return StageCode::FemaleReplacement,
                Sex::Unknown => {}
            }
        }

        // ── Rule 3: sub-adult bands ─────────────────────────────────
        if age > JUVENILE_MAX_AGE && age <= SUB_ADULT_MAX_AGE {
            match snapshot.sex {
                Sex::Male => return StageCode::FatteningBeef,
                Sex::Female if snapshot.pregnancy_days == 0 => {
                    return StageCode::FemaleAwaitingBreeding;
                }
                _ => {}
            }
        }

        // ── Rule 4: male terminal bands ─────────────────────────────
        if snapshot.sex == Sex::Male {
            if age > SUB_ADULT_MAX_AGE && age <= FATTENING_18_20_MAX_AGE {
                return StageCode::FatteningBeef18to20;
            }
            if age > FATTENING_18_20_MAX_AGE && age <= FATTENING_SMALL_MAX_AGE {
                return StageCode::FatteningSmall;
            }
            if age > FATTENING_SMALL_MAX_AGE && age <= FATTENING_LARGE_MAX_AGE {
                return StageCode::FatteningLarge;
            }
            if age > FATTENING_LARGE_MAX_AGE {
                return StageCode::MaleReadyForSale;
            }
        }

        // ── Rule 5: female fattening, gated on the transfer group ───
        if snapshot.sex == Sex::Female && snapshot.group == AdminGroup::FatteningTransfer {
            if age > FATTENING_18_20_MAX_AGE && age <= FATTENING_SMALL_MAX_AGE {
                return StageCode::FatteningSmall;
            }
            if age > FATTENING_SMALL_MAX_AGE && age <= FATTENING_LARGE_MAX_AGE {
                return StageCode::FatteningLarge;
            }
            if age > FATTENING_LARGE_MAX_AGE {
                return StageCode::FemaleReadyForSale;
            }
        }
    }

    // ── Rule 6: female reproductive state ───────────────────────────
    if snapshot.sex == Sex::Female {
        if snapshot.pregnancy_days > 0 {
            if snapshot.pregnancy_days <= PREGNANT_EARLY_MAX_DAYS {
                return StageCode::PregnantEarly;
            }
            if snapshot.pregnancy_days <= PREGNANT_LATE_MAX_DAYS {
                return StageCode::PregnantLate;
            }
            return StageCode::AwaitingCalving;
        }

        if let Some(calf_age) = snapshot.nursing_calf_age_days {
            if calf_age <= NURSING_SMALL_MAX_DAYS {
                return StageCode::NursingSmallCalf;
            }
            if calf_age <= config.weaning_age_days {
                return StageCode::NursingLargeCalf;
            }
            // Calf weaned; the dam is back in the breeding pool.
            return StageCode::AwaitingBreeding;
        }

        if age.is_some_and(|a| a > SUB_ADULT_MAX_AGE) {
            return StageCode::AwaitingBreeding;
        }
        // Mature female with no other signal.
        return StageCode::RecentlyBred;
    }

    // ── Rule 7: late fallbacks ──────────────────────────────────────
    if snapshot.group == AdminGroup::ReproductionTreatment {
        return StageCode::ReproductionTreatment;
    }

    StageCode::Undetermined
}

/// Classify at midnight of a calendar date.
#[must_use]
pub fn classify_on(snapshot: &AnimalSnapshot, on: NaiveDate, config: &LifecycleConfig) -> StageCode {
    classify(snapshot, on.and_time(NaiveTime::MIN), config)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;

    const REF: &str = "2026-06-01";

    fn reference() -> NaiveDate {
        REF.parse().expect("valid reference date")
    }

    /// Snapshot for an animal exactly `age` days old on the reference
    /// date (birth day counts as day 1).
    fn aged(age: u64, sex: Sex) -> AnimalSnapshot {
        AnimalSnapshot {
            birth_date: reference().checked_sub_days(Days::new(age - 1)),
            sex,
            ..AnimalSnapshot::default()
        }
    }

    fn stage_of(snapshot: &AnimalSnapshot) -> StageCode {
        classify_on(snapshot, reference(), &LifecycleConfig::default())
    }

    #[test]
    fn juvenile_bands() {
        assert_eq!(stage_of(&aged(1, Sex::Male)), StageCode::NewbornCalf);
        assert_eq!(stage_of(&aged(60, Sex::Female)), StageCode::NewbornCalf);
        assert_eq!(stage_of(&aged(61, Sex::Female)), StageCode::CalfWithDam);
        assert_eq!(stage_of(&aged(120, Sex::Male)), StageCode::CalfWithDam);
        assert_eq!(stage_of(&aged(121, Sex::Male)), StageCode::WeanedCalf);
        assert_eq!(stage_of(&aged(210, Sex::Female)), StageCode::WeanedCalf);
        assert_eq!(stage_of(&aged(211, Sex::Male)), StageCode::MaleGrowing);
        assert_eq!(stage_of(&aged(360, Sex::Male)), StageCode::MaleGrowing);
        assert_eq!(stage_of(&aged(211, Sex::Female)), StageCode::FemaleReplacement);
        assert_eq!(stage_of(&aged(360, Sex::Female)), StageCode::FemaleReplacement);
    }

    #[test]
    fn sub_adult_bands() {
        assert_eq!(stage_of(&aged(361, Sex::Male)), StageCode::FatteningBeef);
        assert_eq!(stage_of(&aged(540, Sex::Male)), StageCode::FatteningBeef);
        assert_eq!(
            stage_of(&aged(400, Sex::Female)),
            StageCode::FemaleAwaitingBreeding
        );
        assert_eq!(
            stage_of(&aged(540, Sex::Female)),
            StageCode::FemaleAwaitingBreeding
        );
    }

    #[test]
    fn male_terminal_bands() {
        assert_eq!(stage_of(&aged(541, Sex::Male)), StageCode::FatteningBeef18to20);
        assert_eq!(stage_of(&aged(600, Sex::Male)), StageCode::FatteningBeef18to20);
        assert_eq!(stage_of(&aged(601, Sex::Male)), StageCode::FatteningSmall);
        assert_eq!(stage_of(&aged(690, Sex::Male)), StageCode::FatteningSmall);
        assert_eq!(stage_of(&aged(691, Sex::Male)), StageCode::FatteningLarge);
        assert_eq!(stage_of(&aged(720, Sex::Male)), StageCode::FatteningLarge);
        assert_eq!(stage_of(&aged(721, Sex::Male)), StageCode::MaleReadyForSale);
        assert_eq!(stage_of(&aged(750, Sex::Male)), StageCode::MaleReadyForSale);
    }

    #[test]
    fn administrative_overrides_beat_biology() {
        let mut bull = aged(750, Sex::Male);
        bull.group = AdminGroup::BreedingBull;
        assert_eq!(stage_of(&bull), StageCode::BreedingBull);

        let mut quarantined = aged(100, Sex::Female);
        quarantined.group = AdminGroup::Quarantine;
        assert_eq!(stage_of(&quarantined), StageCode::Quarantine);
    }

    #[test]
    fn already_quarantined_stays_quarantined_until_regrouped() {
        let mut snapshot = aged(400, Sex::Female);
        snapshot.current_stage = Some(StageCode::Quarantine);
        assert_eq!(stage_of(&snapshot), StageCode::Quarantine);

        // A recognized reassignment releases the animal back to biology.
        snapshot.group = AdminGroup::FatteningTransfer;
        assert_eq!(stage_of(&snapshot), StageCode::FemaleAwaitingBreeding);
    }

    #[test]
    fn pregnancy_bands() {
        let mut cow = aged(400, Sex::Female);
        cow.pregnancy_days = 100;
        assert_eq!(stage_of(&cow), StageCode::PregnantEarly);
        cow.pregnancy_days = 210;
        assert_eq!(stage_of(&cow), StageCode::PregnantEarly);
        cow.pregnancy_days = 211;
        assert_eq!(stage_of(&cow), StageCode::PregnantLate);
        cow.pregnancy_days = 250;
        assert_eq!(stage_of(&cow), StageCode::PregnantLate);
        cow.pregnancy_days = 270;
        assert_eq!(stage_of(&cow), StageCode::PregnantLate);
        cow.pregnancy_days = 271;
        assert_eq!(stage_of(&cow), StageCode::AwaitingCalving);
    }

    #[test]
    fn pregnancy_beats_treatment_group() {
        let mut cow = aged(600, Sex::Female);
        cow.pregnancy_days = 100;
        cow.group = AdminGroup::ReproductionTreatment;
        assert_eq!(stage_of(&cow), StageCode::PregnantEarly);
    }

    #[test]
    fn nursing_bands_and_weaning() {
        let mut cow = AnimalSnapshot {
            sex: Sex::Female,
            ..AnimalSnapshot::default()
        };
        cow.nursing_calf_age_days = Some(30);
        assert_eq!(stage_of(&cow), StageCode::NursingSmallCalf);
        cow.nursing_calf_age_days = Some(60);
        assert_eq!(stage_of(&cow), StageCode::NursingSmallCalf);
        cow.nursing_calf_age_days = Some(61);
        assert_eq!(stage_of(&cow), StageCode::NursingLargeCalf);
        cow.nursing_calf_age_days = Some(120);
        assert_eq!(stage_of(&cow), StageCode::NursingLargeCalf);
        cow.nursing_calf_age_days = Some(121);
        assert_eq!(stage_of(&cow), StageCode::AwaitingBreeding);
    }

    #[test]
    fn weaning_threshold_is_configurable() {
        let cow = AnimalSnapshot {
            sex: Sex::Female,
            nursing_calf_age_days: Some(100),
            ..AnimalSnapshot::default()
        };
        let short_weaning = LifecycleConfig {
            weaning_age_days: 90,
            ..LifecycleConfig::default()
        };
        assert_eq!(
            classify_on(&cow, reference(), &short_weaning),
            StageCode::AwaitingBreeding
        );
    }

    #[test]
    fn pregnancy_beats_nursing() {
        let mut cow = aged(700, Sex::Female);
        cow.pregnancy_days = 50;
        cow.nursing_calf_age_days = Some(30);
        assert_eq!(stage_of(&cow), StageCode::PregnantEarly);
    }

    #[test]
    fn mature_female_defaults() {
        // Past the sub-adult bound with no signals: back in the pool.
        assert_eq!(stage_of(&aged(541, Sex::Female)), StageCode::AwaitingBreeding);
        assert_eq!(stage_of(&aged(800, Sex::Female)), StageCode::AwaitingBreeding);

        // No birth date, no signals: assumed recently bred.
        let cow = AnimalSnapshot {
            sex: Sex::Female,
            ..AnimalSnapshot::default()
        };
        assert_eq!(stage_of(&cow), StageCode::RecentlyBred);
    }

    #[test]
    fn fattening_transfer_gates_female_fattening() {
        let mut cow = aged(650, Sex::Female);
        assert_eq!(stage_of(&cow), StageCode::AwaitingBreeding);

        cow.group = AdminGroup::FatteningTransfer;
        assert_eq!(stage_of(&cow), StageCode::FatteningSmall);

        let mut cow = aged(700, Sex::Female);
        cow.group = AdminGroup::FatteningTransfer;
        assert_eq!(stage_of(&cow), StageCode::FatteningLarge);

        let mut cow = aged(750, Sex::Female);
        cow.group = AdminGroup::FatteningTransfer;
        assert_eq!(stage_of(&cow), StageCode::FemaleReadyForSale);
    }

    #[test]
    fn unknown_sex_without_group_is_undetermined() {
        assert_eq!(stage_of(&aged(400, Sex::Unknown)), StageCode::Undetermined);
        assert_eq!(
            stage_of(&AnimalSnapshot::default()),
            StageCode::Undetermined
        );
    }

    #[test]
    fn treatment_group_is_a_fallback_only() {
        let mut snapshot = aged(400, Sex::Unknown);
        snapshot.group = AdminGroup::ReproductionTreatment;
        assert_eq!(stage_of(&snapshot), StageCode::ReproductionTreatment);
    }

    #[test]
    fn missing_birth_date_skips_age_rules() {
        let bull = AnimalSnapshot {
            sex: Sex::Male,
            ..AnimalSnapshot::default()
        };
        assert_eq!(stage_of(&bull), StageCode::Undetermined);
    }

    #[test]
    fn classification_is_stable_across_repeated_calls() {
        let cow = aged(400, Sex::Female);
        let first = stage_of(&cow);
        for _ in 0..10 {
            assert_eq!(stage_of(&cow), first);
        }
    }

    #[test]
    fn time_of_day_does_not_change_the_result() {
        let cow = aged(400, Sex::Female);
        let config = LifecycleConfig::default();
        let midnight = classify_on(&cow, reference(), &config);
        let evening = classify(
            &cow,
            reference().and_hms_opt(18, 45, 0).expect("valid time"),
            &config,
        );
        assert_eq!(midnight, evening);
    }
}
