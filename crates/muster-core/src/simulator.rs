//! # Lifecycle Simulator
//!
//! Projects how an animal's classified stage evolves across a future
//! date range by stepping a reproductive/nursing state machine and
//! re-classifying at every step.
//!
//! ## Step protocol
//!
//! ```text
//! Step 1  Materialize a transient snapshot view from the state
//!         (derived pregnancy duration / nursing calf age)
//! Step 2  Classify it at the step date (wall-clock "now" for the step
//!         matching today)
//! Step 3  Record a change entry when the stage differs from the last
//! Step 4  Apply event transitions in fixed order:
//!           breeding → confirmation test → calving → weaning
//! Step 5  Advance to the next step date
//! ```
//!
//! Probability draws use the injected generator only, so a fixed seed
//! reproduces a run exactly.

use crate::classifier::classify;
use crate::config::{Granularity, LifecycleConfig};
use crate::dates::days_between;
use crate::error::SimulationError;
use crate::snapshot::AnimalSnapshot;
use crate::stage::StageCode;
use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime};
use rand::Rng;
use serde::{Deserialize, Serialize};

// =============================================================================
// CHANGE LOG
// =============================================================================

/// One entry of the sparse stage change log: the date a new stage takes
/// effect, and the stage itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageChange {
    pub date: NaiveDate,
    pub stage: StageCode,
}

impl StageChange {
    /// Create a change entry.
    #[must_use]
    pub fn new(date: NaiveDate, stage: StageCode) -> Self {
        Self { date, stage }
    }
}

// =============================================================================
// SIMULATION STATE
// =============================================================================

/// Private per-run reproductive/nursing state.
///
/// One instance exists per simulation run, owned by the run and never
/// aliased to the input snapshot; it is discarded when the run
/// completes. At most one of `pregnancy_start` and `last_breed` is set,
/// and `pregnancy_start` and `nursing_calf_age` are mutually exclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct SimulationState {
    /// Set when pregnancy is confirmed; cleared on calving.
    pregnancy_start: Option<NaiveDate>,
    /// Set when a breeding event occurs; cleared on confirmation or a
    /// negative test.
    last_breed: Option<NaiveDate>,
    /// Set when the animal enters the awaiting-breeding pool; cleared
    /// on breeding.
    waiting_since: Option<NaiveDate>,
    /// Advanced per step; cleared at weaning.
    nursing_calf_age: Option<u32>,
    /// Last stage recorded in the change log.
    last_stage: Option<StageCode>,
}

impl SimulationState {
    /// Seed the state machine from the snapshot at the start of a run.
    ///
    /// A pregnancy on the snapshot maps to a synthetic start date so the
    /// derived duration matches; it wins over a conflicting nursing
    /// state. With neither set, the stage classified at the start date
    /// seeds the reproductive machine.
    fn seed(
        snapshot: &AnimalSnapshot,
        start: NaiveDate,
        start_at: NaiveDateTime,
        config: &LifecycleConfig,
    ) -> Result<Self, SimulationError> {
        let mut state = Self::default();

        if snapshot.pregnancy_days > 0 {
            state.pregnancy_start = Some(
                start
                    .checked_sub_days(Days::new(u64::from(snapshot.pregnancy_days)))
                    .ok_or(SimulationError::CalendarOverflow)?,
            );
        } else if let Some(calf_age) = snapshot.nursing_calf_age_days {
            state.nursing_calf_age = Some(calf_age);
        } else {
            match classify(snapshot, start_at, config) {
                StageCode::RecentlyBred => state.last_breed = Some(start),
                StageCode::AwaitingBreeding | StageCode::FemaleAwaitingBreeding => {
                    state.waiting_since = Some(start);
                }
                _ => {}
            }
        }

        Ok(state)
    }

    /// Transient snapshot view with pregnancy/nursing derived from the
    /// state as of `on`. The caller's snapshot is never mutated.
    fn view(&self, base: &AnimalSnapshot, on: NaiveDate) -> AnimalSnapshot {
        AnimalSnapshot {
            pregnancy_days: self
                .pregnancy_start
                .map(|started| days_between(started, on).max(0) as u32)
                .unwrap_or(0),
            nursing_calf_age_days: self.nursing_calf_age,
            ..base.clone()
        }
    }
}

// =============================================================================
// SIMULATION
// =============================================================================

/// Simulate an animal's stage changes from `start` to `end` inclusive.
///
/// Returns the sparse change log: every date on which the classified
/// stage changes, always including the stage at `start`. Output dates
/// are strictly increasing and bounded by the range.
///
/// `reference_now` is the caller's wall-clock instant; the step whose
/// date matches it classifies at that instant instead of midnight, so
/// the projection agrees with the finer-grained current-state display.
pub fn simulate(
    snapshot: &AnimalSnapshot,
    start: NaiveDate,
    end: NaiveDate,
    reference_now: NaiveDateTime,
    config: &LifecycleConfig,
    rng: &mut impl Rng,
) -> Result<Vec<StageChange>, SimulationError> {
    if start > end {
        return Err(SimulationError::InvertedRange { start, end });
    }

    let start_at = step_instant(start, reference_now);
    let mut state = SimulationState::seed(snapshot, start, start_at, config)?;
    let mut changes: Vec<StageChange> = Vec::new();
    let mut cursor = start;

    loop {
        // ── Steps 1-3: classify the derived view, record changes ────
        let viewed = state.view(snapshot, cursor);
        let stage = classify(&viewed, step_instant(cursor, reference_now), config);
        if state.last_stage != Some(stage) {
            record(&mut changes, &mut state, cursor, stage);
        }

        let next = next_step(cursor, config.granularity)?;
        if next > end {
            break;
        }
        let step_days = days_between(cursor, next).max(0) as u32;

        // ── Step 4: event transitions, fixed order ──────────────────
        apply_breeding(&mut state, &mut changes, cursor, config);
        apply_confirmation(&mut state, &mut changes, snapshot, cursor, reference_now, config, rng);
        apply_calving(&mut state, &mut changes, cursor, config);
        apply_weaning(&mut state, cursor, step_days, config);

        // ── Step 5: advance ─────────────────────────────────────────
        cursor = next;
    }

    Ok(changes)
}

/// Simulate a batch of records with one shared generator.
///
/// Each outcome is independent: an error for one record is captured in
/// its slot and never aborts the rest of the batch. Outcomes are in
/// input order.
pub fn simulate_many(
    snapshots: &[AnimalSnapshot],
    start: NaiveDate,
    end: NaiveDate,
    reference_now: NaiveDateTime,
    config: &LifecycleConfig,
    rng: &mut impl Rng,
) -> Vec<Result<Vec<StageChange>, SimulationError>> {
    snapshots
        .iter()
        .map(|snapshot| simulate(snapshot, start, end, reference_now, config, &mut *rng))
        .collect()
}

// =============================================================================
// EVENT TRANSITIONS
// =============================================================================

/// A waiting animal is bred once the breeding wait has elapsed.
fn apply_breeding(
    state: &mut SimulationState,
    changes: &mut Vec<StageChange>,
    on: NaiveDate,
    config: &LifecycleConfig,
) {
    let Some(since) = state.waiting_since else {
        return;
    };
    if state.last_breed.is_some() || state.pregnancy_start.is_some() {
        return;
    }
    if days_between(since, on) >= i64::from(config.breeding_wait_days) {
        state.last_breed = Some(on);
        state.waiting_since = None;
        // The classifier cannot see a breeding event, so force the
        // stage entry here.
        record(changes, state, on, StageCode::RecentlyBred);
    }
}

/// The confirmation test fires a fixed delay after breeding. Success
/// backdates the pregnancy to the breeding date; failure returns the
/// animal to the awaiting-breeding pool.
fn apply_confirmation(
    state: &mut SimulationState,
    changes: &mut Vec<StageChange>,
    snapshot: &AnimalSnapshot,
    on: NaiveDate,
    reference_now: NaiveDateTime,
    config: &LifecycleConfig,
    rng: &mut impl Rng,
) {
    let Some(bred) = state.last_breed else {
        return;
    };
    if state.pregnancy_start.is_some() {
        return;
    }
    if days_between(bred, on) < i64::from(config.confirmation_delay_days) {
        return;
    }

    let probability = if config.confirmation_probability.is_finite() {
        config.confirmation_probability.clamp(0.0, 1.0)
    } else {
        0.0
    };

    if rng.gen_bool(probability) {
        state.pregnancy_start = Some(bred);
        state.last_breed = None;
        // A confirmed pregnancy is already the full test delay along, so
        // the stage moves on the test date, not the step after it.
        let stage = classify(&state.view(snapshot, on), step_instant(on, reference_now), config);
        if state.last_stage != Some(stage) {
            record(changes, state, on, stage);
        }
    } else {
        state.last_breed = None;
        state.waiting_since = Some(on);
    }
}

/// Calving once gestation has run its course: pregnancy ends, a newborn
/// calf starts nursing.
fn apply_calving(
    state: &mut SimulationState,
    changes: &mut Vec<StageChange>,
    on: NaiveDate,
    config: &LifecycleConfig,
) {
    let Some(started) = state.pregnancy_start else {
        return;
    };
    if days_between(started, on) >= i64::from(config.gestation_days) {
        state.pregnancy_start = None;
        state.nursing_calf_age = Some(1);
        record(changes, state, on, StageCode::NursingSmallCalf);
    }
}

/// Advance the nursing calf by the step length; past the weaning age
/// the calf leaves and the dam re-enters the breeding pool.
fn apply_weaning(
    state: &mut SimulationState,
    on: NaiveDate,
    step_days: u32,
    config: &LifecycleConfig,
) {
    let Some(calf_age) = state.nursing_calf_age else {
        return;
    };
    let advanced = calf_age.saturating_add(step_days);
    if advanced > config.weaning_age_days {
        state.nursing_calf_age = None;
        state.waiting_since = Some(on);
    } else {
        state.nursing_calf_age = Some(advanced);
    }
}

// =============================================================================
// STEP HELPERS
// =============================================================================

/// Midnight of the step date, except the step matching "today", which
/// uses the caller's wall-clock instant.
fn step_instant(on: NaiveDate, reference_now: NaiveDateTime) -> NaiveDateTime {
    if on == reference_now.date() {
        reference_now
    } else {
        on.and_time(NaiveTime::MIN)
    }
}

/// The next step date for the configured granularity.
fn next_step(cursor: NaiveDate, granularity: Granularity) -> Result<NaiveDate, SimulationError> {
    let next = match granularity {
        Granularity::Daily => cursor.succ_opt(),
        Granularity::Monthly => {
            if cursor.month() == 12 {
                NaiveDate::from_ymd_opt(cursor.year() + 1, 1, 1)
            } else {
                NaiveDate::from_ymd_opt(cursor.year(), cursor.month() + 1, 1)
            }
        }
    };
    next.ok_or(SimulationError::CalendarOverflow)
}

/// Append a change entry, keeping one entry per date: a forced entry on
/// a date that already has one overwrites it.
fn record(
    changes: &mut Vec<StageChange>,
    state: &mut SimulationState,
    on: NaiveDate,
    stage: StageCode,
) {
    match changes.last_mut() {
        Some(last) if last.date == on => last.stage = stage,
        _ => changes.push(StageChange::new(on, stage)),
    }
    state.last_stage = Some(stage);
}

// =============================================================================
// TESTS
// =============================================================================
