//! # Muster Core
//!
//! The deterministic livestock lifecycle staging engine.
//!
//! Two operations make up the public surface:
//!
//! - [`classify`] — pure rule table: (animal snapshot, reference
//!   instant, configuration) → stage code. Total and infallible; the
//!   worst case is [`StageCode::Undetermined`].
//! - [`simulate`] — lifecycle projection: steps a reproductive/nursing
//!   state machine across a date range, re-classifying at every step,
//!   and returns the sparse stage change log.
//!
//! The crate performs no I/O and keeps no global state. Randomness (the
//! pregnancy confirmation test) enters only through an injected
//! [`rand::Rng`], so a fixed seed reproduces a simulation exactly.
//! Callers retrieve and persist records themselves and hand the core
//! one normalized [`AnimalSnapshot`] per call; [`RawAnimalRecord`] and
//! [`AnimalSnapshot::from_raw`] cover the untyped boundary.

pub mod classifier;
pub mod config;
pub mod dates;
pub mod error;
pub mod simulator;
pub mod snapshot;
pub mod stage;

pub use classifier::{classify, classify_on};
pub use config::{
    DEFAULT_BREEDING_WAIT_DAYS, DEFAULT_CONFIRMATION_DELAY_DAYS, DEFAULT_CONFIRMATION_PROBABILITY,
    DEFAULT_GESTATION_DAYS, DEFAULT_WEANING_AGE_DAYS, Granularity, LifecycleConfig,
};
pub use error::SimulationError;
pub use simulator::{StageChange, simulate, simulate_many};
pub use snapshot::{AdminGroup, AnimalSnapshot, RawAnimalRecord, RawCount, Sex};
pub use stage::{ALL_STAGES, StageCode, UnknownStageCode};
