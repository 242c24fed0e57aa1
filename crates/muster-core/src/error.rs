//! # Error Types
//!
//! Classification has no failure mode — it always returns a stage code.
//! Only the simulator can fail, and only at the per-record boundary.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors produced by a single simulation run.
///
/// These are captured per record by [`crate::simulator::simulate_many`]
/// and never abort a batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulationError {
    /// The requested range ends before it starts.
    #[error("simulation range is inverted: start {start} is after end {end}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },

    /// Calendar arithmetic left the representable date range.
    #[error("calendar arithmetic overflowed")]
    CalendarOverflow,
}
