//! # Date Utilities
//!
//! Parsing of heterogeneous date representations into a canonical
//! `NaiveDate`, plus the day-difference helpers the rule table and the
//! simulator are built on.
//!
//! Elapsed-day computations always use calendar-date subtraction, never
//! calendar-month subtraction, so they do not drift across months of
//! varying length.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Date-only formats accepted at the boundary, tried in order.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"];

/// Date-time formats accepted at the boundary; the time component is
/// truncated to the date.
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse a raw date string into a calendar date.
///
/// Accepts ISO dates (`2024-03-01`), slash-separated dates (`2024/03/01`,
/// `01/03/2024`), ISO-8601 date-times with or without fractional seconds,
/// and RFC 3339 timestamps. Returns `None` for anything else — malformed
/// dates degrade to "unknown" rather than failing the record.
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, fmt) {
            return Some(date);
        }
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date());
        }
    }

    // Offset-carrying timestamps (e.g. "2024-03-01T08:30:00Z")
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }

    None
}

/// Number of whole calendar days from `from` to `to`.
///
/// Negative when `to` precedes `from`.
#[must_use]
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    to.signed_duration_since(from).num_days()
}

/// Age in days on the reference date, counting the birth day as day 1.
#[must_use]
pub fn age_in_days(birth: NaiveDate, on: NaiveDate) -> i64 {
    days_between(birth, on).saturating_add(1)
}

// =============================================================================
// TESTS
// =============================================================================
