//! # Reference Entry Validation
//!
//! Turns the text of the reference high-tide field into an instant. Entry is
//! interpreted as local wall-clock time in the supplied time zone unless it
//! carries an explicit RFC 3339 offset.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use thiserror::Error;

/// Rejected reference entry. The `Display` text is the message shown to the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// Nothing was entered
    #[error("Please select a date and time for the last high tide.")]
    Empty,

    /// Text could not be read as a date and time (carries the rejected text)
    #[error("Please enter a valid date and time.")]
    Invalid(String),
}

/// Accepted local date-time layouts, most specific last so that trailing
/// seconds never satisfy a shorter pattern.
const LOCAL_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
];

/// Parse a reference high tide entered as text.
///
/// Ambiguous local times (clocks falling back) resolve to the earlier instant;
/// local times skipped by a clock change are rejected.
///
/// # Example
/// ```
/// use chrono::{TimeZone, Utc};
/// use tide_clock_lib::input::{parse_reference, InputError};
///
/// let parsed = parse_reference("2025-08-11T13:15", &Utc).unwrap();
/// assert_eq!(parsed, Utc.with_ymd_and_hms(2025, 8, 11, 13, 15, 0).unwrap());
///
/// assert_eq!(parse_reference("   ", &Utc), Err(InputError::Empty));
/// ```
pub fn parse_reference<Tz: TimeZone>(text: &str, tz: &Tz) -> Result<DateTime<Utc>, InputError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(InputError::Empty);
    }

    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return Ok(instant.with_timezone(&Utc));
    }

    let naive = LOCAL_FORMATS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(text, layout).ok())
        .ok_or_else(|| InputError::Invalid(text.to_string()))?;

    naive
        .and_local_timezone(tz.clone())
        .earliest()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| InputError::Invalid(text.to_string()))
}
