//! Human-readable text for the tide display.

use chrono::{DateTime, Duration, TimeZone};
use std::fmt;

/// Placeholder shown for values that cannot be computed yet.
pub const NOT_AVAILABLE: &str = "N/A";

/// Format a duration as zero-padded `HH:MM:SS`, flooring to whole seconds.
///
/// Negative durations render as `00:00:00`.
///
/// # Example
/// ```
/// use chrono::Duration;
/// use tide_clock_lib::format::format_countdown;
///
/// assert_eq!(format_countdown(Duration::milliseconds(22_350_000)), "06:12:30");
/// ```
pub fn format_countdown(duration: Duration) -> String {
    let total_seconds = duration.num_seconds().max(0);
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Format an instant for display, e.g. `Mon, Aug 11, 2025, 01:15 PM`.
pub fn format_datetime<Tz>(instant: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    instant.format("%a, %b %-d, %Y, %I:%M %p").to_string()
}

/// Format an instant in the `YYYY-MM-DDTHH:MM` form accepted by reference entry.
pub fn format_entry<Tz>(instant: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    instant.format("%Y-%m-%dT%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn test_format_countdown() {
        assert_eq!(format_countdown(Duration::zero()), "00:00:00");
        assert_eq!(format_countdown(Duration::seconds(59)), "00:00:59");
        assert_eq!(format_countdown(Duration::seconds(3_661)), "01:01:01");
        // Sub-second remainder is floored
        assert_eq!(format_countdown(Duration::milliseconds(1_999)), "00:00:01");
        assert_eq!(format_countdown(Duration::minutes(745)), "12:25:00");
        assert_eq!(format_countdown(Duration::seconds(-5)), "00:00:00");
    }

    #[test]
    fn test_format_datetime() {
        let instant = Utc.with_ymd_and_hms(2025, 8, 11, 13, 15, 0).unwrap();
        assert_eq!(format_datetime(&instant), "Mon, Aug 11, 2025, 01:15 PM");

        let morning = Utc.with_ymd_and_hms(2025, 8, 2, 0, 5, 0).unwrap();
        assert_eq!(format_datetime(&morning), "Sat, Aug 2, 2025, 12:05 AM");
    }

    #[test]
    fn test_format_datetime_uses_offset() {
        let eastern = FixedOffset::west_opt(4 * 3600).unwrap();
        let instant = Utc
            .with_ymd_and_hms(2025, 8, 11, 17, 15, 0)
            .unwrap()
            .with_timezone(&eastern);
        assert_eq!(format_datetime(&instant), "Mon, Aug 11, 2025, 01:15 PM");
        assert_eq!(format_entry(&instant), "2025-08-11T13:15");
    }
}
