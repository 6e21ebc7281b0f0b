//! # Display Frames and Sinks
//!
//! A [`DisplayFrame`] is the complete, already-formatted content of one
//! refresh. Sinks only draw text they are handed; all formatting happens here.

use crate::{
    format::{format_countdown, format_datetime, NOT_AVAILABLE},
    Prediction, TideStatus,
};
use chrono::{DateTime, TimeZone, Utc};
use std::{fmt, io};

/// Status text shown until a reference high tide has been entered.
pub const NO_REFERENCE_TEXT: &str = "Please set a reference high tide.";

/// Formatted content for one display refresh.
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayFrame {
    /// Current wall-clock time
    pub current_time: String,
    /// Reference high tide as it was entered, or `N/A`
    pub reference: String,
    /// Tide status text
    pub status: String,
    /// Time until the next turn as `HH:MM:SS`
    pub time_until_next: String,
    /// Next high water
    pub next_high: String,
    /// Next low water
    pub next_low: String,
    /// Computed status, `None` when no reference is set
    pub tide: Option<TideStatus>,
    /// Cycle position in `[0.0, 1.0)`, `0.0` at high water
    pub phase: Option<f32>,
}

impl DisplayFrame {
    /// Format a prediction for display in time zone `tz`.
    pub fn new<Tz>(prediction: &Prediction, now: DateTime<Utc>, reference: &str, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let current_time = format_datetime(&now.with_timezone(tz));
        let reference = if reference.is_empty() {
            NOT_AVAILABLE.to_string()
        } else {
            reference.to_string()
        };

        match prediction {
            Prediction::NoReference => DisplayFrame {
                current_time,
                reference,
                status: NO_REFERENCE_TEXT.to_string(),
                time_until_next: NOT_AVAILABLE.to_string(),
                next_high: NOT_AVAILABLE.to_string(),
                next_low: NOT_AVAILABLE.to_string(),
                tide: None,
                phase: None,
            },
            Prediction::Tide(state) => DisplayFrame {
                current_time,
                reference,
                status: state.status.to_string(),
                time_until_next: format_countdown(state.time_until_next),
                next_high: format_datetime(&state.next_high.with_timezone(tz)),
                next_low: format_datetime(&state.next_low.with_timezone(tz)),
                tide: Some(state.status),
                phase: Some(state.phase_fraction()),
            },
        }
    }
}

/// Destination for display frames and user-facing alerts.
pub trait DisplaySink {
    /// Replace whatever is shown with `frame`.
    fn show(&mut self, frame: &DisplayFrame) -> io::Result<()>;

    /// Show a dismissible message without touching tide state.
    fn alert(&mut self, message: &str) -> io::Result<()>;
}

impl<S: DisplaySink + ?Sized> DisplaySink for Box<S> {
    fn show(&mut self, frame: &DisplayFrame) -> io::Result<()> {
        (**self).show(frame)
    }

    fn alert(&mut self, message: &str) -> io::Result<()> {
        (**self).alert(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predictor::predict;
    use chrono::Duration;

    #[test]
    fn test_frame_without_reference() {
        let now = Utc.with_ymd_and_hms(2025, 8, 11, 13, 15, 0).unwrap();
        let frame = DisplayFrame::new(&Prediction::NoReference, now, "", &Utc);

        assert_eq!(frame.current_time, "Mon, Aug 11, 2025, 01:15 PM");
        assert_eq!(frame.status, NO_REFERENCE_TEXT);
        assert_eq!(frame.reference, "N/A");
        assert_eq!(frame.time_until_next, "N/A");
        assert_eq!(frame.next_high, "N/A");
        assert_eq!(frame.next_low, "N/A");
        assert!(frame.phase.is_none());
    }

    #[test]
    fn test_frame_with_reference() {
        let reference = Utc.with_ymd_and_hms(2025, 8, 11, 13, 15, 0).unwrap();
        let now = reference + Duration::hours(1);
        let frame = DisplayFrame::new(
            &predict(Some(reference), now),
            now,
            "2025-08-11T13:15",
            &Utc,
        );

        assert_eq!(frame.status, "Falling");
        assert_eq!(frame.tide, Some(TideStatus::Falling));
        assert_eq!(frame.reference, "2025-08-11T13:15");
        // Low water at 19:27:30, 5h12m30s away
        assert_eq!(frame.time_until_next, "05:12:30");
        assert_eq!(frame.next_low, "Mon, Aug 11, 2025, 07:27 PM");
        assert_eq!(frame.next_high, "Tue, Aug 12, 2025, 01:40 AM");
    }
}
