//! # Fixed-Period Tide Prediction
//!
//! Extrapolates high and low water from one reference high tide using the
//! semidiurnal cycle of [`TIDE_CYCLE_MS`]. The model is deliberately simple:
//!
//! - **Phase**: `(now - reference) mod cycle`, Euclidean, so a reference in the
//!   future still yields a phase in `[0, cycle)`
//! - **Turns**: the reference high water (and the low half a cycle later) is
//!   advanced by whole cycles until it is at or after now; a future reference
//!   is left where it is
//! - **Direction**: the first half of the cycle after high water is falling,
//!   the second half is rising
//! - **Override**: within the margin of the next high (or low) water the status is
//!   reported as high (or low) tide instead of a direction
//!
//! ## Accuracy Trade-offs
//! - ✅ **Correct period**: mean M2 tidal cycle
//! - ❌ **No diurnal inequality**: every high is treated alike
//! - ❌ **Drift**: error grows with distance from the reference, so the user is
//!   expected to re-enter a fresh high tide from time to time

use crate::{
    Prediction, TideState, TideStatus, DEFAULT_MARGIN_MINUTES, HALF_TIDE_CYCLE_MS, TIDE_CYCLE_MS,
};
use chrono::{DateTime, Duration, Utc};

/// Predict the tide at `now` with the default five-minute turn margin.
///
/// # Example
/// ```
/// use chrono::{TimeZone, Utc};
/// use tide_clock_lib::{predictor::predict, Prediction, TideStatus};
///
/// let high = Utc.with_ymd_and_hms(2025, 8, 11, 17, 15, 0).unwrap();
/// let Prediction::Tide(state) = predict(Some(high), high) else {
///     panic!("reference is set");
/// };
/// assert_eq!(state.status, TideStatus::HighTide);
///
/// assert_eq!(predict(None, high), Prediction::NoReference);
/// ```
pub fn predict(reference: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Prediction {
    predict_with_margin(reference, now, Duration::minutes(DEFAULT_MARGIN_MINUTES))
}

/// Predict the tide at `now`, reporting a turn when the next high or low
/// water is strictly closer than `margin`.
pub fn predict_with_margin(
    reference: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    margin: Duration,
) -> Prediction {
    let Some(reference) = reference else {
        return Prediction::NoReference;
    };

    let now_ms = now.timestamp_millis();
    let at = now - Duration::nanoseconds(i64::from(now.timestamp_subsec_nanos() % 1_000_000));

    let elapsed_ms = now_ms - reference.timestamp_millis();
    let phase_ms = elapsed_ms.rem_euclid(TIDE_CYCLE_MS);

    // Turns only ever move forward from the reference: a reference still in
    // the future is itself the next high water
    let (to_high_ms, to_low_ms) = if elapsed_ms >= 0 {
        (
            (TIDE_CYCLE_MS - phase_ms) % TIDE_CYCLE_MS,
            (HALF_TIDE_CYCLE_MS - phase_ms).rem_euclid(TIDE_CYCLE_MS),
        )
    } else {
        (-elapsed_ms, HALF_TIDE_CYCLE_MS - elapsed_ms)
    };

    let falling = phase_ms < HALF_TIDE_CYCLE_MS;
    let (mut status, time_until_next_ms) = if falling {
        (TideStatus::Falling, to_low_ms)
    } else {
        (TideStatus::Rising, to_high_ms)
    };

    let margin_ms = margin.num_milliseconds();
    if to_high_ms.abs() < margin_ms {
        status = TideStatus::HighTide;
    } else if to_low_ms.abs() < margin_ms {
        status = TideStatus::LowTide;
    }

    Prediction::Tide(TideState {
        at,
        status,
        phase: Duration::milliseconds(phase_ms),
        next_high: at + Duration::milliseconds(to_high_ms),
        next_low: at + Duration::milliseconds(to_low_ms),
        time_until_next: Duration::milliseconds(time_until_next_ms),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::format_countdown;
    use chrono::TimeZone;

    fn reference() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 11, 17, 15, 0).unwrap()
    }

    fn state_at(now: DateTime<Utc>) -> TideState {
        match predict(Some(reference()), now) {
            Prediction::Tide(state) => state,
            Prediction::NoReference => panic!("reference was set"),
        }
    }

    #[test]
    fn test_no_reference() {
        assert_eq!(predict(None, reference()), Prediction::NoReference);
    }

    #[test]
    fn test_at_reference_is_high_tide() {
        let state = state_at(reference());
        assert_eq!(state.status, TideStatus::HighTide);
        assert_eq!(state.phase, Duration::zero());
        assert_eq!(state.next_high, reference());
        assert_eq!(
            state.next_low,
            reference() + Duration::milliseconds(HALF_TIDE_CYCLE_MS)
        );
        // Falling toward the low that is half a cycle away
        assert_eq!(
            state.time_until_next,
            Duration::milliseconds(HALF_TIDE_CYCLE_MS)
        );
    }

    #[test]
    fn test_half_cycle_is_low_tide() {
        let now = reference() + Duration::milliseconds(HALF_TIDE_CYCLE_MS);
        let state = state_at(now);
        assert_eq!(state.status, TideStatus::LowTide);
        assert_eq!(state.next_low, now);
        assert_eq!(state.time_until_next, state.next_high - now);
    }

    #[test]
    fn test_falling_then_rising() {
        let falling = state_at(reference() + Duration::hours(2));
        assert_eq!(falling.status, TideStatus::Falling);
        assert_eq!(falling.time_until_next, falling.next_low - falling.at);

        let rising = state_at(reference() + Duration::hours(9));
        assert_eq!(rising.status, TideStatus::Rising);
        assert_eq!(rising.time_until_next, rising.next_high - rising.at);
    }

    #[test]
    fn test_margin_is_strict() {
        // Exactly five minutes before high water is still rising
        let edge = reference() + Duration::milliseconds(TIDE_CYCLE_MS) - Duration::minutes(5);
        assert_eq!(state_at(edge).status, TideStatus::Rising);

        let inside = edge + Duration::seconds(1);
        assert_eq!(state_at(inside).status, TideStatus::HighTide);
    }

    #[test]
    fn test_just_after_high_is_falling() {
        // The next high is a full cycle away, so the turn window only covers
        // the approach to high water
        let state = state_at(reference() + Duration::minutes(1));
        assert_eq!(state.status, TideStatus::Falling);
    }

    #[test]
    fn test_future_reference_is_next_high() {
        let now = reference() - Duration::milliseconds(TIDE_CYCLE_MS);
        let state = state_at(now);

        assert_eq!(state.next_high, reference());
        assert_eq!(
            state.next_low,
            reference() + Duration::milliseconds(HALF_TIDE_CYCLE_MS)
        );
        // Phase is still taken modulo the cycle, so a whole cycle early is
        // the start of a falling half
        assert_eq!(state.phase, Duration::zero());
        assert_eq!(state.status, TideStatus::Falling);
        assert_eq!(state.time_until_next, state.next_low - now);
        assert_eq!(format_countdown(state.time_until_next), "18:37:30");
    }

    #[test]
    fn test_future_reference_is_not_moved_back() {
        let now = reference() - Duration::hours(30);
        let state = state_at(now);

        assert_eq!(state.next_high, reference());
        assert_eq!(
            state.next_low,
            reference() + Duration::milliseconds(HALF_TIDE_CYCLE_MS)
        );
        assert!(state.phase >= Duration::zero());
        assert!(state.phase < Duration::milliseconds(TIDE_CYCLE_MS));
    }

    #[test]
    fn test_future_reference_turn_window() {
        let now = reference() - Duration::minutes(3);
        assert_eq!(state_at(now).status, TideStatus::HighTide);

        let now = reference() - Duration::hours(2);
        assert_eq!(state_at(now).status, TideStatus::Rising);
    }

    #[test]
    fn test_sub_millisecond_now_is_truncated() {
        let now = reference() + Duration::milliseconds(TIDE_CYCLE_MS) + Duration::microseconds(700);
        let state = state_at(now);
        assert_eq!(state.at, reference() + Duration::milliseconds(TIDE_CYCLE_MS));
        assert_eq!(state.next_high, state.at);
        assert_eq!(state.status, TideStatus::HighTide);
    }

    #[test]
    fn test_custom_margin() {
        let now = reference() + Duration::milliseconds(HALF_TIDE_CYCLE_MS) - Duration::minutes(10);
        let narrow = predict_with_margin(Some(reference()), now, Duration::minutes(5));
        let wide = predict_with_margin(Some(reference()), now, Duration::minutes(15));

        assert_eq!(narrow.state().unwrap().status, TideStatus::Falling);
        assert_eq!(wide.state().unwrap().status, TideStatus::LowTide);
    }

    #[test]
    fn test_phase_fraction() {
        let state = state_at(reference() + Duration::milliseconds(HALF_TIDE_CYCLE_MS));
        assert!((state.phase_fraction() - 0.5).abs() < 1e-6);
    }
}
