//! # Tide Clock Core Library
//!
//! This library estimates the state of a semidiurnal tide from a single
//! reference high tide. There is no tide table and no network: every
//! prediction is extrapolated from the reference by whole multiples of a fixed
//! 12 h 25 min cycle.
//!
//! ## Design Philosophy
//!
//! ### Recompute, never store
//! A [`TideState`] is derived from scratch for every display refresh. The only
//! persisted value is the reference instant itself, kept as epoch milliseconds
//! by a [`store::ReferenceStore`].
//!
//! ### Millisecond arithmetic
//! The cycle is 44 700 000 ms and the half cycle 22 350 000 ms, so all phase
//! math is done in exact `i64` milliseconds. Instants are truncated to whole
//! milliseconds before prediction.
//!
//! ### Data Flow
//! 1. **Entry**: user text → [`input::parse_reference`] → reference instant
//! 2. **Persist**: reference → [`store::ReferenceStore::save`]
//! 3. **Tick**: (reference, now) → [`predictor::predict`] → [`display::DisplayFrame`]
//! 4. **Show**: frame → [`display::DisplaySink`] (terminal or e-ink panel)
//!
//! ## Core Types
//!
//! - [`TideStatus`]: rising, falling, or at a high/low turn
//! - [`TideState`]: status plus the next high and low water instants
//! - [`Prediction`]: a `TideState`, or nothing when no reference is set

use chrono::{DateTime, Duration, Utc};
use std::fmt;

pub mod app;
pub mod config;
pub mod display;
pub mod driver;
pub mod format;
pub mod input;
pub mod logging;
pub mod predictor;
pub mod renderer;
pub mod store;

/// Semidiurnal tide cycle length in minutes (12 h 25 min).
pub const TIDE_CYCLE_MINUTES: i64 = 12 * 60 + 25;

/// Tide cycle length in milliseconds.
pub const TIDE_CYCLE_MS: i64 = TIDE_CYCLE_MINUTES * 60 * 1000;

/// Half a tide cycle (high to low) in milliseconds: 6 h 12 min 30 s.
pub const HALF_TIDE_CYCLE_MS: i64 = TIDE_CYCLE_MS / 2;

/// Window around a turn of the tide that is reported as high or low water.
pub const DEFAULT_MARGIN_MINUTES: i64 = 5;

/// Direction of the tide, or the turn it is sitting at.
///
/// # Example
/// ```
/// use tide_clock_lib::TideStatus;
///
/// assert_eq!(TideStatus::HighTide.to_string(), "High Tide");
/// assert!(TideStatus::Falling.is_falling());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TideStatus {
    /// Moving from low water toward high water
    Rising,
    /// Moving from high water toward low water
    Falling,
    /// Within the margin of the next high water
    HighTide,
    /// Within the margin of the next low water
    LowTide,
}

impl TideStatus {
    /// Human-readable label, as shown on the display.
    pub fn label(self) -> &'static str {
        match self {
            TideStatus::Rising => "Rising",
            TideStatus::Falling => "Falling",
            TideStatus::HighTide => "High Tide",
            TideStatus::LowTide => "Low Tide",
        }
    }

    pub fn is_falling(self) -> bool {
        matches!(self, TideStatus::Falling)
    }
}

impl fmt::Display for TideStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Tide state at one instant, extrapolated from the reference high tide.
///
/// `next_high` and `next_low` are reference-aligned turns at or after `at`,
/// half a cycle apart. While the reference is still ahead, `next_high` is the
/// reference itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TideState {
    /// Instant the state was computed for, truncated to whole milliseconds
    pub at: DateTime<Utc>,
    /// Current status, including the high/low override near a turn
    pub status: TideStatus,
    /// Time since the most recent reference-aligned high water, in `[0, cycle)`
    pub phase: Duration,
    /// Next high water at or after `at`
    pub next_high: DateTime<Utc>,
    /// Next low water at or after `at`
    pub next_low: DateTime<Utc>,
    /// Time until the turn the tide is heading for (low when falling, high when rising)
    pub time_until_next: Duration,
}

impl TideState {
    /// Position within the cycle as a fraction in `[0.0, 1.0)`; `0.0` is high water.
    pub fn phase_fraction(&self) -> f32 {
        self.phase.num_milliseconds() as f32 / TIDE_CYCLE_MS as f32
    }
}

/// Outcome of a single prediction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Prediction {
    /// No reference high tide has been set yet
    NoReference,
    /// Tide state extrapolated from the reference
    Tide(TideState),
}

impl Prediction {
    pub fn state(&self) -> Option<&TideState> {
        match self {
            Prediction::NoReference => None,
            Prediction::Tide(state) => Some(state),
        }
    }
}
