//! # Clock Driver
//!
//! Refreshes the display on a fixed cadence and applies reference entries as
//! they arrive. Everything runs on one task: a tick and a commit never
//! overlap, so [`TideClock`] needs no locking.

use crate::{app::TideClock, display::DisplaySink};
use chrono::{DateTime, TimeZone, Utc};
use std::{fmt, future::Future, io, time::Duration};
use tokio::{
    io::{AsyncBufRead, Lines},
    time::MissedTickBehavior,
};

/// Source of the current instant.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Driver cadence and run length.
#[derive(Debug, Clone)]
pub struct DriverOptions {
    /// Time between refreshes
    pub interval: Duration,
    /// Stop after this many refreshes; `None` runs until shutdown
    pub max_ticks: Option<u64>,
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_ticks: None,
        }
    }
}

/// Why the driver returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    TickLimit,
    Shutdown,
}

/// Counters for a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    pub commits: u64,
    pub rejected: u64,
    pub stop: StopReason,
}

/// Predict at the clock's current instant and show the result.
pub fn refresh<C, S, Tz>(app: &TideClock, clock: &C, sink: &mut S, tz: &Tz) -> io::Result<()>
where
    C: Clock + ?Sized,
    S: DisplaySink + ?Sized,
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let frame = app.frame(clock.now(), tz);
    sink.show(&frame)
}

/// Commit one reference entry; rejected entries become a sink alert.
///
/// Returns whether the entry was accepted. Accepted entries trigger an
/// immediate refresh.
pub fn submit<C, S, Tz>(
    app: &mut TideClock,
    text: &str,
    clock: &C,
    sink: &mut S,
    tz: &Tz,
) -> io::Result<bool>
where
    C: Clock + ?Sized,
    S: DisplaySink + ?Sized,
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    match app.commit(text, tz) {
        Ok(reference) => {
            log::info!("reference high tide set to {}", reference);
            refresh(app, clock, sink, tz)?;
            Ok(true)
        }
        Err(e) => {
            log::warn!("rejected reference entry {:?}: {}", text.trim(), e);
            sink.alert(&e.to_string())?;
            Ok(false)
        }
    }
}

/// Apply an optional start-up entry, then leave exactly one frame on the sink.
///
/// An accepted entry already refreshed the display, so no second frame is
/// drawn. A rejected entry shows its alert followed by the current frame.
pub fn show_once<C, S, Tz>(
    app: &mut TideClock,
    entry: Option<&str>,
    clock: &C,
    sink: &mut S,
    tz: &Tz,
) -> io::Result<()>
where
    C: Clock + ?Sized,
    S: DisplaySink + ?Sized,
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    if let Some(text) = entry {
        if submit(app, text, clock, sink, tz)? {
            return Ok(());
        }
    }
    refresh(app, clock, sink, tz)
}

/// Run the refresh loop.
///
/// Each line read from `input` is treated as a reference entry. End of input
/// only stops listening; the clock keeps running until `shutdown` resolves or
/// `options.max_ticks` refreshes have been shown.
pub async fn run<C, S, Tz, R, F>(
    app: &mut TideClock,
    clock: &C,
    sink: &mut S,
    tz: &Tz,
    mut input: Lines<R>,
    options: &DriverOptions,
    shutdown: F,
) -> io::Result<RunSummary>
where
    C: Clock + ?Sized,
    S: DisplaySink + ?Sized,
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
    R: AsyncBufRead + Unpin,
    F: Future<Output = ()>,
{
    let mut ticker = tokio::time::interval(options.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    tokio::pin!(shutdown);

    let mut ticks = 0;
    let mut commits = 0;
    let mut rejected = 0;
    let mut input_open = true;

    log::debug!("clock driver started, interval {:?}", options.interval);

    let stop = loop {
        tokio::select! {
            biased;

            _ = &mut shutdown => {
                log::info!("shutdown requested");
                break StopReason::Shutdown;
            }

            line = input.next_line(), if input_open => match line? {
                Some(text) => {
                    if submit(app, &text, clock, sink, tz)? {
                        commits += 1;
                    } else {
                        rejected += 1;
                    }
                }
                None => {
                    log::debug!("input closed, clock keeps running");
                    input_open = false;
                }
            },

            _ = ticker.tick() => {
                refresh(app, clock, sink, tz)?;
                ticks += 1;
                if options.max_ticks.is_some_and(|max| ticks >= max) {
                    break StopReason::TickLimit;
                }
            }
        }
    };

    Ok(RunSummary {
        ticks,
        commits,
        rejected,
        stop,
    })
}
