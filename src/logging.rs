//! Diagnostics for the tide clock.
//!
//! The display owns stdout, so log lines are written to stderr. Redirect it
//! (`2>tide.log`) to keep the terminal clean while watching the clock.

/// Level used when neither `--log` nor `RUST_LOG` is given.
pub const DEFAULT_FILTER: &str = "info";

/// Pick the log filter: the `--log` value, then `RUST_LOG`, then [`DEFAULT_FILTER`].
///
/// Blank values are skipped, so `--log ""` falls through to the environment.
pub fn resolve_filter<'a>(flag: Option<&'a str>, env: Option<&'a str>) -> &'a str {
    [flag, env]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|filter| !filter.is_empty())
        .unwrap_or(DEFAULT_FILTER)
}

/// Install the stderr logger. Only the first call in a process has any effect.
pub fn init_logging(flag: Option<&str>) {
    let env = std::env::var("RUST_LOG").ok();
    let filter = resolve_filter(flag, env.as_deref());

    let installed = env_logger::Builder::new()
        .parse_filters(filter)
        .target(env_logger::Target::Stderr)
        .format_timestamp_secs()
        .try_init();

    if installed.is_ok() {
        log::debug!("logging to stderr with filter {:?}", filter);
    }
}
