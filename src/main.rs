//! # Tide Clock Application Entry Point
//!
//! This binary wires the tide clock together: configuration, the saved
//! reference high tide, a display sink, and the once-per-second driver.
//! It supports a text display (default) and an e-ink panel preview (`--panel`).
//!
//! ```text
//! tide-clock [--config PATH] [--set DATETIME] [--once] [--ticks N]
//!            [--panel] [--no-clear] [--log FILTER]
//! ```
//!
//! While running, each line typed on stdin is taken as a new reference high
//! tide, e.g. `2025-08-11T13:15`.

// Test modules
#[cfg(test)]
mod tests;

use anyhow::{bail, Context};
use chrono::Local;
use std::{env, io, path::PathBuf};
use tide_clock_lib::{
    app::TideClock,
    config::Config,
    display::DisplaySink,
    driver::{self, DriverOptions, SystemClock},
    logging::init_logging,
    renderer::{PanelPreview, TerminalSink},
    store::JsonFileStore,
};
use tokio::io::{AsyncBufReadExt, BufReader};

/// Parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CliArgs {
    /// Configuration file to load; `tide-clock.toml` in the working directory when absent
    pub config_path: Option<PathBuf>,
    /// Reference high tide to commit before starting
    pub set: Option<String>,
    /// Show a single frame and exit
    pub once: bool,
    /// Stop after this many refreshes
    pub ticks: Option<u64>,
    /// Render the e-ink panel layout instead of text
    pub panel: bool,
    /// Never clear the terminal between refreshes
    pub no_clear: bool,
    /// Log filter, overrides RUST_LOG
    pub log_filter: Option<String>,
}

impl Default for CliArgs {
    fn default() -> Self {
        Self {
            config_path: None,
            set: None,
            once: false,
            ticks: None,
            panel: false,
            no_clear: false,
            log_filter: None,
        }
    }
}

/// Parse command line arguments (without the program name).
pub(crate) fn parse_args<I>(args: I) -> anyhow::Result<CliArgs>
where
    I: IntoIterator<Item = String>,
{
    let mut parsed = CliArgs::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        let mut value = |flag: &str| {
            args.next()
                .with_context(|| format!("{} expects a value", flag))
        };

        match arg.as_str() {
            "--config" => parsed.config_path = Some(PathBuf::from(value("--config")?)),
            "--set" => parsed.set = Some(value("--set")?),
            "--ticks" => {
                let raw = value("--ticks")?;
                let ticks = raw
                    .parse::<u64>()
                    .with_context(|| format!("--ticks expects a number, got {:?}", raw))?;
                parsed.ticks = Some(ticks);
            }
            "--log" => parsed.log_filter = Some(value("--log")?),
            "--once" => parsed.once = true,
            "--panel" => parsed.panel = true,
            "--no-clear" => parsed.no_clear = true,
            other => bail!("unknown argument {:?}", other),
        }
    }

    Ok(parsed)
}

impl CliArgs {
    /// Load the configuration named by `--config`, or the default file.
    pub(crate) fn load_config(&self) -> Config {
        match &self.config_path {
            Some(path) => Config::load_from_path(path),
            None => Config::load(),
        }
    }
}

/// Main application entry point.
fn main() -> anyhow::Result<()> {
    let args = parse_args(env::args().skip(1))?;

    init_logging(args.log_filter.as_deref());

    let config = args.load_config();
    let tz = Local;

    let store = JsonFileStore::new(&config.reference.store_path);
    let mut app = TideClock::bootstrap(Box::new(store), &config, &tz);

    let clear_screen = config.display.clear_screen && !args.no_clear && !args.once;
    let mut sink: Box<dyn DisplaySink> = if args.panel {
        Box::new(PanelPreview::new(
            io::stdout(),
            config.display.width,
            config.display.height,
            clear_screen,
        ))
    } else {
        Box::new(TerminalSink::new(io::stdout(), clear_screen))
    };

    let clock = SystemClock;

    if args.once {
        driver::show_once(&mut app, args.set.as_deref(), &clock, &mut sink, &tz)?;
        return Ok(());
    }

    // Command-line entry behaves like a commit from the input field
    if let Some(text) = &args.set {
        driver::submit(&mut app, text, &clock, &mut sink, &tz)?;
    }

    let options = DriverOptions {
        interval: config.tick_interval(),
        max_ticks: args.ticks,
    };

    // One timer and one input stream; no worker threads needed
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build runtime")?;

    let summary = rt.block_on(async {
        let input = BufReader::new(tokio::io::stdin()).lines();
        let shutdown = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                log::warn!("could not listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        };
        driver::run(&mut app, &clock, &mut sink, &tz, input, &options, shutdown).await
    })?;

    // Stdin reads sit on a blocking thread that may never return
    rt.shutdown_background();

    log::info!(
        "stopped after {} refreshes ({} references set, {} rejected)",
        summary.ticks,
        summary.commits,
        summary.rejected
    );

    Ok(())
}
