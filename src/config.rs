//! # Configuration Management
//!
//! This module handles loading and parsing configuration from the tide-clock.toml file.
//! It provides a centralized way to configure where the reference high tide is stored,
//! the clock cadence, and display options.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "tide-clock.toml";

/// Known high tide used when nothing has been stored yet (Falmouth, local time).
pub const DEFAULT_REFERENCE: &str = "2025-08-11T13:15";

/// Application configuration loaded from tide-clock.toml
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Reference high tide storage
    pub reference: ReferenceConfig,
    /// Refresh cadence and prediction tuning
    pub clock: ClockConfig,
    /// Display and visualization configuration
    pub display: DisplayConfig,
}

/// Reference high tide storage configuration
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct ReferenceConfig {
    /// JSON file holding the saved reference high tide
    pub store_path: PathBuf,
    /// Reference committed on first start when the store is empty.
    /// Omit to start with no reference set.
    pub default_reference: Option<String>,
}

/// Clock driver configuration
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Display refresh interval in milliseconds
    pub tick_interval_ms: u64,
    /// Minutes either side of a turn reported as high or low tide
    pub margin_minutes: i64,
}

/// Display and visualization configuration
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Clear the terminal before each refresh
    pub clear_screen: bool,
    /// Panel width in pixels for the e-ink preview
    pub width: u32,
    /// Panel height in pixels for the e-ink preview
    pub height: u32,
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        ReferenceConfig {
            store_path: PathBuf::from("tide-clock-state.json"),
            default_reference: Some(DEFAULT_REFERENCE.to_string()),
        }
    }
}

impl Default for ClockConfig {
    fn default() -> Self {
        ClockConfig {
            tick_interval_ms: 1000,
            margin_minutes: crate::DEFAULT_MARGIN_MINUTES,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            clear_screen: true,
            width: 250,  // Waveshare 2.13"
            height: 122, // Waveshare 2.13"
        }
    }
}

impl Config {
    /// Load configuration from tide-clock.toml file
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path(CONFIG_FILE)
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => {
                    log::info!("loaded configuration from {}", path.display());
                    config
                }
                Err(e) => {
                    log::warn!("invalid config file format in {}: {}", path.display(), e);
                    log::warn!("using default configuration");
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("no config file at {}, using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Save current configuration to the given path
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(&path, contents)?;
        log::info!("configuration saved to {}", path.as_ref().display());
        Ok(())
    }

    /// Refresh interval as a std duration, never shorter than one millisecond
    pub fn tick_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.clock.tick_interval_ms.max(1))
    }

    /// Turn margin as a chrono duration
    pub fn margin(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.clock.margin_minutes.max(0))
    }
}
