//! CLI argument definitions for the parley console assistant.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;

use parley_core::config::ParleyConfig;

/// Parley: a voice-assistant conversation loop, driven from the terminal.
#[derive(Parser, Debug, Default)]
#[command(name = "parley", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Name the assistant addresses you by.
    #[arg(short = 'n', long = "name")]
    pub name: Option<String>,

    /// Home city used for weather reports.
    #[arg(long = "city")]
    pub city: Option<String>,

    /// Keep at most this many conversation entries.
    #[arg(long = "history")]
    pub history: Option<usize>,

    /// Log links instead of opening them in a browser.
    #[arg(long = "no-browser")]
    pub no_browser: bool,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > PARLEY_CONFIG env var > ~/.parley/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("PARLEY_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the log level.
    ///
    /// Priority: --log-level flag > PARLEY_LOG env var > config file value.
    pub fn resolve_log_level(&self, config_level: &str) -> String {
        if let Some(ref level) = self.log_level {
            return level.clone();
        }
        if let Ok(level) = std::env::var("PARLEY_LOG") {
            if !level.trim().is_empty() {
                return level;
            }
        }
        config_level.to_string()
    }

    /// Overlay command-line settings onto a loaded configuration.
    pub fn apply_overrides(&self, config: &mut ParleyConfig) {
        if let Some(ref name) = self.name {
            config.user.name = name.clone();
        }
        if let Some(ref city) = self.city {
            config.user.city = city.clone();
        }
        if self.history.is_some() {
            config.history.max_entries = self.history;
        }
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".parley").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".parley").join("config.toml");
    }
    PathBuf::from("config.toml")
}
