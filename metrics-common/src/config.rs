//! Configuration loading and resolution
//!
//! Every setting resolves in the same priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! Tiers 1 and 2 arrive together as [`ConfigOverrides`] (the binary's argument
//! parser reads both); this module layers them over [`TomlConfig`] and the
//! compiled defaults.

use crate::{Error, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Default feed file, relative to the working directory
pub const DEFAULT_FEED_PATH: &str = "model_metrics.json";
/// Default SQLite database file, relative to the working directory
pub const DEFAULT_DATABASE_PATH: &str = "metrics.db";
/// Default delay between poll cycles
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;
/// Default tracing filter when RUST_LOG is unset
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Contents of the optional TOML config file
///
/// All keys are optional; anything missing falls through to the compiled default.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    pub feed_path: Option<PathBuf>,
    pub database_path: Option<PathBuf>,
    pub poll_interval_secs: Option<u64>,
    pub resume_from_cursor: Option<bool>,
    pub status_bind: Option<String>,
    pub log_level: Option<String>,
}

/// Values supplied on the command line or through environment variables
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub feed_path: Option<PathBuf>,
    pub database_path: Option<PathBuf>,
    pub poll_interval_secs: Option<u64>,
    pub resume_from_cursor: Option<bool>,
    pub status_bind: Option<String>,
    pub log_level: Option<String>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone, PartialEq)]
pub struct SyncConfig {
    /// Append-only JSON array produced by the model-serving layer
    pub feed_path: PathBuf,
    /// SQLite database holding the `metrics` table
    pub database_path: PathBuf,
    /// Fixed delay between poll cycles
    pub poll_interval: Duration,
    /// Load/save the processed-record count in `sync_cursor`
    pub resume_from_cursor: bool,
    /// Address for the read-only status server; `None` disables it
    pub status_bind: Option<SocketAddr>,
    pub log_level: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            feed_path: PathBuf::from(DEFAULT_FEED_PATH),
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            resume_from_cursor: false,
            status_bind: None,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl SyncConfig {
    /// Layer overrides over the TOML file over compiled defaults
    pub fn resolve(overrides: ConfigOverrides, file: TomlConfig) -> Result<Self> {
        let defaults = SyncConfig::default();

        let poll_secs = overrides
            .poll_interval_secs
            .or(file.poll_interval_secs)
            .unwrap_or(DEFAULT_POLL_INTERVAL_SECS);
        if poll_secs == 0 {
            return Err(Error::Config(
                "poll_interval_secs must be greater than zero".to_string(),
            ));
        }

        let status_bind = match overrides.status_bind.or(file.status_bind) {
            Some(raw) if raw.trim().is_empty() => None,
            Some(raw) => Some(raw.trim().parse::<SocketAddr>().map_err(|e| {
                Error::Config(format!("Invalid status_bind address '{}': {}", raw, e))
            })?),
            None => None,
        };

        Ok(Self {
            feed_path: overrides
                .feed_path
                .or(file.feed_path)
                .unwrap_or(defaults.feed_path),
            database_path: overrides
                .database_path
                .or(file.database_path)
                .unwrap_or(defaults.database_path),
            poll_interval: Duration::from_secs(poll_secs),
            resume_from_cursor: overrides
                .resume_from_cursor
                .or(file.resume_from_cursor)
                .unwrap_or(defaults.resume_from_cursor),
            status_bind,
            log_level: overrides
                .log_level
                .or(file.log_level)
                .unwrap_or(defaults.log_level),
        })
    }
}

/// Load the TOML config file
///
/// A missing file is not an error: a warning is logged and an empty config is
/// returned so the compiled defaults apply. A file that exists but does not parse
/// is a configuration error.
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    if !path.exists() {
        warn!(
            path = %path.display(),
            "Config file not found, using defaults"
        );
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(path)?;
    let config = toml::from_str::<TomlConfig>(&content).map_err(|e| {
        Error::Config(format!("Failed to parse {}: {}", path.display(), e))
    })?;

    info!(path = %path.display(), "Loaded config file");
    Ok(config)
}

/// Get default configuration file path for the platform
///
/// Linux: `~/.config/metrics-sync/config.toml`, falling back to
/// `/etc/metrics-sync/config.toml` when only the system file exists.
pub fn default_config_path() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("metrics-sync").join("config.toml"));

    if cfg!(target_os = "linux") {
        if let Some(path) = user_config.as_ref().filter(|p| p.exists()) {
            return Some(path.clone());
        }
        let system_config = PathBuf::from("/etc/metrics-sync/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    user_config
}
