// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon configuration
//!
//! Settings come from an optional TOML file; every field has a default. The
//! resolved [`Config`] adds the on-disk paths derived from the state directory.

use gleaner_core::RetryPolicy;
use gleaner_engine::DeliveryMode;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variable that overrides the state directory
pub const STATE_DIR_ENV: &str = "GLEANER_STATE_DIR";

/// Settings as written in the config file
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub endpoint: String,
    #[serde(with = "humantime_serde")]
    pub flush_interval: Duration,
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    pub delivery: DeliveryMode,
    pub retry: RetryPolicy,
    pub state_dir: Option<PathBuf>,
    pub socket_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8080/ingest".to_string(),
            flush_interval: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            delivery: DeliveryMode::default(),
            retry: RetryPolicy::default(),
            state_dir: None,
            socket_path: None,
        }
    }
}

impl Settings {
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoint.trim().is_empty() {
            return Err(ConfigError::Invalid("endpoint must not be empty".to_string()));
        }
        if self.flush_interval.is_zero() {
            return Err(ConfigError::Invalid(
                "flush_interval must be greater than zero".to_string(),
            ));
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::Invalid(
                "request_timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Resolved daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub endpoint: String,
    pub flush_interval: Duration,
    pub request_timeout: Duration,
    pub delivery: DeliveryMode,
    pub retry: RetryPolicy,
    /// Root of all daemon state
    pub state_dir: PathBuf,
    /// Directory holding the JSON store slots
    pub store_path: PathBuf,
    /// Path to lock/PID file
    pub lock_path: PathBuf,
    /// Path to daemon log file
    pub log_path: PathBuf,
    /// Path to Unix socket
    pub socket_path: PathBuf,
}

impl Config {
    /// Load configuration the way both binaries do: explicit file, else the
    /// per-user config file when present, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let settings = match explicit {
            Some(path) => read_settings(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => read_settings(&path)?,
                _ => Settings::default(),
            },
        };

        let override_dir = std::env::var_os(STATE_DIR_ENV).map(PathBuf::from);
        Self::resolve(settings, override_dir)
    }

    /// Derive paths from settings. `state_dir_override` wins over the file.
    pub fn resolve(
        settings: Settings,
        state_dir_override: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        settings.validate()?;

        let state_dir = match state_dir_override.or(settings.state_dir) {
            Some(dir) => dir,
            None => default_state_dir()?,
        };
        let socket_path = settings
            .socket_path
            .unwrap_or_else(|| state_dir.join("daemon.sock"));

        Ok(Self {
            endpoint: settings.endpoint,
            flush_interval: settings.flush_interval,
            request_timeout: settings.request_timeout,
            delivery: settings.delivery,
            retry: settings.retry,
            store_path: state_dir.join("store"),
            lock_path: state_dir.join("daemon.pid"),
            log_path: state_dir.join("daemon.log"),
            socket_path,
            state_dir,
        })
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config at {0}: {1}")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("Invalid config at {0}: {1}")]
    Parse(PathBuf, #[source] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),

    #[error("Could not determine state directory")]
    NoStateDir,
}

fn read_settings(path: &Path) -> Result<Settings, ConfigError> {
    let content =
        std::fs::read_to_string(path).map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
    Settings::parse(&content).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))
}

/// `$XDG_CONFIG_HOME/gleaner/config.toml`, or under `~/.config`
fn default_config_path() -> Option<PathBuf> {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(xdg).join("gleaner/config.toml"));
    }
    let home = std::env::var("HOME").ok()?;
    Some(PathBuf::from(home).join(".config/gleaner/config.toml"))
}

/// Get the state directory for gleaner
fn default_state_dir() -> Result<PathBuf, ConfigError> {
    // Use XDG_STATE_HOME or default to ~/.local/state
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("gleaner"));
    }

    let home = std::env::var("HOME").map_err(|_| ConfigError::NoStateDir)?;
    Ok(PathBuf::from(home).join(".local/state/gleaner"))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
