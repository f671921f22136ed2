//! Configuration management for klaunch
//!
//! Configuration is loaded from `~/.klaunch/config.json` (or an explicit path)
//! with environment variable overrides.

mod types;

pub use types::*;

use crate::error::{KlaunchError, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

impl Config {
    /// Returns the klaunch configuration directory path (~/.klaunch)
    pub fn dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".klaunch")
    }

    /// Returns the path to the config file (~/.klaunch/config.json)
    pub fn path() -> PathBuf {
        Self::dir().join("config.json")
    }

    /// Load configuration from the default path with environment overrides.
    ///
    /// If the config file doesn't exist, returns default configuration.
    /// Environment variables override config values using the pattern
    /// `KLAUNCH_SECTION_KEY`.
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::path())
    }

    /// Load configuration from a specific path with environment overrides.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            serde_json::from_str(&content).map_err(|e| {
                KlaunchError::Config(format!("{}: {}", path.display(), e))
            })?
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    /// Apply environment variable overrides to the configuration.
    fn apply_env_overrides(&mut self) {
        // Logging
        if let Ok(val) = std::env::var("KLAUNCH_LOGGING_LEVEL") {
            self.logging.level = val;
        }

        // Daemon
        if let Ok(val) = std::env::var("KLAUNCH_DAEMON_POLL_INTERVAL_MS") {
            if let Ok(v) = val.parse() {
                self.daemon.poll_interval_ms = v;
            }
        }
        if let Ok(val) = std::env::var("KLAUNCH_DAEMON_SERVICE_ATTEMPTS") {
            if let Ok(v) = val.parse() {
                self.daemon.service_attempts = v;
            }
        }
        if let Ok(val) = std::env::var("KLAUNCH_DAEMON_DESKTOP_ATTEMPTS") {
            if let Ok(v) = val.parse() {
                self.daemon.desktop_attempts = v;
            }
        }

        // Connector
        if let Ok(val) = std::env::var("KLAUNCH_CONNECTOR_SEARCH_URL") {
            self.connector.search_url = val;
        }
        if let Ok(val) = std::env::var("KLAUNCH_CONNECTOR_REPOSITORY_URL") {
            self.connector.repository_url = val;
        }
        if let Ok(val) = std::env::var("KLAUNCH_CONNECTOR_ENV_FILE") {
            self.connector.env_file = val;
        }
        if let Ok(val) = std::env::var("KLAUNCH_CONNECTOR_DOWNLOAD_DIR") {
            self.connector.download_dir = val;
        }
        if let Ok(val) = std::env::var("KLAUNCH_CONNECTOR_REQUEST_TIMEOUT_SECS") {
            if let Ok(v) = val.parse() {
                self.connector.request_timeout_secs = v;
            }
        }

        // Installer
        if let Ok(val) = std::env::var("KLAUNCH_INSTALLER_MANAGER") {
            self.installer.manager = val;
        }
        if let Ok(val) = std::env::var("KLAUNCH_INSTALLER_PACKAGES") {
            self.installer.packages = val
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }
    }
}

impl DaemonConfig {
    /// Poll interval as a `Duration`.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl ConnectorConfig {
    /// Connect deadline as a `Duration`.
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Whole-request deadline as a `Duration`.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Env file lock deadline as a `Duration`.
    pub fn lock_timeout(&self) -> Duration {
        Duration::from_secs(self.lock_timeout_secs)
    }
}
