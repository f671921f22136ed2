//! Configuration type definitions for klaunch
//!
//! All types implement serde traits for JSON serialization and have sensible
//! defaults, so an absent or partial config file is always valid.

use serde::{Deserialize, Serialize};

/// Main configuration struct for klaunch
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging output configuration
    pub logging: LoggingConfig,
    /// Daemon health check configuration
    pub daemon: DaemonConfig,
    /// Connector artifact fetch configuration
    pub connector: ConnectorConfig,
    /// Dependency installer configuration
    pub installer: InstallerConfig,
}

// ============================================================================
// Logging Configuration
// ============================================================================

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Default tracing pretty-print
    Pretty,
    /// Compact `[LEVEL] target message {fields}`
    #[default]
    Component,
    /// JSON lines
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Output format.
    pub format: LogFormat,
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: String,
    /// Optional log file (JSON format only); stderr otherwise.
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Component,
            level: "warn".to_string(),
            file: None,
        }
    }
}

// ============================================================================
// Daemon Configuration
// ============================================================================

/// Daemon health check configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DaemonConfig {
    /// Delay between status polls, in milliseconds.
    pub poll_interval_ms: u64,
    /// Poll bound after a service-manager restart.
    pub service_attempts: u32,
    /// Poll bound after launching the desktop application.
    pub desktop_attempts: u32,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1_000,
            service_attempts: 30,
            desktop_attempts: 60,
        }
    }
}

// ============================================================================
// Connector Configuration
// ============================================================================

/// Connector artifact fetch configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectorConfig {
    /// Maven search (solr) endpoint.
    pub search_url: String,
    /// Maven repository root.
    pub repository_url: String,
    /// Artifact group id.
    pub group: String,
    /// Artifact id.
    pub artifact: String,
    /// Env file holding the version entry.
    pub env_file: String,
    /// Directory the JAR is written into.
    pub download_dir: String,
    /// TCP connect deadline in seconds.
    pub connect_timeout_secs: u64,
    /// Whole-request deadline in seconds.
    pub request_timeout_secs: u64,
    /// How long to wait for the env file lock, in seconds.
    pub lock_timeout_secs: u64,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            search_url: "https://search.maven.org/solrsearch/select".to_string(),
            repository_url: "https://repo1.maven.org/maven2".to_string(),
            group: "org.mongodb.kafka".to_string(),
            artifact: "mongo-kafka-connect".to_string(),
            env_file: ".env".to_string(),
            download_dir: ".".to_string(),
            connect_timeout_secs: 10,
            request_timeout_secs: 120,
            lock_timeout_secs: 10,
        }
    }
}

// ============================================================================
// Installer Configuration
// ============================================================================

/// Dependency installer configuration.
///
/// `packages` is processed verbatim, in order. The default table carries a
/// duplicated `python@3` entry; `klaunch deps --audit` reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallerConfig {
    /// Package manager executable.
    pub manager: String,
    /// Packages to ensure are installed.
    pub packages: Vec<String>,
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            manager: "brew".to_string(),
            packages: vec![
                "python@3".to_string(),
                "python@3".to_string(),
                "pyenv".to_string(),
            ],
        }
    }
}
