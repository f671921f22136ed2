//! Error types for klaunch
//!
//! All library operations return [`KlaunchError`]. Uses `thiserror` for
//! `Display`/`Error` derives. Each variant belongs to one [`ErrorKind`], and
//! each kind maps to a distinct process exit code so the CLI stays scriptable.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

// ============================================================================
// Error Classification
// ============================================================================

/// Coarse classification used to pick a process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// I/O, config, JSON and anything else not listed below.
    Other,
    /// User-supplied input failed validation.
    MalformedInput,
    /// An external command exited unsuccessfully.
    Command,
    /// HTTP request failed or returned an unexpected status.
    Network,
    /// An outbound request exceeded its deadline.
    NetworkTimeout,
    /// Bounded health polling exhausted its attempts.
    HealthTimeout,
    /// The system package manager is not installed.
    ManagerMissing,
    /// A status-only check found the daemon down.
    DaemonDown,
}

impl ErrorKind {
    /// Process exit code for this kind. Success is always 0.
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorKind::Other => 1,
            ErrorKind::MalformedInput => 2,
            ErrorKind::Command => 3,
            ErrorKind::Network => 4,
            ErrorKind::NetworkTimeout => 5,
            ErrorKind::HealthTimeout => 6,
            ErrorKind::ManagerMissing => 7,
            ErrorKind::DaemonDown => 8,
        }
    }
}

// ============================================================================
// Primary Error Type
// ============================================================================

/// The primary error type for klaunch operations.
#[derive(Error, Debug)]
pub enum KlaunchError {
    /// Version string is not a `<major>.<minor>.<patch>` triplet.
    #[error("Invalid version format '{0}'. Please use x.y.z format.")]
    InvalidVersion(String),

    /// The daemon restart/start command itself failed.
    #[error("Failed to start {daemon}: `{command}` exited unsuccessfully")]
    StartFailed { daemon: String, command: String },

    /// The daemon did not report healthy within the polling bound.
    #[error("{daemon} failed to start within the expected time ({attempts} checks)")]
    HealthTimeout { daemon: String, attempts: u32 },

    /// Status-only check found the daemon down.
    #[error("{0} is not running")]
    DaemonDown(String),

    /// Package manager is not installed; nothing was attempted.
    #[error("{0} is not installed. Please install it first.")]
    ManagerMissing(String),

    /// One or more packages failed to install.
    #[error("Failed to install: {}", .0.join(", "))]
    InstallFailed(Vec<String>),

    /// Non-200 response from the artifact repository or index.
    #[error("Request to {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    /// Outbound request exceeded its deadline.
    #[error("Request to {url} timed out")]
    NetworkTimeout { url: String },

    /// The search index response did not contain a usable version.
    #[error("Metadata error: {0}")]
    Metadata(String),

    /// Exclusive lock on the env file could not be acquired in time.
    #[error("Timed out after {timeout:?} waiting for lock on {}", .path.display())]
    LockTimeout { path: PathBuf, timeout: Duration },

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Standard I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP transport errors (connection refused, TLS, body decode...).
    /// The cause is exposed as the source only, so `{:#}` prints it once.
    #[error("HTTP error")]
    Http(#[from] reqwest::Error),
}

impl KlaunchError {
    /// Classify this error for exit-code purposes.
    pub fn kind(&self) -> ErrorKind {
        match self {
            KlaunchError::InvalidVersion(_) => ErrorKind::MalformedInput,
            KlaunchError::StartFailed { .. } | KlaunchError::InstallFailed(_) => {
                ErrorKind::Command
            }
            KlaunchError::HealthTimeout { .. } => ErrorKind::HealthTimeout,
            KlaunchError::DaemonDown(_) => ErrorKind::DaemonDown,
            KlaunchError::ManagerMissing(_) => ErrorKind::ManagerMissing,
            KlaunchError::HttpStatus { .. } | KlaunchError::Metadata(_) => ErrorKind::Network,
            KlaunchError::NetworkTimeout { .. } => ErrorKind::NetworkTimeout,
            KlaunchError::Http(e) if e.is_timeout() => ErrorKind::NetworkTimeout,
            KlaunchError::Http(_) => ErrorKind::Network,
            KlaunchError::LockTimeout { .. }
            | KlaunchError::Config(_)
            | KlaunchError::Io(_)
            | KlaunchError::Json(_) => ErrorKind::Other,
        }
    }

    /// Shorthand for `self.kind().exit_code()`.
    pub fn exit_code(&self) -> i32 {
        self.kind().exit_code()
    }

    /// Convert a transport error, lifting deadline expiry into
    /// [`KlaunchError::NetworkTimeout`].
    pub fn from_request(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            KlaunchError::NetworkTimeout {
                url: url.to_string(),
            }
        } else {
            KlaunchError::Http(err)
        }
    }
}

/// A specialized `Result` type for klaunch operations.
pub type Result<T> = std::result::Result<T, KlaunchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_version_display() {
        let err = KlaunchError::InvalidVersion("1.2".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid version format '1.2'. Please use x.y.z format."
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: KlaunchError = io_err.into();
        assert!(matches!(err, KlaunchError::Io(_)));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_install_failed_lists_packages() {
        let err = KlaunchError::InstallFailed(vec!["pyenv".into(), "jq".into()]);
        assert_eq!(err.to_string(), "Failed to install: pyenv, jq");
    }

    #[test]
    fn test_exit_codes_are_distinct() {
        let kinds = [
            ErrorKind::Other,
            ErrorKind::MalformedInput,
            ErrorKind::Command,
            ErrorKind::Network,
            ErrorKind::NetworkTimeout,
            ErrorKind::HealthTimeout,
            ErrorKind::ManagerMissing,
            ErrorKind::DaemonDown,
        ];
        let mut codes: Vec<i32> = kinds.iter().map(|k| k.exit_code()).collect();
        assert!(codes.iter().all(|c| *c != 0));
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), kinds.len());
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            KlaunchError::InvalidVersion("x".into()).kind(),
            ErrorKind::MalformedInput
        );
        assert_eq!(
            KlaunchError::StartFailed {
                daemon: "Docker".into(),
                command: "open -a Docker".into()
            }
            .kind(),
            ErrorKind::Command
        );
        assert_eq!(
            KlaunchError::HealthTimeout {
                daemon: "Docker".into(),
                attempts: 30
            }
            .kind(),
            ErrorKind::HealthTimeout
        );
        assert_eq!(
            KlaunchError::HttpStatus {
                url: "http://x".into(),
                status: 404
            }
            .kind(),
            ErrorKind::Network
        );
        assert_eq!(
            KlaunchError::NetworkTimeout {
                url: "http://x".into()
            }
            .kind(),
            ErrorKind::NetworkTimeout
        );
        assert_eq!(
            KlaunchError::ManagerMissing("Homebrew".into()).kind(),
            ErrorKind::ManagerMissing
        );
        assert_eq!(
            KlaunchError::DaemonDown("Docker".into()).kind(),
            ErrorKind::DaemonDown
        );
        assert_eq!(
            KlaunchError::Config("bad".into()).kind(),
            ErrorKind::Other
        );
    }

    #[test]
    fn test_health_timeout_display() {
        let err = KlaunchError::HealthTimeout {
            daemon: "Docker daemon".into(),
            attempts: 60,
        };
        assert_eq!(
            err.to_string(),
            "Docker daemon failed to start within the expected time (60 checks)"
        );
    }

    #[tokio::test]
    async fn test_http_error_cause_printed_once() {
        // Bind then drop to get a local port with nothing listening.
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let url = format!("http://127.0.0.1:{port}/search");
        let req_err = reqwest::Client::new().get(&url).send().await.unwrap_err();
        let cause = req_err.to_string();

        let err = KlaunchError::from_request(&url, req_err);
        assert!(matches!(err, KlaunchError::Http(_)));
        assert_eq!(err.to_string(), "HTTP error");

        let rendered = format!("{:#}", anyhow::Error::from(err));
        assert!(rendered.starts_with("HTTP error: "));
        assert_eq!(rendered.matches(cause.as_str()).count(), 1);
    }
}
