//! Key/value `.env` file holding the connector version.
//!
//! Updates are a locked read-modify-write: an exclusive lock on the sidecar
//! `<file>.lock` is held while the file is read, edited and atomically
//! replaced. Unrelated lines (comments, other keys, blank lines) are kept
//! verbatim, line endings included.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, warn};

use super::lock::FileLock;
use crate::error::Result;
use crate::utils::fs::write_atomic;

/// Env key recording the downloaded connector version.
pub const VERSION_KEY: &str = "MONGO_KAFKA_CONNECT_VERSION";

/// A `.env` file on disk.
#[derive(Debug, Clone)]
pub struct EnvFile {
    path: PathBuf,
    lock_timeout: Duration,
}

impl EnvFile {
    pub fn new(path: impl Into<PathBuf>, lock_timeout: Duration) -> Self {
        Self {
            path: path.into(),
            lock_timeout,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sidecar lock path (`.env` -> `.env.lock`).
    pub fn lock_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".lock");
        self.path.with_file_name(name)
    }

    /// Current value of `key`, or `None` if the file or key is absent.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let iter = match dotenvy::from_path_iter(&self.path) {
            Ok(iter) => iter,
            Err(dotenvy::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(None)
            }
            Err(dotenvy::Error::Io(e)) => return Err(e.into()),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "unreadable env file");
                return Ok(None);
            }
        };

        let mut found = None;
        for item in iter {
            match item {
                Ok((k, v)) if k == key => found = Some(v),
                Ok(_) => {}
                Err(e) => {
                    warn!(path = %self.path.display(), error = %e, "skipping malformed env line");
                }
            }
        }
        Ok(found)
    }

    /// Set `key` to `value`, creating the file if needed. Returns the
    /// previous value.
    pub fn set(&self, key: &str, value: &str) -> Result<Option<String>> {
        let _lock = FileLock::acquire(&self.lock_path(), self.lock_timeout)?;

        let previous = self.get(key)?;
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e.into()),
        };

        let updated = upsert(&content, key, value);
        write_atomic(&self.path, updated.as_bytes())?;
        debug!(path = %self.path.display(), key, value, ?previous, "env file updated");
        Ok(previous)
    }
}

/// Key of an assignment line, if it is one (`KEY=...` or `export KEY=...`).
fn line_key(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    if trimmed.starts_with('#') {
        return None;
    }
    let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
    let (key, _) = trimmed.split_once('=')?;
    Some(key.trim())
}

/// Replace every assignment of `key` with `key=value`, or append one.
///
/// Each line keeps its own terminator. A missing final terminator and the
/// appended line use CRLF if the file already contains any, LF otherwise.
fn upsert(content: &str, key: &str, value: &str) -> String {
    let eol = if content.contains("\r\n") { "\r\n" } else { "\n" };
    let assignment = format!("{}={}", key, value);
    let mut out = String::with_capacity(content.len() + assignment.len() + eol.len());
    let mut replaced = false;

    for line in content.split_inclusive('\n') {
        let body = line.trim_end_matches(&['\r', '\n'][..]);
        let ending = match &line[body.len()..] {
            "" => eol,
            ending => ending,
        };
        if line_key(body) == Some(key) {
            replaced = true;
            out.push_str(&assignment);
        } else {
            out.push_str(body);
        }
        out.push_str(ending);
    }

    if !replaced {
        out.push_str(&assignment);
        out.push_str(eol);
    }
    out
}
