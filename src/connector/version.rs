//! Validated `<major>.<minor>.<patch>` connector versions.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{KlaunchError, Result};

// ASCII digits only; `\d` would also admit other Unicode digit classes.
static VERSION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+\.[0-9]+\.[0-9]+$").unwrap());

/// A version string that matched the numeric triplet pattern.
///
/// The string is kept verbatim (leading zeros included) since it is used to
/// build URLs and file names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectorVersion(String);

impl ConnectorVersion {
    /// Validate `input` against `^[0-9]+\.[0-9]+\.[0-9]+$`.
    pub fn parse(input: &str) -> Result<Self> {
        if VERSION_RE.is_match(input) {
            Ok(Self(input.to_string()))
        } else {
            Err(KlaunchError::InvalidVersion(input.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConnectorVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ConnectorVersion {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
