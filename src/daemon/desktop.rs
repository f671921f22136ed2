//! Desktop-application variant (macOS only).
//!
//! Docker Desktop has no service unit; the daemon comes up when the app is
//! launched with `open -a Docker`, which takes longer than a service restart.

use async_trait::async_trait;

use crate::utils::command::CommandSpec;
use super::DaemonProbe;

/// Docker Desktop launched through LaunchServices.
#[derive(Debug, Clone)]
pub struct DesktopAppProbe {
    status: CommandSpec,
    launch: CommandSpec,
    attempts: u32,
}

impl DesktopAppProbe {
    /// Default poll bound after launching the app.
    pub const DEFAULT_ATTEMPTS: u32 = 60;

    pub fn new() -> Self {
        Self {
            status: CommandSpec::new("docker", &["info"]),
            launch: CommandSpec::new("open", &["-a", "Docker"]),
            attempts: Self::DEFAULT_ATTEMPTS,
        }
    }

    /// Override the poll bound.
    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }
}

impl Default for DesktopAppProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DaemonProbe for DesktopAppProbe {
    fn name(&self) -> &str {
        "Docker daemon"
    }

    fn start_command(&self) -> String {
        self.launch.to_string()
    }

    fn poll_bound(&self) -> u32 {
        self.attempts
    }

    async fn is_running(&self) -> bool {
        self.status.succeeds(true).await
    }

    async fn attempt_start(&self) -> bool {
        self.launch.succeeds(false).await
    }
}
