//! Service-manager variant: restarts the daemon through systemd.
//!
//! Runs on any host; it does not check the operating system first.

use async_trait::async_trait;

use crate::utils::command::CommandSpec;
use super::DaemonProbe;

/// Docker managed by a system service manager (`systemctl`).
#[derive(Debug, Clone)]
pub struct ServiceManagerProbe {
    status: CommandSpec,
    restart: CommandSpec,
    attempts: u32,
}

impl ServiceManagerProbe {
    /// Default poll bound after a restart.
    pub const DEFAULT_ATTEMPTS: u32 = 30;

    /// `docker info` / `sudo systemctl restart docker`.
    pub fn new() -> Self {
        Self {
            status: CommandSpec::new("docker", &["info"]),
            restart: CommandSpec::new("sudo", &["systemctl", "restart", "docker"]),
            attempts: Self::DEFAULT_ATTEMPTS,
        }
    }

    /// Override the poll bound.
    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }

    /// Replace the status and restart commands.
    #[cfg(test)]
    pub(crate) fn with_commands(mut self, status: CommandSpec, restart: CommandSpec) -> Self {
        self.status = status;
        self.restart = restart;
        self
    }
}

impl Default for ServiceManagerProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DaemonProbe for ServiceManagerProbe {
    fn name(&self) -> &str {
        "Docker daemon"
    }

    fn start_command(&self) -> String {
        self.restart.to_string()
    }

    fn poll_bound(&self) -> u32 {
        self.attempts
    }

    async fn is_running(&self) -> bool {
        self.status.succeeds(true).await
    }

    async fn attempt_start(&self) -> bool {
        self.restart.succeeds(false).await
    }
}
