//! Daemon health checker: status probe, restart, and bounded polling.
//!
//! A [`DaemonProbe`] answers two questions through external commands: is the
//! daemon up, and did the restart/start command succeed. [`ensure_running`]
//! applies the policy: report success if already up, otherwise start it and
//! poll once per interval until healthy or the attempt bound is exhausted.
//!
//! Platform variants are selected at compile time. [`ServiceManagerProbe`]
//! exists everywhere; [`DesktopAppProbe`] only exists on macOS, so
//! [`desktop_probe`] returns `None` on every other target.

#[cfg(target_os = "macos")]
pub mod desktop;
pub mod service;

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::config::DaemonConfig;
use crate::error::{KlaunchError, Result};

#[cfg(target_os = "macos")]
pub use desktop::DesktopAppProbe;
pub use service::ServiceManagerProbe;

/// Availability probe for a local daemon.
#[async_trait]
pub trait DaemonProbe: Send + Sync {
    /// Human-readable daemon name used in messages.
    fn name(&self) -> &str;

    /// The restart/start command, for messages.
    fn start_command(&self) -> String;

    /// Default number of health polls after a start.
    fn poll_bound(&self) -> u32;

    /// Non-interactive status query. Any failure reads as "not running".
    async fn is_running(&self) -> bool;

    /// Issue the restart/start command. `true` only means the command itself
    /// succeeded, not that the daemon is healthy yet.
    async fn attempt_start(&self) -> bool;
}

/// Progress notifications emitted by [`ensure_running`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DaemonEvent {
    /// Initial status check failed; a start is about to be issued.
    NotRunning,
    /// The start command succeeded; polling begins.
    StartIssued,
}

/// How a successful [`ensure_running`] call got there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaemonOutcome {
    /// Up on the first check; nothing was started.
    AlreadyRunning,
    /// Started and became healthy on poll number `attempts` (1-based).
    Recovered { attempts: u32 },
}

/// Bounded polling parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub attempts: u32,
    pub interval: Duration,
}

impl PollPolicy {
    /// Use the probe's own bound with the configured interval.
    pub fn for_probe(probe: &dyn DaemonProbe, config: &DaemonConfig) -> Self {
        Self {
            attempts: probe.poll_bound(),
            interval: config.poll_interval(),
        }
    }
}

/// The service-manager probe with the configured attempt bound.
pub fn service_probe(config: &DaemonConfig) -> ServiceManagerProbe {
    ServiceManagerProbe::new().with_attempts(config.service_attempts)
}

/// The desktop-app probe, or `None` when not built for macOS.
#[cfg(target_os = "macos")]
pub fn desktop_probe(config: &DaemonConfig) -> Option<Box<dyn DaemonProbe>> {
    Some(Box::new(
        DesktopAppProbe::new().with_attempts(config.desktop_attempts),
    ))
}

/// The desktop-app probe, or `None` when not built for macOS.
#[cfg(not(target_os = "macos"))]
pub fn desktop_probe(_config: &DaemonConfig) -> Option<Box<dyn DaemonProbe>> {
    None
}

/// Make sure the daemon is up, starting it and polling if necessary.
pub async fn ensure_running<F>(
    probe: &dyn DaemonProbe,
    policy: PollPolicy,
    mut on_event: F,
) -> Result<DaemonOutcome>
where
    F: FnMut(DaemonEvent),
{
    if probe.is_running().await {
        debug!(daemon = probe.name(), "already running");
        return Ok(DaemonOutcome::AlreadyRunning);
    }

    on_event(DaemonEvent::NotRunning);
    info!(daemon = probe.name(), command = %probe.start_command(), "issuing start");

    if !probe.attempt_start().await {
        warn!(daemon = probe.name(), "start command failed");
        return Err(KlaunchError::StartFailed {
            daemon: probe.name().to_string(),
            command: probe.start_command(),
        });
    }

    on_event(DaemonEvent::StartIssued);
    let attempts = wait_until_running(probe, policy).await?;
    Ok(DaemonOutcome::Recovered { attempts })
}

/// Poll `is_running` up to `policy.attempts` times, sleeping `policy.interval`
/// between polls. Returns the 1-based attempt that succeeded.
///
/// There is no sleep after the final failed poll.
pub async fn wait_until_running(probe: &dyn DaemonProbe, policy: PollPolicy) -> Result<u32> {
    for attempt in 1..=policy.attempts {
        if probe.is_running().await {
            info!(daemon = probe.name(), attempt, "healthy");
            return Ok(attempt);
        }
        debug!(daemon = probe.name(), attempt, max = policy.attempts, "not ready");
        if attempt < policy.attempts {
            tokio::time::sleep(policy.interval).await;
        }
    }

    Err(KlaunchError::HealthTimeout {
        daemon: probe.name().to_string(),
        attempts: policy.attempts,
    })
}

/// Status-only check; never starts anything.
pub async fn check_status(probe: &dyn DaemonProbe) -> Result<()> {
    if probe.is_running().await {
        Ok(())
    } else {
        Err(KlaunchError::DaemonDown(probe.name().to_string()))
    }
}
