//! Dependency installer: ensure every package in the table is present.
//!
//! The manager itself is checked first; if it is missing nothing else is
//! invoked. Each table entry is then listed and installed only if the list
//! call fails. Install failures are recorded and the run continues.

pub mod manager;
pub mod types;

use tracing::{info, warn};

use crate::error::{KlaunchError, Result};

pub use manager::{CommandPackageManager, PackageManager};
pub use types::{Duplicate, InstallReport, PackageOutcome, PackageTable};

/// Progress notifications emitted by [`install_packages`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallEvent<'a> {
    ManagerPresent,
    AlreadyInstalled(&'a str),
    Installing(&'a str),
    WouldInstall(&'a str),
    InstallFailed(&'a str),
}

/// Walk the table in order. Returns the per-package report, or
/// `InstallFailed` listing every package whose install failed.
pub async fn install_packages<F>(
    manager: &dyn PackageManager,
    table: &PackageTable,
    dry_run: bool,
    mut on_event: F,
) -> Result<InstallReport>
where
    F: FnMut(InstallEvent<'_>),
{
    if !manager.is_present().await {
        return Err(KlaunchError::ManagerMissing(manager.display_name()));
    }
    on_event(InstallEvent::ManagerPresent);

    for dup in table.duplicates() {
        warn!(package = %dup.name, positions = ?dup.positions, "package listed more than once");
    }

    let mut report = InstallReport::default();
    for package in table.iter() {
        let outcome = if manager.is_installed(package).await {
            on_event(InstallEvent::AlreadyInstalled(package));
            PackageOutcome::AlreadyInstalled
        } else if dry_run {
            on_event(InstallEvent::WouldInstall(package));
            PackageOutcome::WouldInstall
        } else {
            on_event(InstallEvent::Installing(package));
            if manager.install(package).await {
                info!(package, "installed");
                PackageOutcome::Installed
            } else {
                warn!(package, "install failed");
                on_event(InstallEvent::InstallFailed(package));
                PackageOutcome::Failed
            }
        };
        report.entries.push((package.to_string(), outcome));
    }

    let failed = report.failed();
    if !failed.is_empty() {
        return Err(KlaunchError::InstallFailed(failed));
    }
    Ok(report)
}
