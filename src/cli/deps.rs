//! Dependency installer command handler.

use anyhow::Result;

use klaunch::config::Config;
use klaunch::deps::{
    install_packages, CommandPackageManager, InstallEvent, PackageManager, PackageOutcome,
    PackageTable,
};

/// Install the configured packages, or audit/dry-run them.
pub(crate) async fn cmd_deps(config: &Config, audit: bool, dry_run: bool) -> Result<()> {
    let table = PackageTable::new(config.installer.packages.clone());

    if audit {
        print_audit(&table);
        return Ok(());
    }

    let manager = CommandPackageManager::new(&config.installer.manager);
    let via = manager.display_name();
    let report = install_packages(&manager, &table, dry_run, |event| match event {
        InstallEvent::ManagerPresent => println!("{} is installed.", via),
        InstallEvent::AlreadyInstalled(pkg) => {
            println!("{} is already installed via {}.", pkg, via)
        }
        InstallEvent::Installing(pkg) => println!("Installing {} via {}...", pkg, via),
        InstallEvent::WouldInstall(pkg) => println!("Would install {} via {}.", pkg, via),
        InstallEvent::InstallFailed(pkg) => eprintln!("Failed to install {}.", pkg),
    })
    .await?;

    if dry_run {
        println!(
            "Dry run: {} package(s) would be installed.",
            report.count(&PackageOutcome::WouldInstall)
        );
    }
    Ok(())
}

fn print_audit(table: &PackageTable) {
    println!("Package table ({} entries):", table.len());
    for (i, pkg) in table.iter().enumerate() {
        println!("  {}. {}", i + 1, pkg);
    }

    let duplicates = table.duplicates();
    if duplicates.is_empty() {
        println!("No duplicate entries.");
        return;
    }
    for dup in duplicates {
        let positions: Vec<String> = dup.positions.iter().map(|p| (p + 1).to_string()).collect();
        println!(
            "Warning: {} is listed {} times (entries {})",
            dup.name,
            dup.positions.len(),
            positions.join(", ")
        );
    }
}
