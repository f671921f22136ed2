//! Connector fetch command handler.

use anyhow::Result;

use klaunch::config::Config;
use klaunch::connector::{
    ArtifactStatus, ConnectorFetcher, FetchEvent, VersionRequest, VERSION_KEY,
};
use klaunch::log_component;

use super::common::prompt;

const VERSION_PROMPT: &str =
    "Enter the version number (x.y.z) or press Enter for the latest version:";

/// Resolve, download and record the connector version.
pub(crate) async fn cmd_fetch(
    config: &Config,
    version: Option<String>,
    latest: bool,
    skip_existing: bool,
) -> Result<()> {
    let request = match (version, latest) {
        (_, true) => VersionRequest::Latest,
        (Some(v), false) => VersionRequest::Explicit(v),
        (None, false) => VersionRequest::from_input(&prompt(VERSION_PROMPT)?),
    };

    let fetcher = ConnectorFetcher::from_config(&config.connector)?;
    let artifact = fetcher.coordinate().artifact.clone();

    let report = fetcher
        .run_with_progress(&request, skip_existing, |event| match event {
            FetchEvent::Resolved {
                version,
                latest: true,
            } => println!("Using latest version: {}", version),
            FetchEvent::Resolved { .. } => {}
            FetchEvent::Downloading(version) => {
                println!("Downloading {} version {}...", artifact, version)
            }
            FetchEvent::ArtifactReady(ArtifactStatus::Downloaded(path)) => {
                println!("Successfully downloaded {}", path.display())
            }
            FetchEvent::ArtifactReady(ArtifactStatus::AlreadyPresent(path)) => {
                println!("{} already exists, skipping download.", path.display())
            }
        })
        .await?;

    log_component!(
        info,
        "connector",
        "version recorded",
        previous = report.previous.as_deref().unwrap_or("none")
    );
    println!(
        "Updated {} file with {}={}",
        fetcher.env_file().path().display(),
        VERSION_KEY,
        report.version
    );
    if let Some(prev) = report
        .previous
        .as_deref()
        .filter(|p| *p != report.version.as_str())
    {
        println!("Previous version was {}", prev);
    }
    Ok(())
}
