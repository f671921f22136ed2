//! Artifact download from a Maven repository.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{debug, info};

use super::{ArtifactCoordinate, ConnectorVersion};
use crate::error::{KlaunchError, Result};
use crate::utils::fs::write_atomic;

/// Fetches an artifact for an exact version into a directory.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArtifactSource: Send + Sync {
    /// Download `coordinate` at `version` into `dest_dir`. Returns the path
    /// written. Nothing is written unless the full body was received.
    async fn download(
        &self,
        coordinate: &ArtifactCoordinate,
        version: &ConnectorVersion,
        dest_dir: &Path,
    ) -> Result<PathBuf>;
}

/// Plain HTTP GET against a Maven2-layout repository.
pub struct MavenRepository {
    client: reqwest::Client,
    base_url: String,
}

impl MavenRepository {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
        }
    }
}

#[async_trait]
impl ArtifactSource for MavenRepository {
    async fn download(
        &self,
        coordinate: &ArtifactCoordinate,
        version: &ConnectorVersion,
        dest_dir: &Path,
    ) -> Result<PathBuf> {
        let url = coordinate.download_url(&self.base_url, version);
        debug!(%url, "downloading artifact");

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| KlaunchError::from_request(&url, e))?;

        // Anything but 200 is a failure, including other 2xx codes.
        if resp.status() != StatusCode::OK {
            return Err(KlaunchError::HttpStatus {
                url,
                status: resp.status().as_u16(),
            });
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| KlaunchError::from_request(&url, e))?;

        let dest = dest_dir.join(coordinate.file_name(version));
        write_atomic(&dest, &body)?;
        info!(path = %dest.display(), bytes = body.len(), "artifact written");
        Ok(dest)
    }
}
