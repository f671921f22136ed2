//! Connector artifact fetcher.
//!
//! Resolves a version (explicit, or latest from the search index), downloads
//! the matching JAR, and records the version in the env file. The env file is
//! only touched after the artifact is on disk.

pub mod download;
pub mod envfile;
pub mod index;
pub mod lock;
pub mod version;

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use crate::config::ConnectorConfig;
use crate::error::{KlaunchError, Result};

pub use download::{ArtifactSource, MavenRepository};
pub use envfile::{EnvFile, VERSION_KEY};
pub use index::{MavenSearchIndex, VersionIndex};
pub use version::ConnectorVersion;

/// `(group, artifact)` pair identifying a package in a Maven repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactCoordinate {
    pub group: String,
    pub artifact: String,
}

impl ArtifactCoordinate {
    pub fn new(group: &str, artifact: &str) -> Self {
        Self {
            group: group.to_string(),
            artifact: artifact.to_string(),
        }
    }

    /// `org.mongodb.kafka:mongo-kafka-connect`
    pub fn mongo_kafka_connect() -> Self {
        Self::new("org.mongodb.kafka", "mongo-kafka-connect")
    }

    /// `<artifact>-<version>.jar`
    pub fn file_name(&self, version: &ConnectorVersion) -> String {
        format!("{}-{}.jar", self.artifact, version)
    }

    /// `<base>/<group path>/<artifact>/<version>/<artifact>-<version>.jar`
    pub fn download_url(&self, base_url: &str, version: &ConnectorVersion) -> String {
        format!(
            "{}/{}/{}/{}/{}",
            base_url.trim_end_matches('/'),
            self.group.replace('.', "/"),
            self.artifact,
            version,
            self.file_name(version)
        )
    }
}

/// Build the shared HTTP client with explicit deadlines.
pub fn http_client(config: &ConnectorConfig) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .connect_timeout(config.connect_timeout())
        .timeout(config.request_timeout())
        .user_agent(concat!("klaunch/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| KlaunchError::Config(format!("HTTP client error: {e}")))
}

/// Which version to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionRequest {
    /// Ask the search index.
    Latest,
    /// Caller-supplied; validated before any network access.
    Explicit(String),
}

impl VersionRequest {
    /// Interpret a prompt answer (line terminator already removed). Only an
    /// empty answer means latest; anything else, whitespace included, is
    /// validated exactly as typed.
    pub fn from_input(input: &str) -> Self {
        if input.is_empty() {
            VersionRequest::Latest
        } else {
            VersionRequest::Explicit(input.to_string())
        }
    }
}

/// Result of placing the artifact on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactStatus {
    /// Downloaded in this run.
    Downloaded(PathBuf),
    /// Already present and `skip_existing` was set.
    AlreadyPresent(PathBuf),
}

/// Progress notifications emitted by [`ConnectorFetcher::run_with_progress`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchEvent<'a> {
    /// Version validated. `latest` when it came from the index.
    Resolved {
        version: &'a ConnectorVersion,
        latest: bool,
    },
    /// About to download the artifact. Skipped when it is already present.
    Downloading(&'a ConnectorVersion),
    /// Artifact on disk; the env file is updated next.
    ArtifactReady(&'a ArtifactStatus),
}

/// Summary of a completed fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchReport {
    pub version: ConnectorVersion,
    pub artifact: ArtifactStatus,
    /// Env value before this run, if any.
    pub previous: Option<String>,
}

/// Ties the index, the repository and the env file together.
pub struct ConnectorFetcher {
    coordinate: ArtifactCoordinate,
    index: Arc<dyn VersionIndex>,
    source: Arc<dyn ArtifactSource>,
    env: EnvFile,
    download_dir: PathBuf,
}

impl ConnectorFetcher {
    pub fn new(
        coordinate: ArtifactCoordinate,
        index: Arc<dyn VersionIndex>,
        source: Arc<dyn ArtifactSource>,
        env: EnvFile,
        download_dir: PathBuf,
    ) -> Self {
        Self {
            coordinate,
            index,
            source,
            env,
            download_dir,
        }
    }

    /// Wire up the HTTP index and repository from config.
    pub fn from_config(config: &ConnectorConfig) -> Result<Self> {
        let client = http_client(config)?;
        Ok(Self::new(
            ArtifactCoordinate::new(&config.group, &config.artifact),
            Arc::new(MavenSearchIndex::new(client.clone(), &config.search_url)),
            Arc::new(MavenRepository::new(client, &config.repository_url)),
            EnvFile::new(&config.env_file, config.lock_timeout()),
            PathBuf::from(&config.download_dir),
        ))
    }

    pub fn coordinate(&self) -> &ArtifactCoordinate {
        &self.coordinate
    }

    pub fn env_file(&self) -> &EnvFile {
        &self.env
    }

    /// Resolve the request to a validated version.
    ///
    /// Explicit input is validated first and never reaches the network when
    /// malformed. The index answer is validated the same way.
    async fn resolve(&self, request: &VersionRequest) -> Result<ConnectorVersion> {
        match request {
            VersionRequest::Explicit(input) => ConnectorVersion::parse(input),
            VersionRequest::Latest => {
                let latest = self.index.latest_version(&self.coordinate).await?;
                info!(version = %latest, "latest version from index");
                ConnectorVersion::parse(&latest)
            }
        }
    }

    /// Put the artifact for `version` on disk. `Downloading` is only emitted
    /// when the repository is actually contacted.
    async fn fetch_artifact(
        &self,
        version: &ConnectorVersion,
        skip_existing: bool,
        on_event: &mut (dyn FnMut(FetchEvent<'_>) + Send),
    ) -> Result<ArtifactStatus> {
        let target = self.download_dir.join(self.coordinate.file_name(version));
        if skip_existing && target.is_file() {
            info!(path = %target.display(), "artifact already present, skipping download");
            return Ok(ArtifactStatus::AlreadyPresent(target));
        }

        on_event(FetchEvent::Downloading(version));
        let path = self
            .source
            .download(&self.coordinate, version, &self.download_dir)
            .await?;
        Ok(ArtifactStatus::Downloaded(path))
    }

    /// Record `version` in the env file under the exclusive lock.
    async fn record_version(&self, version: &ConnectorVersion) -> Result<Option<String>> {
        let env = self.env.clone();
        let value = version.to_string();
        tokio::task::spawn_blocking(move || env.set(VERSION_KEY, &value))
            .await
            .map_err(|e| KlaunchError::Io(std::io::Error::other(e)))?
    }

    /// Resolve, download, then record. Stops at the first failure, so a
    /// failed download leaves the env file untouched.
    pub async fn run(&self, request: &VersionRequest, skip_existing: bool) -> Result<FetchReport> {
        self.run_with_progress(request, skip_existing, |_| {}).await
    }

    /// [`run`](Self::run), reporting each step through `on_event`.
    pub async fn run_with_progress<F>(
        &self,
        request: &VersionRequest,
        skip_existing: bool,
        mut on_event: F,
    ) -> Result<FetchReport>
    where
        F: FnMut(FetchEvent<'_>) + Send,
    {
        let version = self.resolve(request).await?;
        on_event(FetchEvent::Resolved {
            version: &version,
            latest: *request == VersionRequest::Latest,
        });

        let artifact = self
            .fetch_artifact(&version, skip_existing, &mut on_event)
            .await?;
        on_event(FetchEvent::ArtifactReady(&artifact));

        let previous = self.record_version(&version).await?;
        Ok(FetchReport {
            version,
            artifact,
            previous,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::download::MockArtifactSource;
    use super::index::MockVersionIndex;
    use super::*;
    use std::time::Duration;

    fn fetcher(
        index: MockVersionIndex,
        source: MockArtifactSource,
        dir: &tempfile::TempDir,
    ) -> ConnectorFetcher {
        ConnectorFetcher::new(
            ArtifactCoordinate::mongo_kafka_connect(),
            Arc::new(index),
            Arc::new(source),
            EnvFile::new(dir.path().join(".env"), Duration::from_secs(1)),
            dir.path().to_path_buf(),
        )
    }

    fn writing_source(times: usize) -> MockArtifactSource {
        let mut source = MockArtifactSource::new();
        source
            .expect_download()
            .times(times)
            .returning(|coord, version, dir| {
                let path = dir.join(coord.file_name(version));
                std::fs::write(&path, b"jar").unwrap();
                Ok(path)
            });
        source
    }

    #[test]
    fn test_coordinate_file_name_and_url() {
        let coord = ArtifactCoordinate::mongo_kafka_connect();
        let v = ConnectorVersion::parse("1.11.0").unwrap();
        assert_eq!(coord.file_name(&v), "mongo-kafka-connect-1.11.0.jar");
        assert_eq!(
            coord.download_url("https://repo1.maven.org/maven2/", &v),
            "https://repo1.maven.org/maven2/org/mongodb/kafka/mongo-kafka-connect/1.11.0/mongo-kafka-connect-1.11.0.jar"
        );
    }

    #[test]
    fn test_version_request_from_input() {
        assert_eq!(VersionRequest::from_input(""), VersionRequest::Latest);
        assert_eq!(
            VersionRequest::from_input("1.2.3"),
            VersionRequest::Explicit("1.2.3".into())
        );
        // Whitespace is not "empty" and is never trimmed away.
        assert_eq!(
            VersionRequest::from_input("   "),
            VersionRequest::Explicit("   ".into())
        );
        assert_eq!(
            VersionRequest::from_input(" 1.2.3 "),
            VersionRequest::Explicit(" 1.2.3 ".into())
        );
    }

    #[tokio::test]
    async fn test_whitespace_answers_rejected_without_calls() {
        for answer in ["   ", "\t", " 1.2.3 ", "1.2.3 "] {
            let dir = tempfile::tempdir().unwrap();
            let mut index = MockVersionIndex::new();
            index.expect_latest_version().times(0);
            let mut source = MockArtifactSource::new();
            source.expect_download().times(0);

            let f = fetcher(index, source, &dir);
            let err = f
                .run(&VersionRequest::from_input(answer), false)
                .await
                .unwrap_err();
            assert!(
                matches!(err, KlaunchError::InvalidVersion(ref v) if v == answer),
                "answer {answer:?} should be rejected, got {err:?}"
            );
            assert!(!dir.path().join(".env").exists());
        }
    }

    #[tokio::test]
    async fn test_progress_events_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut index = MockVersionIndex::new();
        index
            .expect_latest_version()
            .times(1)
            .returning(|_| Ok("1.12.0".to_string()));

        let f = fetcher(index, writing_source(1), &dir);
        let mut events = Vec::new();
        f.run_with_progress(&VersionRequest::Latest, false, |e| {
            events.push(format!("{e:?}"))
        })
        .await
        .unwrap();

        assert_eq!(events.len(), 3);
        assert!(events[0].starts_with("Resolved"));
        assert!(events[0].contains("latest: true"));
        assert!(events[1].starts_with("Downloading"));
        assert!(events[2].starts_with("ArtifactReady(Downloaded("));
    }

    #[tokio::test]
    async fn test_failed_download_emits_no_ready_event() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = MockArtifactSource::new();
        source.expect_download().times(1).returning(|_, _, _| {
            Err(KlaunchError::HttpStatus {
                url: "http://repo/x.jar".into(),
                status: 404,
            })
        });

        let f = fetcher(MockVersionIndex::new(), source, &dir);
        let mut ready = 0;
        let err = f
            .run_with_progress(&VersionRequest::Explicit("1.0.0".into()), false, |e| {
                if matches!(e, FetchEvent::ArtifactReady(_)) {
                    ready += 1;
                }
            })
            .await
            .unwrap_err();
        assert!(matches!(err, KlaunchError::HttpStatus { .. }));
        assert_eq!(ready, 0);
    }

    #[tokio::test]
    async fn test_invalid_explicit_version_makes_no_calls() {
        let dir = tempfile::tempdir().unwrap();
        let mut index = MockVersionIndex::new();
        index.expect_latest_version().times(0);
        let mut source = MockArtifactSource::new();
        source.expect_download().times(0);

        let f = fetcher(index, source, &dir);
        let err = f
            .run(&VersionRequest::Explicit("1.2".into()), false)
            .await
            .unwrap_err();
        assert!(matches!(err, KlaunchError::InvalidVersion(_)));
        assert_eq!(err.exit_code(), 2);
        assert!(!dir.path().join(".env").exists());
    }

    #[tokio::test]
    async fn test_latest_queries_index_once_and_uses_value_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let mut index = MockVersionIndex::new();
        index
            .expect_latest_version()
            .times(1)
            .returning(|_| Ok("1.13.1".to_string()));

        let f = fetcher(index, writing_source(1), &dir);
        let report = f.run(&VersionRequest::Latest, false).await.unwrap();
        assert_eq!(report.version.as_str(), "1.13.1");
        assert!(dir.path().join("mongo-kafka-connect-1.13.1.jar").exists());
        assert_eq!(
            f.env_file().get(VERSION_KEY).unwrap().as_deref(),
            Some("1.13.1")
        );
    }

    #[tokio::test]
    async fn test_explicit_version_skips_index() {
        let dir = tempfile::tempdir().unwrap();
        let mut index = MockVersionIndex::new();
        index.expect_latest_version().times(0);

        let f = fetcher(index, writing_source(1), &dir);
        let report = f
            .run(&VersionRequest::Explicit("1.10.0".into()), false)
            .await
            .unwrap();
        assert_eq!(
            report.artifact,
            ArtifactStatus::Downloaded(dir.path().join("mongo-kafka-connect-1.10.0.jar"))
        );
        assert_eq!(report.previous, None);
    }

    #[tokio::test]
    async fn test_malformed_index_answer_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut index = MockVersionIndex::new();
        index
            .expect_latest_version()
            .times(1)
            .returning(|_| Ok("1.14.0-rc1".to_string()));
        let mut source = MockArtifactSource::new();
        source.expect_download().times(0);

        let f = fetcher(index, source, &dir);
        let err = f.run(&VersionRequest::Latest, false).await.unwrap_err();
        assert!(matches!(err, KlaunchError::InvalidVersion(_)));
    }

    #[tokio::test]
    async fn test_failed_download_leaves_env_untouched() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".env"), "MONGO_KAFKA_CONNECT_VERSION=1.0.0\n").unwrap();

        let index = MockVersionIndex::new();
        let mut source = MockArtifactSource::new();
        source.expect_download().times(1).returning(|_, _, _| {
            Err(KlaunchError::HttpStatus {
                url: "http://repo/x.jar".into(),
                status: 404,
            })
        });

        let f = fetcher(index, source, &dir);
        let err = f
            .run(&VersionRequest::Explicit("9.9.9".into()), false)
            .await
            .unwrap_err();
        assert!(matches!(err, KlaunchError::HttpStatus { status: 404, .. }));
        assert_eq!(
            std::fs::read_to_string(dir.path().join(".env")).unwrap(),
            "MONGO_KAFKA_CONNECT_VERSION=1.0.0\n"
        );
    }

    #[tokio::test]
    async fn test_skip_existing_does_not_download() {
        let dir = tempfile::tempdir().unwrap();
        let existing = dir.path().join("mongo-kafka-connect-1.11.0.jar");
        std::fs::write(&existing, b"cached").unwrap();

        let mut source = MockArtifactSource::new();
        source.expect_download().times(0);

        let f = fetcher(MockVersionIndex::new(), source, &dir);
        let mut downloading = 0;
        let report = f
            .run_with_progress(&VersionRequest::Explicit("1.11.0".into()), true, |e| {
                if matches!(e, FetchEvent::Downloading(_)) {
                    downloading += 1;
                }
            })
            .await
            .unwrap();
        assert_eq!(downloading, 0);
        assert_eq!(report.artifact, ArtifactStatus::AlreadyPresent(existing.clone()));
        assert_eq!(std::fs::read(&existing).unwrap(), b"cached");
        assert_eq!(
            f.env_file().get(VERSION_KEY).unwrap().as_deref(),
            Some("1.11.0")
        );
    }

    #[tokio::test]
    async fn test_existing_file_redownloaded_without_skip() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("mongo-kafka-connect-1.11.0.jar"), b"cached").unwrap();

        let f = fetcher(MockVersionIndex::new(), writing_source(1), &dir);
        let report = f
            .run(&VersionRequest::Explicit("1.11.0".into()), false)
            .await
            .unwrap();
        assert!(matches!(report.artifact, ArtifactStatus::Downloaded(_)));
    }

    #[tokio::test]
    async fn test_previous_version_reported() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".env"), "MONGO_KAFKA_CONNECT_VERSION=1.9.0\n").unwrap();

        let f = fetcher(MockVersionIndex::new(), writing_source(1), &dir);
        let report = f
            .run(&VersionRequest::Explicit("1.11.0".into()), false)
            .await
            .unwrap();
        assert_eq!(report.previous.as_deref(), Some("1.9.0"));
    }

    #[test]
    fn test_http_client_builds() {
        assert!(http_client(&ConnectorConfig::default()).is_ok());
    }
}
