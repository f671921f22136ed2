//! Latest-version lookup against the Maven Central search index.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::ArtifactCoordinate;
use crate::error::{KlaunchError, Result};

/// Source of the newest published version of an artifact.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VersionIndex: Send + Sync {
    /// The raw `latestVersion` string as published, unvalidated.
    async fn latest_version(&self, coordinate: &ArtifactCoordinate) -> Result<String>;
}

// ============================================================================
// Solr search response
// ============================================================================

#[derive(Debug, Deserialize)]
struct SearchResponse {
    response: SearchBody,
}

#[derive(Debug, Deserialize)]
struct SearchBody {
    #[serde(default)]
    docs: Vec<SearchDoc>,
}

#[derive(Debug, Deserialize)]
struct SearchDoc {
    #[serde(rename = "latestVersion")]
    latest_version: Option<String>,
}

/// Extract `response.docs[0].latestVersion`.
fn first_latest_version(body: SearchResponse) -> Result<String> {
    let doc = body
        .response
        .docs
        .into_iter()
        .next()
        .ok_or_else(|| KlaunchError::Metadata("search returned no results".into()))?;
    doc.latest_version
        .ok_or_else(|| KlaunchError::Metadata("first result has no latestVersion".into()))
}

// ============================================================================
// HTTP implementation
// ============================================================================

/// `GET {search_url}?q=g:<group> AND a:<artifact>&rows=1&wt=json`.
pub struct MavenSearchIndex {
    client: reqwest::Client,
    search_url: String,
}

impl MavenSearchIndex {
    pub fn new(client: reqwest::Client, search_url: &str) -> Self {
        Self {
            client,
            search_url: search_url.to_string(),
        }
    }
}

#[async_trait]
impl VersionIndex for MavenSearchIndex {
    async fn latest_version(&self, coordinate: &ArtifactCoordinate) -> Result<String> {
        let query = format!("g:{} AND a:{}", coordinate.group, coordinate.artifact);
        debug!(url = %self.search_url, %query, "querying search index");

        let resp = self
            .client
            .get(&self.search_url)
            .query(&[("q", query.as_str()), ("rows", "1"), ("wt", "json")])
            .send()
            .await
            .map_err(|e| KlaunchError::from_request(&self.search_url, e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(KlaunchError::HttpStatus {
                url: self.search_url.clone(),
                status: status.as_u16(),
            });
        }

        let body: SearchResponse = resp
            .json()
            .await
            .map_err(|e| KlaunchError::from_request(&self.search_url, e))?;
        first_latest_version(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<String> {
        first_latest_version(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn test_extracts_first_latest_version() {
        let json = r#"{
            "responseHeader": {"status": 0},
            "response": {"numFound": 2, "start": 0, "docs": [
                {"id": "org.mongodb.kafka:mongo-kafka-connect", "latestVersion": "1.11.2"},
                {"id": "other", "latestVersion": "9.9.9"}
            ]}
        }"#;
        assert_eq!(parse(json).unwrap(), "1.11.2");
    }

    #[test]
    fn test_empty_docs_is_metadata_error() {
        let err = parse(r#"{"response": {"numFound": 0, "docs": []}}"#).unwrap_err();
        assert!(matches!(err, KlaunchError::Metadata(_)));
    }

    #[test]
    fn test_missing_latest_version_is_metadata_error() {
        let err = parse(r#"{"response": {"docs": [{"id": "x"}]}}"#).unwrap_err();
        assert!(matches!(err, KlaunchError::Metadata(_)));
    }

    #[tokio::test]
    async fn test_http_index_queries_once() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/solrsearch/select")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded(
                    "q".into(),
                    "g:org.mongodb.kafka AND a:mongo-kafka-connect".into(),
                ),
                mockito::Matcher::UrlEncoded("rows".into(), "1".into()),
                mockito::Matcher::UrlEncoded("wt".into(), "json".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"response": {"docs": [{"latestVersion": "1.12.0"}]}}"#)
            .expect(1)
            .create_async()
            .await;

        let index = MavenSearchIndex::new(
            reqwest::Client::new(),
            &format!("{}/solrsearch/select", server.url()),
        );
        let version = index
            .latest_version(&ArtifactCoordinate::mongo_kafka_connect())
            .await
            .unwrap();
        assert_eq!(version, "1.12.0");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_http_index_error_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", mockito::Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let index = MavenSearchIndex::new(reqwest::Client::new(), &server.url());
        let err = index
            .latest_version(&ArtifactCoordinate::mongo_kafka_connect())
            .await
            .unwrap_err();
        assert!(matches!(err, KlaunchError::HttpStatus { status: 503, .. }));
    }
}
