//! Metadata and search API HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use crate::api::types::*;
use crate::api::AppInfoProvider;
use crate::error::{Error, Result};
use crate::sources::{SourceRegistry, SourceTemplate};

/// Longest response excerpt quoted in parse errors.
const ERROR_EXCERPT_LEN: usize = 200;

/// Client for the application metadata and search endpoints.
#[derive(Debug, Clone)]
pub struct MetadataApi {
    client: Client,
    metadata: SourceTemplate,
    search: String,
    timeout: Duration,
}

impl MetadataApi {
    pub fn new(client: Client, registry: &SourceRegistry, timeout: Duration) -> Self {
        Self {
            client,
            metadata: registry.metadata.clone(),
            search: registry.search.clone(),
            timeout,
        }
    }

    /// GET a JSON document.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| Error::Api(format!("Request to {} failed: {}", url, e)))?;

        let status = response.status();
        tracing::debug!("Response status: {}", status);
        if status != StatusCode::OK {
            return Err(Error::Api(format!("HTTP {} from {}", status, url)));
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            Error::Api(format!(
                "Failed to parse response from {}: {} - Response: {}",
                url,
                e,
                excerpt(&text)
            ))
        })
    }

    /// Fetch the metadata entry for one identifier.
    pub async fn get_app_info(&self, id: &str) -> Result<AppEntry> {
        let url = self.metadata.render(id);
        let mut response: AppInfoResponse = self.get_json(&url).await?;

        response
            .data
            .remove(id)
            .ok_or_else(|| Error::NotFound(format!("No metadata for {}", id)))
    }

    /// Search applications by name. An empty result is not an error.
    pub async fn search_apps(&self, text: &str) -> Result<Vec<AppSummary>> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::Api("Search text cannot be empty".to_string()));
        }

        let url = url::Url::parse_with_params(&self.search, &[("search", text)])?;
        tracing::info!("Searching for '{}'", text);

        let response: SearchResponse = self.get_json(url.as_str()).await?;
        tracing::info!("Search returned {} result(s)", response.games.len());
        Ok(response.games)
    }
}

#[async_trait]
impl AppInfoProvider for MetadataApi {
    async fn app_info(&self, id: &str) -> Result<AppEntry> {
        self.get_app_info(id).await
    }

    async fn search(&self, text: &str) -> Result<Vec<AppSummary>> {
        self.search_apps(text).await
    }
}

fn excerpt(text: &str) -> &str {
    match text.char_indices().nth(ERROR_EXCERPT_LEN) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::build_client;
    use crate::test_support::{Reply, TestServer};

    fn api(server: &TestServer) -> MetadataApi {
        let registry = SourceRegistry {
            metadata: SourceTemplate::new(server.url("/v1/info/{id}")),
            search: server.url("/api/loadGames.php"),
            ..Default::default()
        };
        MetadataApi::new(
            build_client("unlock-fetcher-tests").unwrap(),
            &registry,
            Duration::from_secs(2),
        )
    }

    #[tokio::test]
    async fn test_get_app_info_picks_entry_for_id() {
        let server = TestServer::start(|_| {
            Reply::Body(
                br#"{"data": {"440": {"common": {"listofdlc": "1,2"}, "depots": "x"}}}"#.to_vec(),
            )
        })
        .await;

        let entry = api(&server).get_app_info("440").await.unwrap();
        assert_eq!(entry.common["listofdlc"], "1,2");
        assert_eq!(entry.depots, PackageSet::Flag("x".to_string()));
        assert_eq!(server.hits("GET", "/v1/info/440"), 1);
    }

    #[tokio::test]
    async fn test_missing_entry_is_not_found() {
        let server = TestServer::start(|_| Reply::Body(br#"{"data": {}}"#.to_vec())).await;
        let err = api(&server).get_app_info("440").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_error_status_and_bad_json() {
        let server = TestServer::start(|req| match req.path.as_str() {
            "/v1/info/1" => Reply::Status(503),
            _ => Reply::Body(b"<html>maintenance</html>".to_vec()),
        })
        .await;

        let api = api(&server);
        assert!(matches!(api.get_app_info("1").await, Err(Error::Api(_))));
        assert!(matches!(api.get_app_info("2").await, Err(Error::Api(_))));
    }

    #[tokio::test]
    async fn test_search_encodes_query() {
        let server = TestServer::start(|req| match req.query.as_deref() {
            Some("search=half+life%3A+alyx") => Reply::Body(
                br#"{"games": [{"appid": 546560, "name": "Half-Life: Alyx"}]}"#.to_vec(),
            ),
            _ => Reply::Body(br#"{"games": []}"#.to_vec()),
        })
        .await;

        let api = api(&server);
        let games = api.search_apps("  half life: alyx ").await.unwrap();
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].appid, 546560);

        assert!(api.search_apps("nothing").await.unwrap().is_empty());
        assert!(api.search_apps("   ").await.is_err());
    }

    #[test]
    fn test_excerpt_is_char_safe() {
        let long = "é".repeat(300);
        assert_eq!(excerpt(&long).chars().count(), ERROR_EXCERPT_LEN);
        assert_eq!(excerpt("short"), "short");
    }
}
