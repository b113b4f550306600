//! Script retrieval module.
//!
//! This module provides:
//! - Direct fetching from ordered primary mirrors
//! - Archive fallback with size probing, adaptive timeouts and an idle watchdog
//! - Archive validation and member extraction
//! - Key-map fetching

pub mod archive;
pub mod direct;
pub mod extract;
pub mod keymap;
pub mod timeouts;
pub mod watchdog;

use std::time::Duration;

use reqwest::{Client, StatusCode};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::sources::SourceRegistry;

pub use archive::ArchiveHit;
pub use extract::{extract_member, validate_magic, ARCHIVE_MAGIC};
pub use keymap::KeyMap;
pub use timeouts::{ArchivePolicy, ArchiveTimeouts};

/// Retrieval settings derived once from the configuration.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub direct_timeout: Duration,
    pub key_map_timeout: Duration,
    pub probe_timeout: Duration,
    pub archive: ArchivePolicy,
    /// Script file extension (without dot).
    pub script_extension: String,
    pub show_progress: bool,
}

impl FetchSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            direct_timeout: config.direct_timeout(),
            key_map_timeout: config.key_map_timeout(),
            probe_timeout: config.probe_timeout(),
            archive: ArchivePolicy::from_config(&config.archive),
            script_extension: config.script_extension.clone(),
            show_progress: config.options.show_progress,
        }
    }

    /// Script file name for an identifier.
    pub fn script_name(&self, id: &str) -> String {
        format!("{}.{}", id, self.script_extension)
    }
}

/// Where a retrieved payload came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadOrigin {
    /// A primary mirror (1-based ordinal).
    Mirror { ordinal: usize, url: String },
    /// The archive fallback.
    Archive { url: String, attempts: u32 },
}

/// A fully read script payload.
#[derive(Debug)]
pub struct Retrieved {
    pub data: Vec<u8>,
    pub origin: PayloadOrigin,
}

/// Build the shared HTTP client.
pub fn build_client(user_agent: &str) -> Result<Client> {
    Client::builder()
        .user_agent(user_agent)
        .build()
        .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))
}

/// Retrieves scripts and key maps from the registered sources.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    registry: SourceRegistry,
    settings: FetchSettings,
}

impl Fetcher {
    pub fn new(client: Client, registry: SourceRegistry, settings: FetchSettings) -> Self {
        Self {
            client,
            registry,
            settings,
        }
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }

    /// Fetch the script for `id`: primary mirrors first, then the archive.
    pub async fn fetch_script(&self, id: &str) -> Result<Retrieved> {
        let direct_error = match self.fetch_direct(id).await {
            Ok(hit) => {
                return Ok(Retrieved {
                    data: hit.value,
                    origin: PayloadOrigin::Mirror {
                        ordinal: hit.ordinal,
                        url: hit.url,
                    },
                })
            }
            Err(e) => e,
        };

        if self.registry.archive.is_none() {
            return Err(direct_error);
        }

        tracing::warn!("{}", direct_error);
        let hit = self.fetch_archive(id).await?;

        Ok(Retrieved {
            data: hit.data,
            origin: PayloadOrigin::Archive {
                url: hit.url,
                attempts: hit.attempts,
            },
        })
    }

    /// GET a URL and read the whole body within `timeout`.
    ///
    /// Any transport error, non-200 status or body-read error is reported as
    /// `SourceUnavailable`.
    pub(crate) async fn get_body(&self, url: &str, timeout: Duration) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| Error::unavailable(url, e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(Error::unavailable(url, format!("HTTP {}", status)));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::unavailable(url, format!("Read failed: {}", e)))?;

        Ok(body.to_vec())
    }
}


#[cfg(test)]
mod tests {
    use super::testing::fetcher;
    use super::*;
    use crate::test_support::{zip_archive, Reply, TestServer};

    #[tokio::test]
    async fn test_falls_back_to_archive_when_mirrors_fail() {
        let archive = zip_archive(&[("scripts/440.lua", "addappid(440)\n")]);
        let server = TestServer::start(move |req| match req.path.as_str() {
            "/archive/440.zip" => Reply::Body(archive.clone()),
            _ => Reply::Status(404),
        })
        .await;

        let fetcher = fetcher(
            vec![
                server.url("/a/{id}/{id}.lua"),
                server.url("/b/{id}/{id}.lua"),
            ],
            Some(server.url("/archive/{id}.zip")),
            Vec::new(),
        );

        let retrieved = fetcher.fetch_script("440").await.unwrap();
        assert_eq!(retrieved.data, b"addappid(440)\n");
        assert!(matches!(
            retrieved.origin,
            PayloadOrigin::Archive { attempts: 1, .. }
        ));
        assert_eq!(server.hits("GET", "/a/440/440.lua"), 1);
        assert_eq!(server.hits("GET", "/b/440/440.lua"), 1);
    }

    #[tokio::test]
    async fn test_without_archive_reports_direct_failure() {
        let server = TestServer::start(|_| Reply::Status(500)).await;
        let fetcher = fetcher(vec![server.url("/{id}.lua")], None, Vec::new());

        let err = fetcher.fetch_script("440").await.unwrap_err();
        assert!(matches!(err, Error::AllSourcesFailed { attempts: 1, .. }));
    }
}
