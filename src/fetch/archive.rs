//! Archive fallback: probe, stream under an idle watchdog, validate, extract.

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::CONTENT_LENGTH;
use reqwest::StatusCode;
use thiserror::Error;

use crate::error::{Error, Result};
use crate::fetch::extract::{extract_member, validate_magic};
use crate::fetch::timeouts::ArchiveTimeouts;
use crate::fetch::watchdog::{ProgressClock, Watchdog};
use crate::fetch::Fetcher;
use crate::output::{create_download_bar, create_spinner};

/// Upper bound on the buffer reserved up front from an advertised length.
const MAX_PREALLOC: u64 = 64 * 1024 * 1024;

/// Member bytes extracted from the archive source.
#[derive(Debug)]
pub struct ArchiveHit {
    pub url: String,
    /// Streaming attempts used, including the successful one.
    pub attempts: u32,
    /// Archive size reported by the probe, if any.
    pub probed_size: Option<u64>,
    pub data: Vec<u8>,
}

/// Why a single streaming attempt ended without an archive.
#[derive(Debug, Error)]
enum AttemptError {
    /// The request could not be made; retrying will not help.
    #[error("{0}")]
    Fatal(Error),
    #[error("transfer stalled for {0:?}")]
    Stalled(Duration),
    #[error("read failed: {0}")]
    Read(String),
    #[error("empty response body")]
    Empty,
}

impl Fetcher {
    /// Download the archive for `id` and extract `<id>.<ext>` from it.
    ///
    /// Only stream failures (idle cancellation, read errors, empty bodies)
    /// consume the attempt budget. Request failures, wrong content and a
    /// missing member end the call immediately.
    pub async fn fetch_archive(&self, id: &str) -> Result<ArchiveHit> {
        let url = self
            .registry()
            .archive_url(id)
            .ok_or_else(|| Error::MissingConfig("sources.archive".to_string()))?;
        let member = self.settings().script_name(id);
        let policy = &self.settings().archive;

        tracing::info!("Trying archive source: {}", url);

        let probed_size = self.probe_size(&url).await;
        let timeouts = policy.derive(probed_size);
        tracing::debug!(
            "Archive size {:?}: response timeout {:?}, idle timeout {:?}",
            probed_size,
            timeouts.response,
            timeouts.idle
        );

        let max_attempts = policy.max_attempts.max(1);
        let mut attempt = 0;
        let archive = loop {
            attempt += 1;
            if attempt > 1 {
                tracing::info!("Retrying archive source ({}/{})", attempt, max_attempts);
            }

            match self.stream_archive(&url, probed_size, &timeouts).await {
                Ok(buf) => break buf,
                Err(AttemptError::Fatal(e)) => return Err(e),
                Err(failure) => {
                    tracing::warn!(
                        "Archive attempt {}/{} failed: {}",
                        attempt,
                        max_attempts,
                        failure
                    );
                    if attempt >= max_attempts {
                        return Err(match failure {
                            AttemptError::Read(reason) => Error::unavailable(&url, reason),
                            _ => Error::StreamStalled {
                                attempts: attempt,
                                idle_timeout: timeouts.idle,
                            },
                        });
                    }
                }
            }
        };

        validate_magic(&archive)?;
        let data = extract_member(&archive, &member)?;
        tracing::info!(
            "Extracted {} from archive source ({} bytes)",
            member,
            data.len()
        );

        Ok(ArchiveHit {
            url,
            attempts: attempt,
            probed_size,
            data,
        })
    }

    /// HEAD the archive and read its Content-Length. Failures only cost the
    /// size hint.
    async fn probe_size(&self, url: &str) -> Option<u64> {
        let response = match self
            .client
            .head(url)
            .timeout(self.settings().probe_timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!("Archive probe failed: {}", e);
                return None;
            }
        };

        if response.status() != StatusCode::OK {
            tracing::debug!("Archive probe returned HTTP {}", response.status());
            return None;
        }

        response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<u64>().ok())
            .filter(|&len| len > 0)
    }

    /// One GET of the archive, buffered in memory.
    async fn stream_archive(
        &self,
        url: &str,
        probed_size: Option<u64>,
        timeouts: &ArchiveTimeouts,
    ) -> std::result::Result<Vec<u8>, AttemptError> {
        let response = match tokio::time::timeout(timeouts.response, self.client.get(url).send())
            .await
        {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => return Err(AttemptError::Fatal(Error::unavailable(url, e))),
            Err(_) => {
                return Err(AttemptError::Fatal(Error::unavailable(
                    url,
                    format!("no response within {:?}", timeouts.response),
                )))
            }
        };

        if response.status() != StatusCode::OK {
            return Err(AttemptError::Fatal(Error::unavailable(
                url,
                format!("HTTP {}", response.status()),
            )));
        }

        let expected = probed_size.or_else(|| response.content_length());
        let progress = self.settings().show_progress.then(|| match expected {
            Some(len) => create_download_bar(len),
            None => create_spinner("Downloading archive"),
        });

        let started = Instant::now();
        let clock = Arc::new(ProgressClock::new());
        let mut watchdog = Watchdog::spawn(
            Arc::clone(&clock),
            timeouts.idle,
            self.settings().archive.watchdog_tick,
        );

        let capacity = expected.unwrap_or(0).min(MAX_PREALLOC);
        let mut buf = Vec::with_capacity(usize::try_from(capacity).unwrap_or(0));
        let mut response = response;

        let outcome = loop {
            tokio::select! {
                idle = watchdog.stalled() => break Err(AttemptError::Stalled(idle)),
                chunk = response.chunk() => match chunk {
                    Ok(Some(bytes)) => {
                        clock.touch();
                        buf.extend_from_slice(&bytes);
                        if let Some(pb) = &progress {
                            pb.set_position(buf.len() as u64);
                        }
                    }
                    Ok(None) => break Ok(()),
                    Err(e) => break Err(AttemptError::Read(e.to_string())),
                },
            }
        };

        // Release the connection before any retry.
        drop(watchdog);
        drop(response);
        if let Some(pb) = progress {
            pb.finish_and_clear();
        }

        outcome?;

        if buf.is_empty() {
            return Err(AttemptError::Empty);
        }

        let elapsed = started.elapsed().as_secs_f64().max(0.001);
        tracing::debug!(
            "Archive transfer: {} bytes in {:.2}s ({:.2} KB/s)",
            buf.len(),
            elapsed,
            buf.len() as f64 / 1024.0 / elapsed
        );

        Ok(buf)
    }
}
