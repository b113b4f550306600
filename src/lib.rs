//! unlock-fetcher - multi-source unlock script retrieval
//!
//! This library fetches per-application unlock scripts from unreliable mirror
//! sources and prepares them for use.
//!
//! # Features
//!
//! - Ordered fallback across primary mirrors
//! - Archive fallback with size-adaptive timeouts and an idle watchdog
//! - ZIP validation and member extraction
//! - Directive suppression and key injection
//! - Supplementary content registration from the metadata API
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use unlock_fetcher::{
//!     api::MetadataApi,
//!     download::download_script,
//!     fetch::{build_client, FetchSettings, Fetcher},
//!     sources::SourceRegistry,
//!     Config,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load(Path::new("config.toml"))?;
//!     let client = build_client(&config.network.user_agent)?;
//!     let registry = SourceRegistry::from(&config.sources);
//!     let api = MetadataApi::new(client.clone(), &registry, config.metadata_timeout());
//!     let fetcher = Fetcher::new(client, registry, FetchSettings::from_config(&config));
//!
//!     let report = download_script(&fetcher, &api, &config, "440").await?;
//!     println!("saved {}", report.path.display());
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod dlc;
pub mod download;
pub mod error;
pub mod fetch;
pub mod fs;
pub mod output;
pub mod patch;
pub mod sources;

#[cfg(test)]
mod test_support;

// Re-exports for convenience
pub use api::{AppInfoProvider, MetadataApi};
pub use config::Config;
pub use download::{download_script, DownloadReport, SessionStats};
pub use error::{Error, Result};
pub use fetch::Fetcher;
pub use patch::PatchRules;
