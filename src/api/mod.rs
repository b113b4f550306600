//! Metadata API module.
//!
//! This module provides:
//! - HTTP client for the application metadata and search endpoints
//! - API response types
//! - The `AppInfoProvider` seam used by DLC expansion and target resolution

pub mod client;
pub mod types;

use async_trait::async_trait;

use crate::error::Result;

pub use client::MetadataApi;
pub use types::*;

/// Source of application metadata.
#[async_trait]
pub trait AppInfoProvider: Send + Sync {
    /// Metadata entry for one identifier.
    async fn app_info(&self, id: &str) -> Result<AppEntry>;

    /// Applications whose name matches `text`.
    async fn search(&self, text: &str) -> Result<Vec<AppSummary>>;
}
