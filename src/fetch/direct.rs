//! Direct fetching from the primary mirrors.

use crate::error::Result;
use crate::fetch::Fetcher;
use crate::sources::{try_in_order, Hit};

impl Fetcher {
    /// Try every primary mirror in order and return the first full 200 body.
    pub async fn fetch_direct(&self, id: &str) -> Result<Hit<Vec<u8>>> {
        let urls = self.registry().primary_urls(id);
        let timeout = self.settings().direct_timeout;

        let hit = try_in_order("script", &urls, |url| self.get_body(url, timeout)).await?;
        tracing::info!(
            "Downloaded {} bytes from source #{}",
            hit.value.len(),
            hit.ordinal
        );
        Ok(hit)
    }
}
