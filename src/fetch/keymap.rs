//! Key-map retrieval.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::fetch::Fetcher;
use crate::sources::{try_in_order, Hit};

/// Identifier to key, from a single source.
pub type KeyMap = HashMap<String, String>;

impl Fetcher {
    /// Fetch the first key map that parses as a flat string-to-string object.
    pub async fn fetch_keymap(&self) -> Result<Hit<KeyMap>> {
        let urls = &self.registry().key_maps;
        let timeout = self.settings().key_map_timeout;

        let hit = try_in_order("key map", urls, |url| async move {
            let body = self.get_body(url, timeout).await?;
            serde_json::from_slice::<KeyMap>(&body)
                .map_err(|e| Error::unavailable(url, format!("Unparseable key map: {}", e)))
        })
        .await?;

        tracing::info!("Loaded {} keys from key map #{}", hit.value.len(), hit.ordinal);
        Ok(hit)
    }
}
