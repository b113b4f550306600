//! Retrieve, patch, save and expand one script.

use std::time::Instant;

use crate::api::AppInfoProvider;
use crate::config::Config;
use crate::dlc;
use crate::download::report::{DownloadReport, Stage};
use crate::error::Result;
use crate::fetch::Fetcher;
use crate::fs::{save_script, script_file_name};
use crate::patch::{comment_directives, inject_key, PatchRules};

/// Run the full pipeline for `id`.
///
/// Only retrieval and saving can fail the call. Key-map, key-injection and
/// expansion problems are recorded as warnings on the report.
pub async fn download_script<P>(
    fetcher: &Fetcher,
    provider: &P,
    config: &Config,
    id: &str,
) -> Result<DownloadReport>
where
    P: AppInfoProvider + ?Sized,
{
    let started = Instant::now();
    let rules = PatchRules::from(&config.patch);
    let file_name = script_file_name(id, &config.script_extension)?;

    let retrieved = fetcher.fetch_script(id).await?;
    let commented = comment_directives(&retrieved.data, &rules);

    let mut report = DownloadReport {
        id: id.to_string(),
        origin: retrieved.origin,
        path: Default::default(),
        bytes: 0,
        commented: commented.changes,
        keyed: 0,
        expansion: None,
        warnings: Vec::new(),
        elapsed: Default::default(),
    };

    let mut data = commented.data;
    if config.options.inject_keys && fetcher.registry().key_maps.is_empty() {
        tracing::debug!("No key map sources configured; skipping key injection");
    } else if config.options.inject_keys {
        match fetcher.fetch_keymap().await {
            Ok(keys) => match inject_key(id, &data, &keys.value, &rules) {
                Ok(patched) => {
                    report.keyed = patched.changes;
                    data = patched.data;
                }
                Err(e) => report.warn(Stage::KeyInjection, e),
            },
            Err(e) => report.warn(Stage::KeyMap, e),
        }
    }

    report.path = save_script(&config.download_directory(), &file_name, &data)?;
    report.bytes = data.len();

    if config.options.expand_dlc {
        match dlc::expand(provider, id, &report.path, &rules.register_call).await {
            Ok(outcome) => report.expansion = Some(outcome),
            Err(e) => report.warn(Stage::Expansion, e),
        }
    }

    report.elapsed = started.elapsed();
    Ok(report)
}
