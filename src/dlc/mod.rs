//! Supplementary content expansion.
//!
//! After a script is saved, the metadata API is asked which supplementary
//! identifiers belong to the target. Those without packages of their own get
//! a bare registration line appended to the script, unless the script already
//! registers them.

pub mod discover;
pub mod script;

use std::fmt;
use std::path::Path;

use crate::api::AppInfoProvider;
use crate::error::Result;

pub use discover::discover_dlc;
pub use script::{append_registrations, read_script, registered_ids};

/// Why expansion wrote nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The metadata lists no supplementary identifiers.
    NoneListed,
    /// Every listed identifier ships its own packages.
    AllHavePackages,
    /// No supplementary identifier could be looked up.
    LookupsFailed,
    /// Every qualifying identifier is already registered.
    AllPresent,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SkipReason::NoneListed => "no supplementary content listed",
            SkipReason::AllHavePackages => "all supplementary content has its own packages",
            SkipReason::LookupsFailed => "no supplementary content could be looked up",
            SkipReason::AllPresent => "all qualifying entries are already registered",
        };
        f.write_str(text)
    }
}

/// Result of an expansion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpansionOutcome {
    /// Identifiers appended, in the order written.
    Appended(Vec<String>),
    NothingToAdd(SkipReason),
}

impl ExpansionOutcome {
    pub fn appended(&self) -> usize {
        match self {
            ExpansionOutcome::Appended(ids) => ids.len(),
            ExpansionOutcome::NothingToAdd(_) => 0,
        }
    }
}

/// Append registrations for the package-less supplementary content of `id`.
///
/// Only the primary metadata query is fatal. A failed lookup for a single
/// supplementary identifier is logged and that identifier skipped.
pub async fn expand<P>(
    provider: &P,
    id: &str,
    script_path: &Path,
    register_call: &str,
) -> Result<ExpansionOutcome>
where
    P: AppInfoProvider + ?Sized,
{
    let entry = provider.app_info(id).await?;
    let discovered = discover_dlc(&entry);
    tracing::info!("Found {} supplementary entries for {}", discovered.len(), id);
    if discovered.is_empty() {
        return Ok(ExpansionOutcome::NothingToAdd(SkipReason::NoneListed));
    }

    let mut package_less = Vec::new();
    let mut resolved = 0usize;
    for dlc_id in discovered {
        match provider.app_info(&dlc_id).await {
            Ok(dlc) if dlc.depots.has_packages() => {
                resolved += 1;
                tracing::debug!("{} has its own packages", dlc_id);
            }
            Ok(_) => {
                resolved += 1;
                package_less.push(dlc_id);
            }
            Err(e) => tracing::warn!("Skipping {}: {}", dlc_id, e),
        }
    }

    if resolved == 0 {
        return Ok(ExpansionOutcome::NothingToAdd(SkipReason::LookupsFailed));
    }
    if package_less.is_empty() {
        return Ok(ExpansionOutcome::NothingToAdd(SkipReason::AllHavePackages));
    }

    let existing = read_script(script_path)?;
    let present = registered_ids(&existing, register_call)?;
    let missing: Vec<String> = package_less
        .into_iter()
        .filter(|dlc_id| {
            dlc_id
                .parse::<u64>()
                .map(|n| !present.contains(&n))
                .unwrap_or(true)
        })
        .collect();

    if missing.is_empty() {
        return Ok(ExpansionOutcome::NothingToAdd(SkipReason::AllPresent));
    }

    let written = append_registrations(script_path, &existing, &missing, register_call)?;
    Ok(ExpansionOutcome::Appended(written))
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::api::{AppEntry, AppInfoProvider, AppSummary};
    use crate::error::{Error, Result};

    /// Canned metadata keyed by identifier, recording every lookup.
    #[derive(Default)]
    pub struct StubProvider {
        pub entries: HashMap<String, String>,
        pub games: Vec<AppSummary>,
        pub lookups: Mutex<Vec<String>>,
    }

    impl StubProvider {
        pub fn with(entries: &[(&str, &str)]) -> Self {
            Self {
                entries: entries
                    .iter()
                    .map(|(id, json)| (id.to_string(), json.to_string()))
                    .collect(),
                ..Default::default()
            }
        }

        pub fn lookups(&self) -> Vec<String> {
            self.lookups.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AppInfoProvider for StubProvider {
        async fn app_info(&self, id: &str) -> Result<AppEntry> {
            self.lookups.lock().unwrap().push(id.to_string());
            match self.entries.get(id) {
                Some(json) => Ok(serde_json::from_str(json)?),
                None => Err(Error::NotFound(format!("No metadata for {}", id))),
            }
        }

        async fn search(&self, _text: &str) -> Result<Vec<AppSummary>> {
            Ok(self.games.clone())
        }
    }
}
