//! Turning user input into a target identifier.

use crate::api::{AppInfoProvider, AppSummary};
use crate::config::parse_app_id;
use crate::error::{Error, Result};

/// What a piece of user input refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The input named an identifier directly.
    Id(String),
    /// Search results for the input, possibly empty.
    Candidates(Vec<AppSummary>),
}

/// Resolve `input` as an identifier, or search for it by name.
pub async fn resolve_target<P>(provider: &P, input: &str) -> Result<Resolution>
where
    P: AppInfoProvider + ?Sized,
{
    if let Some(id) = parse_app_id(input)? {
        tracing::debug!("'{}' resolved to {}", input.trim(), id);
        return Ok(Resolution::Id(id));
    }

    tracing::info!("'{}' is not an identifier, searching by name", input.trim());
    Ok(Resolution::Candidates(provider.search(input).await?))
}

/// Identifier of the candidate at a 1-based `selection`.
pub fn pick_candidate(candidates: &[AppSummary], selection: usize) -> Result<String> {
    selection
        .checked_sub(1)
        .and_then(|index| candidates.get(index))
        .map(|app| {
            tracing::info!("Selected {} ({})", app.name, app.appid);
            app.appid.to_string()
        })
        .ok_or_else(|| {
            Error::InvalidInput(format!(
                "Selection {} is out of range, choose 1 to {}",
                selection,
                candidates.len()
            ))
        })
}
