//! Configuration validation logic.

use regex::Regex;

use crate::config::loader::Config;
use crate::error::{Error, Result};
use crate::sources::{SourceTemplate, ID_PLACEHOLDER};

/// Identifier used to check that templates render into valid URLs.
const PROBE_ID: &str = "0";

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_sources(config)?;
    validate_extension(&config.script_extension)?;
    validate_timeouts(config)?;
    validate_patch_rules(config)?;

    if config.archive.max_attempts == 0 {
        return Err(Error::ConfigValidation {
            field: "archive.max_attempts".to_string(),
            message: "At least one attempt is required".to_string(),
        });
    }

    Ok(())
}

/// Validate every configured endpoint.
fn validate_sources(config: &Config) -> Result<()> {
    let sources = &config.sources;

    if sources.primary.is_empty() && sources.archive.is_none() {
        return Err(Error::MissingConfig(
            "sources.primary or sources.archive (at least one script source required)"
                .to_string(),
        ));
    }

    for template in &sources.primary {
        validate_template("sources.primary", template)?;
    }

    if let Some(archive) = &sources.archive {
        validate_template("sources.archive", archive)?;
    }

    validate_template("sources.metadata", &sources.metadata)?;

    for endpoint in &sources.key_maps {
        validate_url("sources.key_maps", endpoint)?;
    }

    validate_url("sources.search", &sources.search)?;

    Ok(())
}

/// Validate a template that must carry the identifier.
pub fn validate_template(field: &str, template: &str) -> Result<()> {
    let template = SourceTemplate::new(template);
    if template.slots() == 0 {
        return Err(Error::ConfigValidation {
            field: field.to_string(),
            message: format!(
                "Template '{}' has no {} placeholder",
                template, ID_PLACEHOLDER
            ),
        });
    }

    validate_url(field, &template.render(PROBE_ID))
}

/// Validate a plain http(s) URL.
pub fn validate_url(field: &str, value: &str) -> Result<()> {
    let parsed = url::Url::parse(value).map_err(|e| Error::ConfigValidation {
        field: field.to_string(),
        message: format!("'{}' is not a valid URL: {}", value, e),
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(Error::ConfigValidation {
            field: field.to_string(),
            message: format!("'{}' must use http or https", value),
        });
    }

    Ok(())
}

/// Validate the script file extension.
pub fn validate_extension(extension: &str) -> Result<()> {
    if extension.is_empty() || !extension.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(Error::ConfigValidation {
            field: "script_extension".to_string(),
            message: format!(
                "Extension '{}' must be non-empty and alphanumeric",
                extension
            ),
        });
    }
    Ok(())
}

fn validate_timeouts(config: &Config) -> Result<()> {
    let network = &config.network;
    let timeouts = [
        ("network.direct_timeout_secs", network.direct_timeout_secs),
        ("network.key_map_timeout_secs", network.key_map_timeout_secs),
        ("network.probe_timeout_secs", network.probe_timeout_secs),
        ("network.metadata_timeout_secs", network.metadata_timeout_secs),
        (
            "archive.unknown_size_timeout_secs",
            config.archive.unknown_size_timeout_secs,
        ),
        (
            "archive.unknown_size_idle_secs",
            config.archive.unknown_size_idle_secs,
        ),
    ];

    for (field, value) in timeouts {
        if value == 0 {
            return Err(Error::ConfigValidation {
                field: field.to_string(),
                message: "Timeout must be greater than zero".to_string(),
            });
        }
    }

    Ok(())
}

fn validate_patch_rules(config: &Config) -> Result<()> {
    let patch = &config.patch;
    let rules = [
        ("patch.directive_marker", &patch.directive_marker),
        ("patch.comment_token", &patch.comment_token),
        ("patch.register_call", &patch.register_call),
        ("patch.key_flag", &patch.key_flag),
    ];

    for (field, value) in rules {
        if value.trim().is_empty() {
            return Err(Error::MissingConfig(field.to_string()));
        }
    }

    Ok(())
}

/// Extract an application identifier from a store URL or a bare number.
///
/// Returns `Ok(None)` when the input is neither, so the caller can fall back
/// to a name search.
pub fn parse_app_id(input: &str) -> Result<Option<String>> {
    let input = input.trim();

    if input.is_empty() {
        return Err(Error::ConfigValidation {
            field: "target".to_string(),
            message: "Input cannot be empty".to_string(),
        });
    }

    // Pattern: https://store.example.com/app/440/ or https://db.example.info/app/440
    let url_pattern = Regex::new(r"/app/(\d+)").unwrap();
    if let Some(captures) = url_pattern.captures(input) {
        if let Some(id) = captures.get(1) {
            return Ok(Some(normalize_id(id.as_str())));
        }
    }

    if input.chars().all(|c| c.is_ascii_digit()) {
        return Ok(Some(normalize_id(input)));
    }

    Ok(None)
}

/// Strip leading zeros the way a numeric parse would, keeping "0".
fn normalize_id(digits: &str) -> String {
    let trimmed = digits.trim_start_matches('0');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}
