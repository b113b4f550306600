//! Error types for the unlock-fetcher application.

use std::time::Duration;

use thiserror::Error;

/// Main error type for the application.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration value for '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    #[error("Missing required configuration: {0}")]
    MissingConfig(String),

    // Source errors
    #[error("Source unavailable ({source_url}): {reason}")]
    SourceUnavailable { source_url: String, reason: String },

    #[error("All {attempts} {label} source(s) failed; last error: {last_error}")]
    AllSourcesFailed {
        label: String,
        attempts: usize,
        last_error: String,
    },

    #[error("Invalid content: {0}")]
    ContentInvalid(String),

    #[error("Stream stalled after {attempts} attempt(s) (idle timeout {idle_timeout:?})")]
    StreamStalled {
        attempts: u32,
        idle_timeout: Duration,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    // Metadata / search API errors
    #[error("API error: {0}")]
    Api(String),

    // Interactive input errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // File system errors
    #[error("Invalid filename (path traversal attempt): {0}")]
    InvalidFilename(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // HTTP errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    // URL parsing errors
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ContentInvalid(format!("Unreadable archive: {}", err))
    }
}

impl Error {
    /// Build a `SourceUnavailable` error for a single source.
    pub fn unavailable(source_url: &str, reason: impl std::fmt::Display) -> Self {
        Error::SourceUnavailable {
            source_url: source_url.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Process exit codes.
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const CONFIG_ERROR: i32 = 3;
    pub const DOWNLOAD_ERROR: i32 = 4;
    pub const UNEXPECTED_ERROR: i32 = 5;
    pub const SOME_TARGETS_FAILED: i32 = 6;
}
