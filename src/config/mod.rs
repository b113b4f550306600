//! Configuration module for the unlock-fetcher.
//!
//! This module handles:
//! - Loading configuration from TOML files
//! - Identifier parsing
//! - Configuration validation

pub mod loader;
pub mod validation;

pub use loader::{
    ArchiveConfig, Config, NetworkConfig, OptionsConfig, PatchConfig, SourcesConfig,
};
pub use validation::{parse_app_id, validate_config};
