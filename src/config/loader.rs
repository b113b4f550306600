//! Configuration structures and loading logic.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory the unlock scripts are written into.
    #[serde(default = "default_download_path")]
    pub download_path: PathBuf,

    /// Script file extension (without dot).
    #[serde(default = "default_script_extension")]
    pub script_extension: String,

    #[serde(default)]
    pub sources: SourcesConfig,

    #[serde(default)]
    pub network: NetworkConfig,

    #[serde(default)]
    pub archive: ArchiveConfig,

    #[serde(default)]
    pub patch: PatchConfig,

    #[serde(default)]
    pub options: OptionsConfig,
}

/// Endpoint configuration.
///
/// Templates use `{id}` wherever the target identifier goes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// Primary mirror templates, tried in order.
    #[serde(default = "default_primary_sources")]
    pub primary: Vec<String>,

    /// Archive-hosted fallback template.
    #[serde(default = "default_archive_source")]
    pub archive: Option<String>,

    /// Key-map document URLs, tried in order. Empty disables key injection.
    #[serde(default = "default_key_map_sources")]
    pub key_maps: Vec<String>,

    /// Metadata API template.
    #[serde(default = "default_metadata_endpoint")]
    pub metadata: String,

    /// Search API endpoint.
    #[serde(default = "default_search_endpoint")]
    pub search: String,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            primary: default_primary_sources(),
            archive: default_archive_source(),
            key_maps: default_key_map_sources(),
            metadata: default_metadata_endpoint(),
            search: default_search_endpoint(),
        }
    }
}

/// Network timeouts and client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-mirror timeout for direct fetches.
    #[serde(default = "default_direct_timeout")]
    pub direct_timeout_secs: u64,

    /// Per-source timeout for key-map fetches.
    #[serde(default = "default_key_map_timeout")]
    pub key_map_timeout_secs: u64,

    /// Timeout for the archive size probe.
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_secs: u64,

    /// Timeout for metadata and search API requests.
    #[serde(default = "default_metadata_timeout")]
    pub metadata_timeout_secs: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            direct_timeout_secs: default_direct_timeout(),
            key_map_timeout_secs: default_key_map_timeout(),
            probe_timeout_secs: default_probe_timeout(),
            metadata_timeout_secs: default_metadata_timeout(),
        }
    }
}

/// Archive fallback settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// Total streaming attempts, including the first.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Response timeout used when the archive size is unknown.
    #[serde(default = "default_unknown_size_timeout")]
    pub unknown_size_timeout_secs: u64,

    /// Idle timeout used when the archive size is unknown.
    #[serde(default = "default_unknown_size_idle")]
    pub unknown_size_idle_secs: u64,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            unknown_size_timeout_secs: default_unknown_size_timeout(),
            unknown_size_idle_secs: default_unknown_size_idle(),
        }
    }
}

/// Script rewriting rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatchConfig {
    #[serde(default = "default_directive_marker")]
    pub directive_marker: String,

    #[serde(default = "default_comment_token")]
    pub comment_token: String,

    #[serde(default = "default_register_call")]
    pub register_call: String,

    #[serde(default = "default_key_flag")]
    pub key_flag: String,
}

impl Default for PatchConfig {
    fn default() -> Self {
        Self {
            directive_marker: default_directive_marker(),
            comment_token: default_comment_token(),
            register_call: default_register_call(),
            key_flag: default_key_flag(),
        }
    }
}

/// Pipeline switches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsConfig {
    /// Append registrations for supplementary content after saving.
    #[serde(default = "default_true")]
    pub expand_dlc: bool,

    /// Fetch key maps and inject the key into the registration call.
    #[serde(default = "default_true")]
    pub inject_keys: bool,

    /// Show a progress bar while streaming the archive.
    #[serde(default = "default_true")]
    pub show_progress: bool,

    /// Preselected 1-based search result, skipping the prompt.
    #[serde(default)]
    pub pick: Option<usize>,
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            expand_dlc: true,
            inject_keys: true,
            show_progress: true,
            pick: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            download_path: default_download_path(),
            script_extension: default_script_extension(),
            sources: SourcesConfig::default(),
            network: NetworkConfig::default(),
            archive: ArchiveConfig::default(),
            patch: PatchConfig::default(),
            options: OptionsConfig::default(),
        }
    }
}

fn default_download_path() -> PathBuf {
    PathBuf::from(".")
}

fn default_script_extension() -> String {
    "lua".to_string()
}

fn default_primary_sources() -> Vec<String> {
    [
        "https://raw.githubusercontent.com/SteamAutoCracks/ManifestHub/{id}/{id}.lua",
        "https://cdn.jsdelivr.net/gh/SteamAutoCracks/ManifestHub@{id}/{id}.lua",
        "https://gcore.jsdelivr.net/gh/SteamAutoCracks/ManifestHub@{id}/{id}.lua",
        "https://fastly.jsdelivr.net/gh/SteamAutoCracks/ManifestHub@{id}/{id}.lua",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_archive_source() -> Option<String> {
    Some(
        "https://walftech.com/proxy.php?url=https://steamgames554.s3.us-east-1.amazonaws.com/{id}.zip"
            .to_string(),
    )
}

fn default_key_map_sources() -> Vec<String> {
    [
        "https://raw.githubusercontent.com/SteamAutoCracks/ManifestHub/main/depotkeys.json",
        "https://cdn.jsdmirror.com/gh/SteamAutoCracks/ManifestHub@main/depotkeys.json",
        "https://raw.gitmirror.com/SteamAutoCracks/ManifestHub/main/depotkeys.json",
        "https://raw.dgithub.xyz/SteamAutoCracks/ManifestHub/main/depotkeys.json",
        "https://gh.akass.cn/SteamAutoCracks/ManifestHub/main/depotkeys.json",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_metadata_endpoint() -> String {
    "https://api.steamcmd.net/v1/info/{id}".to_string()
}

fn default_search_endpoint() -> String {
    "https://steamui.com/api/loadGames.php".to_string()
}

fn default_user_agent() -> String {
    concat!("unlock-fetcher/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_direct_timeout() -> u64 {
    3
}

fn default_key_map_timeout() -> u64 {
    5
}

fn default_probe_timeout() -> u64 {
    5
}

fn default_metadata_timeout() -> u64 {
    10
}

fn default_max_attempts() -> u32 {
    3
}

fn default_unknown_size_timeout() -> u64 {
    90
}

fn default_unknown_size_idle() -> u64 {
    120
}

fn default_directive_marker() -> String {
    "setManifest".to_string()
}

fn default_comment_token() -> String {
    "--".to_string()
}

fn default_register_call() -> String {
    "addappid".to_string()
}

fn default_key_flag() -> String {
    "1".to_string()
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!(
                    "Configuration file not found: {}. Create one from config.example.toml",
                    path.display()
                ))
            } else {
                Error::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the configuration, writing the defaults first if the file is missing.
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Config::default();
            config.save(path)?;
            tracing::info!("Created default configuration: {}", path.display());
            return Ok(config);
        }
        Config::load(path)
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Get the effective download directory, made absolute when possible.
    pub fn download_directory(&self) -> PathBuf {
        std::path::absolute(&self.download_path).unwrap_or_else(|_| self.download_path.clone())
    }

    pub fn direct_timeout(&self) -> Duration {
        Duration::from_secs(self.network.direct_timeout_secs)
    }

    pub fn key_map_timeout(&self) -> Duration {
        Duration::from_secs(self.network.key_map_timeout_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.network.probe_timeout_secs)
    }

    pub fn metadata_timeout(&self) -> Duration {
        Duration::from_secs(self.network.metadata_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.script_extension, "lua");
        assert_eq!(config.network.direct_timeout_secs, 3);
        assert_eq!(config.archive.max_attempts, 3);
        assert_eq!(config.patch.directive_marker, "setManifest");
        assert_eq!(config.sources.primary.len(), 4);
        assert!(config.sources.archive.is_some());
        assert_eq!(config.sources.key_maps.len(), 5);
        assert!(config.options.expand_dlc);
    }

    #[test]
    fn test_partial_sections_merge_with_defaults() {
        let config: Config = toml::from_str(
            r#"
            download_path = "scripts"

            [sources]
            primary = ["https://a.test/{id}/{id}.lua", "https://b.test/{id}.lua"]
            archive = "https://c.test/{id}.zip"

            [archive]
            max_attempts = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.download_path, PathBuf::from("scripts"));
        assert_eq!(config.sources.primary.len(), 2);
        assert_eq!(config.archive.max_attempts, 5);
        assert_eq!(config.archive.unknown_size_idle_secs, 120);
        assert_eq!(config.sources.metadata, default_metadata_endpoint());
        assert_eq!(config.sources.key_maps, default_key_map_sources());
    }

    #[test]
    fn test_explicit_empty_key_maps_are_kept() {
        let config: Config = toml::from_str("[sources]\nkey_maps = []\n").unwrap();
        assert!(config.sources.key_maps.is_empty());
        assert_eq!(config.sources.primary, default_primary_sources());
    }

    #[test]
    fn test_load_or_create_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let created = Config::load_or_create(&path).unwrap();
        assert!(path.exists());

        let reloaded = Config::load(&path).unwrap();
        assert_eq!(reloaded.script_extension, created.script_extension);
        assert_eq!(reloaded.sources.search, created.sources.search);
    }
}
