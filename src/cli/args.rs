//! Command-line argument definitions using clap.

use clap::Parser;
use std::path::PathBuf;

use crate::config::Config;

/// Unlock script fetcher CLI.
#[derive(Parser, Debug)]
#[command(
    name = "unlock-fetcher",
    version,
    about = "Fetch per-application unlock scripts from mirror sources",
    long_about = "Fetches the unlock script for an application from ordered mirrors, falling back to \
                  an archive source.\n\n\
                  Targets may be numeric identifiers, store or database URLs, or names to search \
                  for. Without targets, an interactive prompt is started."
)]
pub struct Args {
    /// Identifiers, URLs or names to fetch.
    pub targets: Vec<String>,

    /// Path to configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Directory scripts are saved into.
    #[arg(short = 'd', long = "directory", env = "UNLOCK_FETCHER_DIR")]
    pub download_directory: Option<PathBuf>,

    /// Pick the N-th search result instead of prompting.
    #[arg(long, value_name = "N")]
    pub pick: Option<usize>,

    /// Don't append registrations for supplementary content.
    #[arg(long)]
    pub no_dlc: bool,

    /// Don't fetch key maps or inject keys.
    #[arg(long)]
    pub no_keys: bool,

    /// Hide transfer progress.
    #[arg(long, short)]
    pub quiet: bool,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}

impl Args {
    /// Merge CLI arguments into an existing config, overriding where specified.
    pub fn merge_into_config(&self, config: &mut Config) {
        if let Some(dir) = &self.download_directory {
            config.download_path = dir.clone();
        }

        if let Some(pick) = self.pick {
            config.options.pick = Some(pick);
        }

        // Boolean flags (only override if set to non-default)
        if self.no_dlc {
            config.options.expand_dlc = false;
        }

        if self.no_keys {
            config.options.inject_keys = false;
        }

        if self.quiet {
            config.options.show_progress = false;
        }
    }
}
