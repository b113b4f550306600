//! unlock-fetcher - CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use unlock_fetcher::{
    api::MetadataApi,
    cli::{parse_selection, pick_candidate, resolve_target, Args, Prompt, Resolution},
    config::{validate_config, Config},
    download::{download_script, DownloadReport, SessionStats},
    error::{exit_codes, Error, Result},
    fetch::{build_client, FetchSettings, Fetcher},
    output::{
        print_banner, print_candidates, print_config_summary, print_error, print_info,
        print_report, print_session_stats, print_sources, print_success, print_warning,
    },
    sources::SourceRegistry,
};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(stats) if stats.targets_failed > 0 => {
            ExitCode::from(exit_codes::SOME_TARGETS_FAILED as u8)
        }
        Ok(_) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(e) => {
            print_error(&format!("{}", e));
            match e {
                Error::Config(_)
                | Error::ConfigValidation { .. }
                | Error::MissingConfig(_)
                | Error::TomlParse(_) => ExitCode::from(exit_codes::CONFIG_ERROR as u8),
                Error::SourceUnavailable { .. }
                | Error::AllSourcesFailed { .. }
                | Error::ContentInvalid(_)
                | Error::StreamStalled { .. }
                | Error::NotFound(_) => ExitCode::from(exit_codes::DOWNLOAD_ERROR as u8),
                _ => ExitCode::from(exit_codes::UNEXPECTED_ERROR as u8),
            }
        }
    }
}

/// Shared handles for processing targets.
struct Session {
    config: Config,
    fetcher: Fetcher,
    api: MetadataApi,
    prompt: Prompt<tokio::io::BufReader<tokio::io::Stdin>>,
    stats: SessionStats,
}

async fn run() -> Result<SessionStats> {
    // Parse CLI arguments
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_env_filter(filter).with_target(false).init();

    print_banner();

    // Load configuration, writing the defaults on first run
    let mut config = Config::load_or_create(&args.config)?;
    args.merge_into_config(&mut config);
    validate_config(&config)?;

    let source_count =
        config.sources.primary.len() + usize::from(config.sources.archive.is_some());
    print_config_summary(
        &args.targets,
        &config.download_directory().display().to_string(),
        source_count,
    );

    // One HTTP client shared by every component
    let client = build_client(&config.network.user_agent)?;
    let registry = SourceRegistry::from(&config.sources);
    let api = MetadataApi::new(client.clone(), &registry, config.metadata_timeout());
    let fetcher = Fetcher::new(client, registry, FetchSettings::from_config(&config));

    let mut session = Session {
        config,
        fetcher,
        api,
        prompt: Prompt::stdin(),
        stats: SessionStats::default(),
    };

    if args.targets.is_empty() {
        print_info("Enter an identifier, store URL or name (Ctrl-D to quit)");
        loop {
            let Some(input) = session
                .prompt
                .ask("Identifier, URL or name:")
                .await?
            else {
                break;
            };
            if input.is_empty() {
                continue;
            }
            session.handle(&input).await;
        }
    } else {
        for target in &args.targets {
            session.handle(target).await;
        }
    }

    print_session_stats(&session.stats);
    Ok(session.stats)
}

impl Session {
    /// Process one target, reporting failures instead of propagating them.
    async fn handle(&mut self, input: &str) {
        match self.process(input).await {
            Ok(report) => {
                print_report(&report);
                if report.warnings.is_empty() {
                    print_success(&format!("{} saved to {}", report.id, report.path.display()));
                } else {
                    print_warning(&format!(
                        "{} saved to {} with {} warning(s)",
                        report.id,
                        report.path.display(),
                        report.warnings.len()
                    ));
                }
                self.stats.record(&report);
            }
            Err(e) => {
                print_error(&format!("Failed to process '{}': {}", input, e));
                self.stats.mark_failed();
            }
        }
    }

    async fn process(&mut self, input: &str) -> Result<DownloadReport> {
        let id = match resolve_target(&self.api, input).await? {
            Resolution::Id(id) => id,
            Resolution::Candidates(candidates) if candidates.is_empty() => {
                return Err(Error::NotFound(format!(
                    "No application matches '{}'",
                    input.trim()
                )));
            }
            Resolution::Candidates(candidates) => {
                print_candidates(&candidates);
                let selection = match self.config.options.pick {
                    Some(pick) => pick,
                    None => {
                        let answer = self
                            .prompt
                            .ask("Select a number:")
                            .await?
                            .ok_or_else(|| Error::InvalidInput("No selection made".to_string()))?;
                        parse_selection(&answer)?
                    }
                };
                pick_candidate(&candidates, selection)?
            }
        };

        print_sources(self.fetcher.registry(), &id);
        download_script(&self.fetcher, &self.api, &self.config, &id).await
    }
}
