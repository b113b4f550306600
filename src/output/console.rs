//! Console output utilities.

use console::style;

use crate::api::AppSummary;
use crate::sources::SourceRegistry;

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("INFO").cyan().bold(), message);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("OK").green().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", style("WARN").yellow().bold(), message);
}

/// Print an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("ERROR").red().bold(), message);
}

/// Print the application banner.
pub fn print_banner() {
    let banner = format!(
        r#"
╔═══════════════════════════════════════════════════════╗
║     unlock-fetcher {:<35}║
║     Multi-source unlock script retrieval              ║
╚═══════════════════════════════════════════════════════╝
"#,
        env!("CARGO_PKG_VERSION")
    );
    println!("{}", style(banner).cyan());
}

/// Print the sources that will be tried for `id`, in order.
pub fn print_sources(registry: &SourceRegistry, id: &str) {
    println!();
    println!("{}", style(format!("Sources for {}:", id)).bold());
    for (index, url) in registry.primary_urls(id).iter().enumerate() {
        println!("  {}. {}", index + 1, url);
    }
    if let Some(archive) = registry.archive_url(id) {
        println!("  {} {}", style("archive:").dim(), archive);
    }
    println!();
}

/// Print search results as a numbered list.
pub fn print_candidates(candidates: &[AppSummary]) {
    println!();
    println!(
        "{}",
        style(format!("Found {} match(es):", candidates.len())).bold()
    );
    for (index, app) in candidates.iter().enumerate() {
        println!(
            " {:>3}. {:<40} | {}",
            index + 1,
            app.name,
            style(app.appid).cyan()
        );
    }
    println!();
}

/// Print configuration summary.
pub fn print_config_summary(targets: &[String], download_dir: &str, sources: usize) {
    println!();
    println!("{}", style("Configuration:").bold());
    if targets.is_empty() {
        println!("  Targets: (interactive)");
    } else {
        println!("  Targets: {}", targets.join(", "));
    }
    println!("  Directory: {}", download_dir);
    println!("  Script sources: {}", sources);
    println!();
}
