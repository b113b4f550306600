//! Report and statistics printing.

use console::style;

use crate::dlc::ExpansionOutcome;
use crate::download::{DownloadReport, SessionStats};
use crate::fetch::PayloadOrigin;

/// Print the outcome of one target.
pub fn print_report(report: &DownloadReport) {
    println!();
    println!("{}", style(format!("Result for {}:", report.id)).bold());

    match &report.origin {
        PayloadOrigin::Mirror { ordinal, url } => {
            println!("  Source:    mirror #{} ({})", ordinal, url)
        }
        PayloadOrigin::Archive { url, attempts } => {
            println!("  Source:    archive ({}, {} attempt(s))", url, attempts)
        }
    }

    println!("  Saved:     {} ({} bytes)", report.path.display(), report.bytes);
    println!("  Commented: {} line(s)", report.commented);
    println!(
        "  Key:       {}",
        if report.keyed > 0 {
            style("injected").green()
        } else {
            style("not available").yellow()
        }
    );

    match &report.expansion {
        Some(ExpansionOutcome::Appended(ids)) => {
            println!("  Appended:  {} ({})", ids.len(), ids.join(", "))
        }
        Some(ExpansionOutcome::NothingToAdd(reason)) => println!("  Appended:  0 ({})", reason),
        None => {}
    }

    for warning in &report.warnings {
        println!("  {} {}", style("Warning:").yellow(), warning);
    }

    println!("  Took:      {:.2}s", report.elapsed.as_secs_f64());
}

/// Print totals for the whole run.
pub fn print_session_stats(stats: &SessionStats) {
    println!();
    println!("{}", style("═".repeat(50)).dim());
    println!("{}", style("Session Statistics:").bold());
    println!("  Targets processed: {}", stats.targets_processed);
    if stats.targets_failed > 0 {
        println!("  Targets failed:    {}", style(stats.targets_failed).red());
    }
    println!("  From archive:      {}", stats.from_archive);
    println!("  Keys injected:     {}", stats.keys_injected);
    println!("  Lines appended:    {}", stats.registrations_appended);
    if stats.warnings > 0 {
        println!("  Warnings:          {}", style(stats.warnings).yellow());
    }
    println!("{}", style("═".repeat(50)).dim());
}
