use colored::*;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::cleaner::{CleanMode, CleanReport};
use crate::common::format::{self, format_path, format_size, format_size_colored};

/// Print a clean report in human-readable format
pub fn print_clean_report(report: &CleanReport) {
    println!();
    println!("{}  podclean — {}", "🧹", report.root.display());
    println!("{}", "─".repeat(60).dimmed());

    let verb = match report.mode {
        CleanMode::DryRun => "Would remove",
        CleanMode::Delete => "Removed",
    };
    println!(
        "  {} {}  •  {} freed  •  {} used paths  •  {} matching  •  {}",
        verb,
        format::format_count(report.removed.len()).bold(),
        format_size_colored(report.bytes_freed),
        report.used_count,
        report.strategy.to_string().cyan(),
        format::format_duration(report.duration_secs).dimmed()
    );
    println!("{}", "─".repeat(60).dimmed());
    println!();

    if report.removed.is_empty() && report.errors.is_empty() {
        println!("  {} Nothing to clean!", "✨");
        println!();
        return;
    }

    for path in &report.removed {
        println!("    {} {}", "−".red(), format_path(path, &report.root));
    }

    if !report.errors.is_empty() {
        println!();
        println!(
            "  {} {}",
            "⚠".yellow(),
            format!("{} entries could not be removed:", report.errors.len()).yellow()
        );
        for error in &report.errors {
            println!(
                "    {} {}: {}",
                "→".dimmed(),
                format_path(&error.path, &report.root),
                error.message.dimmed()
            );
        }
    }

    println!();
    if report.mode == CleanMode::DryRun {
        println!("  {} Dry run — no files modified.", "ℹ️");
        println!();
    }
}

/// Print a clean report as JSON
pub fn print_clean_json(report: &CleanReport) {
    match serde_json::to_string_pretty(report) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize report: {}", e),
    }
}

/// One line summary: removed count, bytes, errors
pub fn print_clean_quiet(report: &CleanReport) {
    println!(
        "{}  {}  {}",
        report.removed.len(),
        format_size(report.bytes_freed),
        report.errors.len()
    );
}

/// Print the used path set
pub fn print_used_paths(root: &Path, used: &BTreeSet<String>) {
    format::print_header(&format!("Used paths ({})", used.len()));
    for path in used {
        println!("    {} {}", "+".green(), format_path(Path::new(path), root));
    }
    println!();
}

/// Print unused candidates
pub fn print_unused_paths(root: &Path, candidates: &[PathBuf]) {
    format::print_header(&format!("Unused entries ({})", candidates.len()));
    if candidates.is_empty() {
        println!("  {} Nothing to clean!", "✨");
    }
    for path in candidates {
        println!("    {} {}", "−".red(), format_path(path, root));
    }
    println!();
}

/// Print bare paths, one per line, for piping
pub fn print_plain<I, P>(paths: I)
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    for path in paths {
        println!("{}", path.as_ref().display());
    }
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize output: {}", e),
    }
}
