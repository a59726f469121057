use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;
use walkdir::WalkDir;

use super::collector::collect_used_paths;
use super::finder::{find_unused_paths, MatchStrategy};
use crate::common::errors::{CleanError, DeletionFailure};
use crate::common::{format, safety};
use crate::spec::{Spec, SpecsByPlatform};

/// Clean mode determines whether candidates are removed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleanMode {
    /// Report what would be removed without touching anything
    DryRun,
    /// Permanently remove every candidate
    Delete,
}

impl std::fmt::Display for CleanMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CleanMode::DryRun => write!(f, "dry_run"),
            CleanMode::Delete => write!(f, "delete"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CleanOptions {
    pub mode: CleanMode,
    pub strategy: MatchStrategy,
    pub show_progress: bool,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            mode: CleanMode::Delete,
            strategy: MatchStrategy::default(),
            show_progress: false,
        }
    }
}

/// Report from a clean operation
#[derive(Debug, Clone, Serialize)]
pub struct CleanReport {
    pub root: PathBuf,
    pub mode: CleanMode,
    pub strategy: MatchStrategy,
    pub started_at: DateTime<Utc>,
    /// Number of distinct used paths the specs produced
    pub used_count: usize,
    /// Every unused entry, parents before children
    pub candidates: Vec<PathBuf>,
    /// Entries actually removed (or that would be, in a dry run)
    pub removed: Vec<PathBuf>,
    pub bytes_freed: u64,
    pub errors: Vec<DeletionFailure>,
    /// Wall time of the pass, in seconds
    pub duration_secs: f64,
}

impl CleanReport {
    fn empty(root: &Path, options: &CleanOptions) -> Self {
        Self {
            root: root.to_path_buf(),
            mode: options.mode,
            strategy: options.strategy,
            started_at: Utc::now(),
            used_count: 0,
            candidates: Vec::new(),
            removed: Vec::new(),
            bytes_freed: 0,
            errors: Vec::new(),
            duration_secs: 0.0,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Remove every entry under `root` that none of the specs use.
///
/// - A missing root is a no-op.
/// - Spec errors abort before anything is deleted.
/// - Deletion is best-effort: failures are recorded per path and the pass
///   continues. Entries already removed with an ancestor are skipped.
pub fn clean<S: Spec>(
    root: &Path,
    specs_by_platform: &SpecsByPlatform<S>,
    options: &CleanOptions,
) -> Result<CleanReport, CleanError> {
    if !root.exists() {
        tracing::debug!(root = %root.display(), "Package root does not exist, nothing to clean");
        return Ok(CleanReport::empty(root, options));
    }

    let started = Instant::now();
    let real_root = root.canonicalize().map_err(|source| CleanError::Resolve {
        path: root.to_path_buf(),
        source,
    })?;

    if safety::is_protected(&real_root) {
        return Err(CleanError::ProtectedRoot { path: real_root });
    }

    // Given root, so caller paths through a symlinked prefix get rebased
    let used = collect_used_paths(root, specs_by_platform)?;
    let candidates = find_unused_paths(&real_root, &used, options.strategy)?;

    let mut report = CleanReport::empty(&real_root, options);
    report.used_count = used.len();

    match options.mode {
        CleanMode::DryRun => {
            for path in outermost(&candidates) {
                report.bytes_freed += entry_size(path);
                report.removed.push(path.to_path_buf());
            }
        }
        CleanMode::Delete => delete_candidates(&candidates, options.show_progress, &mut report),
    }
    report.candidates = candidates;
    report.duration_secs = started.elapsed().as_secs_f64();

    tracing::info!(
        root = %real_root.display(),
        mode = %options.mode,
        used = report.used_count,
        candidates = report.candidates.len(),
        removed = report.removed.len(),
        errors = report.errors.len(),
        duration = %format::format_duration(report.duration_secs),
        "Clean finished"
    );

    Ok(report)
}

fn delete_candidates(candidates: &[PathBuf], show_progress: bool, report: &mut CleanReport) {
    let pb = if show_progress {
        let pb = ProgressBar::new(candidates.len() as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.red} [{bar:40.red/blue}] {pos}/{len} Deleting... {msg}")
        {
            pb.set_style(style.progress_chars("━━░"));
        }
        Some(pb)
    } else {
        None
    };

    for path in candidates {
        if let Some(ref pb) = pb {
            pb.set_message(format::truncate(
                &format::format_path(path, &report.root),
                40,
            ));
        }

        let size = entry_size(path);
        match remove_path(path) {
            Ok(true) => {
                tracing::debug!(path = %path.display(), "Removed unused entry");
                report.bytes_freed += size;
                report.removed.push(path.clone());
            }
            // Removed already as part of an ancestor
            Ok(false) => {}
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to remove unused entry");
                report.errors.push(DeletionFailure {
                    path: path.clone(),
                    message: e.to_string(),
                });
            }
        }

        if let Some(ref pb) = pb {
            pb.inc(1);
        }
    }

    if let Some(ref pb) = pb {
        pb.finish_and_clear();
    }
}

/// Candidates not nested under an earlier candidate.
/// Relies on parents being listed directly before their children.
fn outermost(candidates: &[PathBuf]) -> Vec<&Path> {
    let mut outer: Vec<&Path> = Vec::new();
    for path in candidates {
        match outer.last() {
            Some(last) if path.starts_with(last) => {}
            _ => outer.push(path),
        }
    }
    outer
}

/// Delete a single file or directory permanently.
/// Returns `false` when the path was already gone.
fn remove_path(path: &Path) -> std::io::Result<bool> {
    let metadata = match path.symlink_metadata() {
        Ok(m) => m,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    };

    let result = if metadata.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    };

    match result {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

/// Logical size of a file, or of everything under a directory
fn entry_size(path: &Path) -> u64 {
    WalkDir::new(path)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.metadata().map(|m| m.len()).unwrap_or(0))
        .sum()
}
