use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::common::errors::CleanError;

/// How an enumerated entry is compared against the used paths.
///
/// Both strategies compare case-folded strings and work in both
/// directions, so a used directory keeps its descendants and a used file
/// keeps its ancestor directories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// Raw substring containment: `entry ⊆ used || used ⊆ entry`
    #[default]
    Substring,
    /// Path-component prefix: entry is an ancestor, the same path, or a
    /// descendant of a used path
    Segment,
}

impl std::fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchStrategy::Substring => write!(f, "substring"),
            MatchStrategy::Segment => write!(f, "segment"),
        }
    }
}

/// Used paths, case-folded once for repeated matching
#[derive(Debug)]
pub struct UsedMatcher {
    strategy: MatchStrategy,
    folded: Vec<String>,
    segments: Vec<Vec<String>>,
}

impl UsedMatcher {
    pub fn new(used: &BTreeSet<String>, strategy: MatchStrategy) -> Self {
        let folded: Vec<String> = used
            .iter()
            .map(|p| p.to_lowercase())
            .filter(|p| !p.is_empty())
            .collect();
        let segments = folded.iter().map(|p| segments_of(p)).collect();
        Self {
            strategy,
            folded,
            segments,
        }
    }

    /// Whether `entry` must be kept
    pub fn is_used(&self, entry: &Path) -> bool {
        let candidate = entry.to_string_lossy().to_lowercase();

        // `.` and `..` pseudo-entries, plus names ending in a dot
        if candidate.ends_with('.') {
            return true;
        }

        match self.strategy {
            MatchStrategy::Substring => self
                .folded
                .iter()
                .any(|used| used.contains(&candidate) || candidate.contains(used.as_str())),
            MatchStrategy::Segment => {
                let candidate = segments_of(&candidate);
                self.segments
                    .iter()
                    .any(|used| used.starts_with(&candidate) || candidate.starts_with(used))
            }
        }
    }
}

fn segments_of(path: &str) -> Vec<String> {
    Path::new(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect()
}

/// Every entry under `root` (files, directories, hidden entries) that no
/// used path protects.
///
/// Entries are yielded parents before children, sorted by name, so
/// deleting them in order removes outer directories first. Symlinks are
/// listed but never followed.
pub fn find_unused_paths(
    root: &Path,
    used: &BTreeSet<String>,
    strategy: MatchStrategy,
) -> Result<Vec<PathBuf>, CleanError> {
    let matcher = UsedMatcher::new(used, strategy);
    let mut candidates = Vec::new();

    for entry in WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|source| CleanError::Walk {
            path: root.to_path_buf(),
            source,
        })?;

        if matcher.is_used(entry.path()) {
            tracing::trace!(path = %entry.path().display(), "Keeping used entry");
        } else {
            candidates.push(entry.into_path());
        }
    }

    Ok(candidates)
}
