use glob::{MatchOptions, Pattern};
use std::cell::OnceCell;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::common::errors::SpecError;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Every file and directory under a package root, as `/`-separated
/// relative paths.
///
/// Spec patterns are matched against this listing as strings. The
/// filesystem glob API is never used, so names containing `[`, `]`,
/// `{` or `}` are listed like any other.
#[derive(Debug)]
pub struct PathList {
    root: PathBuf,
    entries: OnceCell<Vec<String>>,
}

impl PathList {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            entries: OnceCell::new(),
        }
    }

    /// Relative paths of all entries, walked once and then cached
    pub fn entries(&self) -> Result<&[String], SpecError> {
        if let Some(entries) = self.entries.get() {
            return Ok(entries.as_slice());
        }
        let listed = self.read_entries()?;
        Ok(self.entries.get_or_init(|| listed).as_slice())
    }

    fn read_entries(&self) -> Result<Vec<String>, SpecError> {
        let mut entries = Vec::new();
        if !self.root.exists() {
            return Ok(entries);
        }

        for entry in WalkDir::new(&self.root)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| SpecError::PathList {
                root: self.root.clone(),
                message: e.to_string(),
            })?;
            if let Ok(relative) = entry.path().strip_prefix(&self.root) {
                let parts: Vec<_> = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect();
                entries.push(parts.join("/"));
            }
        }

        Ok(entries)
    }

    /// Absolute paths of the entries matching any of `patterns`.
    ///
    /// Matching is case-insensitive and `{a,b}` alternatives are expanded
    /// first. A pattern that matches nothing still yields its literal path
    /// when that path exists.
    pub fn glob(&self, spec: &str, patterns: &[String]) -> Result<Vec<PathBuf>, SpecError> {
        let entries = self.entries()?;
        let mut matched = BTreeSet::new();

        for raw in patterns {
            let raw = raw.trim().trim_start_matches("./").trim_end_matches('/');
            if raw.is_empty() {
                continue;
            }

            let mut hit = false;
            for alternative in expand_braces(raw) {
                let pattern = Pattern::new(&alternative).map_err(|e| SpecError::InvalidPattern {
                    spec: spec.to_string(),
                    pattern: raw.to_string(),
                    message: e.msg.to_string(),
                })?;
                for entry in entries {
                    if pattern.matches_with(entry, MATCH_OPTIONS) {
                        matched.insert(self.root.join(entry));
                        hit = true;
                    }
                }
            }

            if !hit {
                let literal = self.root.join(raw);
                if literal.symlink_metadata().is_ok() {
                    matched.insert(literal);
                }
            }
        }

        Ok(matched.into_iter().collect())
    }
}

/// Expand `{a,b}` alternatives into separate patterns.
/// Unbalanced braces are left as written.
pub fn expand_braces(pattern: &str) -> Vec<String> {
    let Some(open) = pattern.find('{') else {
        return vec![pattern.to_string()];
    };

    let mut depth = 0usize;
    let mut close = None;
    let mut splits = Vec::new();
    for (i, c) in pattern[open..].char_indices() {
        let i = open + i;
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    close = Some(i);
                    break;
                }
            }
            ',' if depth == 1 => splits.push(i),
            _ => {}
        }
    }

    let Some(close) = close else {
        return vec![pattern.to_string()];
    };

    let prefix = &pattern[..open];
    let suffix = &pattern[close + 1..];
    let mut bounds = vec![open];
    bounds.extend(splits);
    bounds.push(close);

    let mut expanded = Vec::new();
    for pair in bounds.windows(2) {
        let option = &pattern[pair[0] + 1..pair[1]];
        for tail in expand_braces(suffix) {
            for head in expand_braces(option) {
                expanded.push(format!("{}{}{}", prefix, head, tail));
            }
        }
    }
    expanded
}
