//! Typed errors for podclean operations.
//! We use `anyhow` at the top level for CLI error handling,
//! but these typed errors let the library be precise about failures.

use std::path::PathBuf;

use thiserror::Error;

/// Failures raised by a spec consumer while describing its files.
#[derive(Debug, Error)]
pub enum SpecError {
    /// Spec manifest could not be read
    #[error("Failed to read spec '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Spec manifest is not valid JSON or has the wrong shape
    #[error("Failed to parse spec '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// A file pattern in the spec cannot be compiled
    #[error("Invalid pattern '{pattern}' in spec '{spec}': {message}")]
    InvalidPattern {
        spec: String,
        pattern: String,
        message: String,
    },

    /// The spec does not support the requested platform
    #[error("Spec '{spec}' does not support platform '{platform}'")]
    UnsupportedPlatform { spec: String, platform: String },

    /// Listing the package root for pattern matching failed
    #[error("Failed to list '{}': {message}", .root.display())]
    PathList { root: PathBuf, message: String },
}

/// Failures that abort a clean pass.
#[derive(Debug, Error)]
pub enum CleanError {
    /// Collecting used paths failed; nothing was deleted
    #[error(transparent)]
    Spec(#[from] SpecError),

    /// Root could not be resolved to a real path
    #[error("Failed to resolve package root '{}': {source}", .path.display())]
    Resolve {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Traversal of the package root failed
    #[error("Failed to walk '{}': {source}", .path.display())]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },

    /// Root is a directory that must never be cleaned
    #[error("Refusing to clean protected path: '{}'", .path.display())]
    ProtectedRoot { path: PathBuf },
}

/// A single candidate that could not be removed.
/// Recorded in the report; never aborts the pass.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DeletionFailure {
    pub path: PathBuf,
    pub message: String,
}

impl std::fmt::Display for DeletionFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protected_root_message() {
        let err = CleanError::ProtectedRoot {
            path: PathBuf::from("/"),
        };
        assert_eq!(err.to_string(), "Refusing to clean protected path: '/'");
    }

    #[test]
    fn test_spec_error_is_transparent() {
        let err: CleanError = SpecError::UnsupportedPlatform {
            spec: "Foo".to_string(),
            platform: "tvos".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Spec 'Foo' does not support platform 'tvos'"
        );
    }

    #[test]
    fn test_deletion_failure_display() {
        let failure = DeletionFailure {
            path: PathBuf::from("/tmp/pod/Junk"),
            message: "Permission denied".to_string(),
        };
        assert_eq!(failure.to_string(), "/tmp/pod/Junk: Permission denied");
    }
}
