//! # podclean
//!
//! Removes the files of an installed dependency package that none of its
//! specs reference on any of its target platforms.
//!
//! After a package is fetched and its specs are resolved per platform,
//! everything under the package root is deleted except:
//!
//! - **Vendored code**: frameworks and static libraries
//! - **Resources**: plain resources and resource-bundle files
//! - **Sources**: source files and the prefix header
//! - **Metadata**: license, readme and explicitly preserved paths
//!
//! Matching is case-insensitive and protects both the descendants of a
//! used directory and the ancestors of a used file. The package root is
//! listed directly, never through filesystem glob expansion, so names
//! containing `[`, `]`, `{` or `}` are handled like any other.

pub mod cleaner;
pub mod cli;
pub mod common;
pub mod spec;

pub use cleaner::{
    clean, collect_used_paths, find_unused_paths, CleanMode, CleanOptions, CleanReport,
    MatchStrategy,
};
pub use common::errors::{CleanError, DeletionFailure, SpecError};
pub use spec::{FileAccessor, FileList, ManifestSpec, PathList, Platform, Spec, SpecsByPlatform};
