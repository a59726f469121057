pub mod accessor;
pub mod manifest;
pub mod path_list;
pub mod platform;

use std::collections::BTreeMap;

pub use accessor::{FileAccessor, FileList, Spec};
pub use manifest::{specs_by_platform, ManifestSpec};
pub use path_list::PathList;
pub use platform::Platform;

/// Specs to keep, grouped by the platform they were resolved for
pub type SpecsByPlatform<S> = BTreeMap<Platform, Vec<S>>;
