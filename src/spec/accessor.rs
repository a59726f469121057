use std::path::PathBuf;

use super::path_list::PathList;
use super::platform::Platform;
use crate::common::errors::SpecError;

/// The nine categories of files a spec keeps in its package root.
///
/// Any category may be empty. Paths may be absolute or relative to the
/// package root; the collector resolves relative paths against the root.
pub trait FileAccessor {
    fn vendored_frameworks(&self) -> Result<Vec<PathBuf>, SpecError>;
    fn vendored_libraries(&self) -> Result<Vec<PathBuf>, SpecError>;
    fn resource_bundle_files(&self) -> Result<Vec<PathBuf>, SpecError>;
    fn license(&self) -> Result<Option<PathBuf>, SpecError>;
    fn prefix_header(&self) -> Result<Option<PathBuf>, SpecError>;
    fn preserve_paths(&self) -> Result<Vec<PathBuf>, SpecError>;
    fn readme(&self) -> Result<Option<PathBuf>, SpecError>;
    fn resources(&self) -> Result<Vec<PathBuf>, SpecError>;
    fn source_files(&self) -> Result<Vec<PathBuf>, SpecError>;
}

/// A spec that can describe its files for a given platform
pub trait Spec {
    fn name(&self) -> &str;

    /// Build the platform-specific view of this spec over a package root
    fn file_accessor<'a>(
        &'a self,
        path_list: &'a PathList,
        platform: Platform,
    ) -> Result<Box<dyn FileAccessor + 'a>, SpecError>;
}

impl<S: Spec + ?Sized> Spec for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn file_accessor<'a>(
        &'a self,
        path_list: &'a PathList,
        platform: Platform,
    ) -> Result<Box<dyn FileAccessor + 'a>, SpecError> {
        (**self).file_accessor(path_list, platform)
    }
}

/// Already-resolved file lists, identical on every platform.
///
/// Used by installers that resolve specs themselves and only need the
/// cleaner's matching and deletion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileList {
    pub name: String,
    pub vendored_frameworks: Vec<PathBuf>,
    pub vendored_libraries: Vec<PathBuf>,
    pub resource_bundle_files: Vec<PathBuf>,
    pub license: Option<PathBuf>,
    pub prefix_header: Option<PathBuf>,
    pub preserve_paths: Vec<PathBuf>,
    pub readme: Option<PathBuf>,
    pub resources: Vec<PathBuf>,
    pub source_files: Vec<PathBuf>,
}

impl FileList {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }
}

impl FileAccessor for FileList {
    fn vendored_frameworks(&self) -> Result<Vec<PathBuf>, SpecError> {
        Ok(self.vendored_frameworks.clone())
    }
    fn vendored_libraries(&self) -> Result<Vec<PathBuf>, SpecError> {
        Ok(self.vendored_libraries.clone())
    }
    fn resource_bundle_files(&self) -> Result<Vec<PathBuf>, SpecError> {
        Ok(self.resource_bundle_files.clone())
    }
    fn license(&self) -> Result<Option<PathBuf>, SpecError> {
        Ok(self.license.clone())
    }
    fn prefix_header(&self) -> Result<Option<PathBuf>, SpecError> {
        Ok(self.prefix_header.clone())
    }
    fn preserve_paths(&self) -> Result<Vec<PathBuf>, SpecError> {
        Ok(self.preserve_paths.clone())
    }
    fn readme(&self) -> Result<Option<PathBuf>, SpecError> {
        Ok(self.readme.clone())
    }
    fn resources(&self) -> Result<Vec<PathBuf>, SpecError> {
        Ok(self.resources.clone())
    }
    fn source_files(&self) -> Result<Vec<PathBuf>, SpecError> {
        Ok(self.source_files.clone())
    }
}

impl Spec for FileList {
    fn name(&self) -> &str {
        &self.name
    }

    fn file_accessor<'a>(
        &'a self,
        _path_list: &'a PathList,
        _platform: Platform,
    ) -> Result<Box<dyn FileAccessor + 'a>, SpecError> {
        Ok(Box::new(self.clone()))
    }
}
