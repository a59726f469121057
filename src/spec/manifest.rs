use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::accessor::{FileAccessor, Spec};
use super::path_list::PathList;
use super::platform::Platform;
use super::SpecsByPlatform;
use crate::common::errors::SpecError;

const LICENSE_PATTERN: &str = "licen{c,s}e{*,.*}";
const README_PATTERN: &str = "readme{*,.*}";

/// A podspec attribute given either as one string or as a list
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl Default for OneOrMany {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

impl OneOrMany {
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            OneOrMany::One(s) => vec![s.clone()],
            OneOrMany::Many(v) => v.clone(),
        }
    }
}

/// `license` is either the license type alone, or an object naming a file
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum License {
    Type(String),
    Detailed {
        #[serde(rename = "type", default)]
        kind: Option<String>,
        #[serde(default)]
        file: Option<String>,
    },
}

impl License {
    pub fn file(&self) -> Option<&str> {
        match self {
            License::Type(_) => None,
            License::Detailed { file, .. } => file.as_deref(),
        }
    }
}

/// `prefix_header_file` may be a path or `false`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum PrefixHeader {
    Path(String),
    Flag(bool),
}

/// File pattern attributes, valid at the root and in platform sections
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileAttributes {
    #[serde(default)]
    pub source_files: OneOrMany,
    #[serde(default)]
    pub resources: OneOrMany,
    #[serde(default)]
    pub resource_bundles: BTreeMap<String, OneOrMany>,
    #[serde(default)]
    pub vendored_frameworks: OneOrMany,
    #[serde(default)]
    pub vendored_libraries: OneOrMany,
    #[serde(default)]
    pub preserve_paths: OneOrMany,
}

impl FileAttributes {
    fn resource_bundle_patterns(&self) -> Vec<String> {
        self.resource_bundles
            .values()
            .flat_map(|patterns| patterns.to_vec())
            .collect()
    }
}

/// The JSON document as written, before subspecs are flattened
#[derive(Debug, Deserialize)]
struct Document {
    name: String,
    #[serde(default)]
    platforms: BTreeMap<Platform, Option<String>>,
    #[serde(default)]
    license: Option<License>,
    #[serde(default)]
    prefix_header_file: Option<PrefixHeader>,
    #[serde(flatten)]
    files: FileAttributes,
    #[serde(default)]
    ios: Option<FileAttributes>,
    #[serde(default, alias = "macos")]
    osx: Option<FileAttributes>,
    #[serde(default)]
    tvos: Option<FileAttributes>,
    #[serde(default)]
    watchos: Option<FileAttributes>,
    #[serde(default)]
    visionos: Option<FileAttributes>,
    #[serde(default)]
    subspecs: Vec<Document>,
}

/// One spec (root or subspec) read from a podspec-style JSON manifest
#[derive(Debug, Clone)]
pub struct ManifestSpec {
    pub name: String,
    /// Supported platforms and their deployment targets; empty means all
    pub platforms: BTreeMap<Platform, Option<String>>,
    pub license: Option<License>,
    pub prefix_header_file: Option<String>,
    pub files: FileAttributes,
    pub platform_files: BTreeMap<Platform, FileAttributes>,
}

impl ManifestSpec {
    /// Load a manifest and flatten it into the root spec plus all subspecs
    pub fn load(path: &Path) -> Result<Vec<ManifestSpec>, SpecError> {
        let contents = std::fs::read_to_string(path).map_err(|source| SpecError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(path, &contents)
    }

    /// Parse manifest text; `path` is only used in error messages
    pub fn from_json(path: &Path, contents: &str) -> Result<Vec<ManifestSpec>, SpecError> {
        let document: Document =
            serde_json::from_str(contents).map_err(|source| SpecError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let mut specs = Vec::new();
        flatten(document, None, &mut specs);
        Ok(specs)
    }

    pub fn supports(&self, platform: Platform) -> bool {
        self.platforms.is_empty() || self.platforms.contains_key(&platform)
    }

    fn patterns(&self, platform: Platform, pick: impl Fn(&FileAttributes) -> Vec<String>) -> Vec<String> {
        let mut patterns = pick(&self.files);
        if let Some(extra) = self.platform_files.get(&platform) {
            patterns.extend(pick(extra));
        }
        patterns
    }
}

fn flatten(document: Document, parent: Option<&ManifestSpec>, out: &mut Vec<ManifestSpec>) {
    let name = match parent {
        Some(p) => format!("{}/{}", p.name, document.name),
        None => document.name,
    };

    let mut platform_files = BTreeMap::new();
    for (platform, section) in [
        (Platform::Ios, document.ios),
        (Platform::Osx, document.osx),
        (Platform::Tvos, document.tvos),
        (Platform::Watchos, document.watchos),
        (Platform::Visionos, document.visionos),
    ] {
        if let Some(section) = section {
            platform_files.insert(platform, section);
        }
    }

    let prefix_header_file = match document.prefix_header_file {
        Some(PrefixHeader::Path(path)) => Some(path),
        Some(PrefixHeader::Flag(_)) => None,
        None => parent.and_then(|p| p.prefix_header_file.clone()),
    };

    let spec = ManifestSpec {
        name,
        platforms: if document.platforms.is_empty() {
            parent.map(|p| p.platforms.clone()).unwrap_or_default()
        } else {
            document.platforms
        },
        license: document
            .license
            .or_else(|| parent.and_then(|p| p.license.clone())),
        prefix_header_file,
        files: document.files,
        platform_files,
    };

    out.push(spec.clone());
    for child in document.subspecs {
        flatten(child, Some(&spec), out);
    }
}

/// Group specs under every platform they support.
///
/// `only` restricts the result to the given platforms; empty means all.
pub fn specs_by_platform(specs: &[ManifestSpec], only: &[Platform]) -> SpecsByPlatform<ManifestSpec> {
    let mut grouped: SpecsByPlatform<ManifestSpec> = BTreeMap::new();
    for platform in Platform::ALL {
        if !only.is_empty() && !only.contains(&platform) {
            continue;
        }
        let supported: Vec<ManifestSpec> = specs
            .iter()
            .filter(|s| s.supports(platform))
            .cloned()
            .collect();
        if !supported.is_empty() {
            grouped.insert(platform, supported);
        }
    }
    grouped
}

impl Spec for ManifestSpec {
    fn name(&self) -> &str {
        &self.name
    }

    fn file_accessor<'a>(
        &'a self,
        path_list: &'a PathList,
        platform: Platform,
    ) -> Result<Box<dyn FileAccessor + 'a>, SpecError> {
        if !self.supports(platform) {
            return Err(SpecError::UnsupportedPlatform {
                spec: self.name.clone(),
                platform: platform.key().to_string(),
            });
        }
        Ok(Box::new(ManifestAccessor {
            spec: self,
            path_list,
            platform,
        }))
    }
}

/// Platform view of a manifest spec, resolved against a path list
struct ManifestAccessor<'a> {
    spec: &'a ManifestSpec,
    path_list: &'a PathList,
    platform: Platform,
}

impl ManifestAccessor<'_> {
    fn expand(&self, pick: impl Fn(&FileAttributes) -> Vec<String>) -> Result<Vec<PathBuf>, SpecError> {
        let patterns = self.spec.patterns(self.platform, pick);
        self.path_list.glob(&self.spec.name, &patterns)
    }

    fn first(&self, pattern: &str) -> Result<Option<PathBuf>, SpecError> {
        let found = self.path_list.glob(&self.spec.name, &[pattern.to_string()])?;
        Ok(found.into_iter().next())
    }
}

impl FileAccessor for ManifestAccessor<'_> {
    fn vendored_frameworks(&self) -> Result<Vec<PathBuf>, SpecError> {
        self.expand(|f| f.vendored_frameworks.to_vec())
    }

    fn vendored_libraries(&self) -> Result<Vec<PathBuf>, SpecError> {
        self.expand(|f| f.vendored_libraries.to_vec())
    }

    fn resource_bundle_files(&self) -> Result<Vec<PathBuf>, SpecError> {
        self.expand(|f| f.resource_bundle_patterns())
    }

    fn license(&self) -> Result<Option<PathBuf>, SpecError> {
        match self.spec.license.as_ref().and_then(License::file) {
            Some(file) => match self.first(file)? {
                Some(found) => Ok(Some(found)),
                None => self.first(LICENSE_PATTERN),
            },
            None => self.first(LICENSE_PATTERN),
        }
    }

    fn prefix_header(&self) -> Result<Option<PathBuf>, SpecError> {
        match &self.spec.prefix_header_file {
            Some(file) => self.first(file),
            None => Ok(None),
        }
    }

    fn preserve_paths(&self) -> Result<Vec<PathBuf>, SpecError> {
        self.expand(|f| f.preserve_paths.to_vec())
    }

    fn readme(&self) -> Result<Option<PathBuf>, SpecError> {
        self.first(README_PATTERN)
    }

    fn resources(&self) -> Result<Vec<PathBuf>, SpecError> {
        self.expand(|f| f.resources.to_vec())
    }

    fn source_files(&self) -> Result<Vec<PathBuf>, SpecError> {
        self.expand(|f| f.source_files.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const MANIFEST: &str = r#"{
        "name": "Foo",
        "version": "1.2.0",
        "platforms": { "ios": "12.0", "osx": "10.13" },
        "license": { "type": "MIT", "file": "LICENSE.txt" },
        "prefix_header_file": "Support/Foo-Prefix.pch",
        "source_files": "Source/**/*.{h,m}",
        "resources": ["Assets/*.png"],
        "resource_bundles": { "FooBundle": "Bundle/*.xib" },
        "ios": { "vendored_frameworks": "Frameworks/FooKit.framework" },
        "subspecs": [
            { "name": "Core", "source_files": "Core/*.m", "prefix_header_file": false },
            { "name": "TV", "platforms": { "tvos": "12.0" }, "source_files": "TV/*.m" }
        ]
    }"#;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, b"x").unwrap();
    }

    fn specs() -> Vec<ManifestSpec> {
        ManifestSpec::from_json(Path::new("Foo.podspec.json"), MANIFEST).unwrap()
    }

    #[test]
    fn test_subspecs_are_flattened() {
        let names: Vec<_> = specs().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Foo", "Foo/Core", "Foo/TV"]);
    }

    #[test]
    fn test_subspec_inheritance() {
        let specs = specs();
        let core = &specs[1];
        assert_eq!(core.platforms.len(), 2);
        assert_eq!(
            core.license.as_ref().and_then(License::file),
            Some("LICENSE.txt")
        );
        assert!(core.prefix_header_file.is_none());

        let tv = &specs[2];
        assert!(tv.supports(Platform::Tvos));
        assert!(!tv.supports(Platform::Ios));
        assert_eq!(tv.prefix_header_file.as_deref(), Some("Support/Foo-Prefix.pch"));
    }

    #[test]
    fn test_specs_by_platform_grouping() {
        let grouped = specs_by_platform(&specs(), &[]);
        assert_eq!(grouped[&Platform::Ios].len(), 2);
        assert_eq!(grouped[&Platform::Osx].len(), 2);
        assert_eq!(grouped[&Platform::Tvos].len(), 1);
        assert!(!grouped.contains_key(&Platform::Watchos));

        let only_ios = specs_by_platform(&specs(), &[Platform::Ios]);
        assert_eq!(only_ios.len(), 1);
    }

    #[test]
    fn test_license_as_plain_string() {
        let specs = ManifestSpec::from_json(
            Path::new("Bar.podspec.json"),
            r#"{ "name": "Bar", "license": "MIT" }"#,
        )
        .unwrap();
        assert!(matches!(specs[0].license, Some(License::Type(ref t)) if t == "MIT"));
        assert!(specs[0].platforms.is_empty());
        assert!(specs[0].supports(Platform::Visionos));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = ManifestSpec::from_json(Path::new("bad.json"), "{ \"name\": ").unwrap_err();
        assert!(matches!(err, SpecError::Parse { .. }));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let dir = TempDir::new().unwrap();
        let err = ManifestSpec::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, SpecError::Read { .. }));
    }

    #[test]
    fn test_accessor_resolves_categories() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        touch(root, "Source/Foo.h");
        touch(root, "Source/Net/Client.m");
        touch(root, "Assets/logo.png");
        touch(root, "Bundle/View.xib");
        touch(root, "Frameworks/FooKit.framework/FooKit");
        touch(root, "Support/Foo-Prefix.pch");
        touch(root, "LICENSE.txt");
        touch(root, "README.md");

        let specs = specs();
        let list = PathList::new(root);

        let ios = specs[0].file_accessor(&list, Platform::Ios).unwrap();
        assert_eq!(
            ios.source_files().unwrap(),
            vec![root.join("Source/Foo.h"), root.join("Source/Net/Client.m")]
        );
        assert_eq!(ios.resources().unwrap(), vec![root.join("Assets/logo.png")]);
        assert_eq!(
            ios.resource_bundle_files().unwrap(),
            vec![root.join("Bundle/View.xib")]
        );
        assert_eq!(
            ios.vendored_frameworks().unwrap(),
            vec![root.join("Frameworks/FooKit.framework")]
        );
        assert_eq!(ios.license().unwrap(), Some(root.join("LICENSE.txt")));
        assert_eq!(ios.readme().unwrap(), Some(root.join("README.md")));
        assert_eq!(
            ios.prefix_header().unwrap(),
            Some(root.join("Support/Foo-Prefix.pch"))
        );

        let osx = specs[0].file_accessor(&list, Platform::Osx).unwrap();
        assert!(osx.vendored_frameworks().unwrap().is_empty());
    }

    #[test]
    fn test_default_license_pattern() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "Licence");

        let specs =
            ManifestSpec::from_json(Path::new("Bar.json"), r#"{ "name": "Bar", "license": "MIT" }"#)
                .unwrap();
        let list = PathList::new(dir.path());
        let accessor = specs[0].file_accessor(&list, Platform::Ios).unwrap();
        assert_eq!(accessor.license().unwrap(), Some(dir.path().join("Licence")));
    }

    #[test]
    fn test_stale_license_file_falls_back_to_pattern() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "LICENSE");

        let specs = ManifestSpec::from_json(
            Path::new("Bar.json"),
            r#"{ "name": "Bar", "license": { "type": "MIT", "file": "COPYING.md" } }"#,
        )
        .unwrap();
        let list = PathList::new(dir.path());
        let accessor = specs[0].file_accessor(&list, Platform::Ios).unwrap();
        assert_eq!(accessor.license().unwrap(), Some(dir.path().join("LICENSE")));
    }

    #[test]
    fn test_unsupported_platform_is_error() {
        let dir = TempDir::new().unwrap();
        let specs = specs();
        let list = PathList::new(dir.path());
        let result = specs[2].file_accessor(&list, Platform::Ios);
        assert!(matches!(
            result,
            Err(SpecError::UnsupportedPlatform { .. })
        ));
    }
}
