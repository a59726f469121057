use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::common::errors::SpecError;
use crate::spec::{FileAccessor, PathList, Spec, SpecsByPlatform};

/// Absolute paths of every file the specs keep, on every platform.
///
/// One accessor is built per (platform, spec) pair over a shared path
/// list of the real root. Relative entries are resolved against it and
/// absolute entries are rewritten onto it, so a root reached through a
/// symlink still matches the walked entries. Empty entries are dropped.
/// Spec errors propagate unchanged.
pub fn collect_used_paths<S: Spec>(
    root: &Path,
    specs_by_platform: &SpecsByPlatform<S>,
) -> Result<BTreeSet<String>, SpecError> {
    let real_root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
    let path_list = PathList::new(&real_root);
    let mut used = BTreeSet::new();

    for (platform, specs) in specs_by_platform {
        for spec in specs {
            let accessor = spec.file_accessor(&path_list, *platform)?;
            let files = accessor_files(accessor.as_ref())?;
            tracing::debug!(
                spec = spec.name(),
                platform = %platform,
                count = files.len(),
                "Collected used paths"
            );

            for file in files {
                if file.as_os_str().is_empty() {
                    continue;
                }
                let absolute = if file.is_absolute() {
                    resolve_used_path(file, root, &real_root)
                } else {
                    real_root.join(file)
                };
                used.insert(absolute.to_string_lossy().into_owned());
            }
        }
    }

    Ok(used)
}

/// Put an absolute used path under the real root when it names something
/// inside the package.
///
/// Only the root prefix is rewritten; links below the root are left as
/// written so a used symlink keeps its own path.
fn resolve_used_path(path: PathBuf, root: &Path, real_root: &Path) -> PathBuf {
    if path.starts_with(real_root) {
        return path;
    }
    if let Ok(rest) = path.strip_prefix(root) {
        return rebase(real_root, rest);
    }

    // Reached through some other link: resolve the nearest existing ancestor
    for ancestor in path.ancestors().skip(1) {
        if let Ok(real) = ancestor.canonicalize() {
            if real.starts_with(real_root) {
                if let Ok(rest) = path.strip_prefix(ancestor) {
                    return rebase(&real, rest);
                }
            }
            break;
        }
    }
    path
}

fn rebase(base: &Path, rest: &Path) -> PathBuf {
    if rest.as_os_str().is_empty() {
        base.to_path_buf()
    } else {
        base.join(rest)
    }
}

/// All nine categories of one accessor, flattened
fn accessor_files(accessor: &dyn FileAccessor) -> Result<Vec<PathBuf>, SpecError> {
    let mut files = Vec::new();
    files.extend(accessor.vendored_frameworks()?);
    files.extend(accessor.vendored_libraries()?);
    files.extend(accessor.resource_bundle_files()?);
    files.extend(accessor.license()?);
    files.extend(accessor.prefix_header()?);
    files.extend(accessor.preserve_paths()?);
    files.extend(accessor.readme()?);
    files.extend(accessor.resources()?);
    files.extend(accessor.source_files()?);
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{FileList, Platform};
    use std::collections::BTreeMap;

    struct Broken;

    impl Spec for Broken {
        fn name(&self) -> &str {
            "Broken"
        }

        fn file_accessor<'a>(
            &'a self,
            _path_list: &'a PathList,
            platform: Platform,
        ) -> Result<Box<dyn FileAccessor + 'a>, SpecError> {
            Err(SpecError::UnsupportedPlatform {
                spec: "Broken".to_string(),
                platform: platform.key().to_string(),
            })
        }
    }

    #[test]
    fn test_flattens_and_dedupes_across_platforms() {
        let root = Path::new("/pods/Foo");
        let mut spec = FileList::new("Foo");
        spec.source_files = vec![PathBuf::from("/pods/Foo/Source/main.c")];
        spec.license = Some(PathBuf::from("LICENSE"));
        spec.readme = None;
        spec.resources = vec![PathBuf::new()];

        let mut specs = BTreeMap::new();
        specs.insert(Platform::Ios, vec![spec.clone()]);
        specs.insert(Platform::Osx, vec![spec]);

        let used = collect_used_paths(root, &specs).unwrap();
        let expected: BTreeSet<String> = ["/pods/Foo/LICENSE", "/pods/Foo/Source/main.c"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(used, expected);
    }

    #[test]
    fn test_empty_specs_yield_nothing() {
        let specs: SpecsByPlatform<FileList> = BTreeMap::new();
        let used = collect_used_paths(Path::new("/pods/Foo"), &specs).unwrap();
        assert!(used.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_absolute_paths_rebased_onto_real_root() {
        let dir = tempfile::TempDir::new().unwrap();
        let base = dir.path().canonicalize().unwrap();
        std::fs::create_dir_all(base.join("real/Foo/Source")).unwrap();
        std::fs::write(base.join("real/Foo/Source/main.c"), b"int main;").unwrap();
        std::os::unix::fs::symlink(base.join("real"), base.join("Pods")).unwrap();

        let root = base.join("Pods/Foo");
        let mut spec = FileList::new("Foo");
        spec.source_files = vec![root.join("Source/main.c"), root.join("Source/gone.c")];
        spec.preserve_paths = vec![root.clone()];

        let mut specs = BTreeMap::new();
        specs.insert(Platform::Ios, vec![spec]);

        let used = collect_used_paths(&root, &specs).unwrap();
        let real = base.join("real/Foo");
        let expected: BTreeSet<String> = [
            real.clone(),
            real.join("Source/gone.c"),
            real.join("Source/main.c"),
        ]
        .iter()
        .map(|p| p.to_string_lossy().into_owned())
        .collect();
        assert_eq!(used, expected);
    }

    #[test]
    fn test_spec_error_propagates() {
        let mut specs = BTreeMap::new();
        specs.insert(Platform::Tvos, vec![Broken]);
        let err = collect_used_paths(Path::new("/pods/Foo"), &specs).unwrap_err();
        assert!(matches!(err, SpecError::UnsupportedPlatform { .. }));
    }
}
