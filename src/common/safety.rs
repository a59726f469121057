use std::path::Path;

/// Paths that must NEVER be cleaned as a package root.
/// A package root is always a leaf install directory, never one of these.
const PROTECTED_PATHS: &[&str] = &[
    "/",
    "/System",
    "/Applications",
    "/Users",
    "/Library",
    "/home",
    "/root",
    "/usr",
    "/bin",
    "/sbin",
    "/var",
    "/etc",
    "/opt",
    "/private",
    "/tmp",
    "/Volumes",
];

/// Paths under home that must never be cleaned entirely
const PROTECTED_HOME_DIRS: &[&str] = &[
    "", // home dir itself
    "Desktop",
    "Documents",
    "Downloads",
    "Library",
    "Applications",
    ".ssh",
    ".gnupg",
];

/// Check if a path is protected and should NEVER be used as a package root
pub fn is_protected(path: &Path) -> bool {
    let path_str = path.to_string_lossy();
    let trimmed: &str = if path_str.len() > 1 {
        path_str.trim_end_matches('/')
    } else {
        &path_str
    };

    if PROTECTED_PATHS.iter().any(|p| trimmed == *p) {
        return true;
    }

    if let Some(home) = dirs::home_dir() {
        let home_str = home.to_string_lossy().to_string();

        for dir in PROTECTED_HOME_DIRS {
            let protected_path = if dir.is_empty() {
                home_str.clone()
            } else {
                format!("{}/{}", home_str, dir)
            };
            if trimmed == protected_path {
                return true;
            }
        }
    }

    false
}
