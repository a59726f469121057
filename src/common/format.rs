use colored::*;

/// Format bytes into human-readable size string
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Format size with color based on magnitude
pub fn format_size_colored(bytes: u64) -> ColoredString {
    let s = format_size(bytes);
    const MB100: u64 = 100 * 1024 * 1024;
    const MB: u64 = 1024 * 1024;

    if bytes >= MB100 {
        s.red().bold()
    } else if bytes >= MB {
        s.yellow()
    } else {
        s.white()
    }
}

/// Format entry count with appropriate plural
pub fn format_count(count: usize) -> String {
    if count == 1 {
        "1 entry".to_string()
    } else {
        format!("{} entries", count)
    }
}

/// Format a path for display relative to the package root when possible
pub fn format_path(path: &std::path::Path, root: &std::path::Path) -> String {
    match path.strip_prefix(root) {
        Ok(stripped) if !stripped.as_os_str().is_empty() => stripped.display().to_string(),
        _ => path.display().to_string(),
    }
}

/// Format duration in human-readable form
pub fn format_duration(secs: f64) -> String {
    if secs < 1.0 {
        format!("{:.0}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        let mins = (secs / 60.0).floor() as u64;
        let remaining = secs - (mins as f64 * 60.0);
        format!("{}m {:.0}s", mins, remaining)
    }
}

/// Print a section header
pub fn print_header(title: &str) {
    println!();
    println!("{}", title.bold().underline());
    println!();
}

/// Truncate a string to max length (in chars) with ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    let len = s.chars().count();
    if len <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        ".".repeat(max_len)
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(1048576), "1.00 MB");
        assert_eq!(format_size(1073741824), "1.00 GB");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0 entries");
        assert_eq!(format_count(1), "1 entry");
        assert_eq!(format_count(42), "42 entries");
    }

    #[test]
    fn test_format_path_relative_to_root() {
        let root = Path::new("/tmp/Pods/Foo");
        assert_eq!(
            format_path(Path::new("/tmp/Pods/Foo/Junk/old.txt"), root),
            "Junk/old.txt"
        );
        assert_eq!(format_path(root, root), "/tmp/Pods/Foo");
        assert_eq!(format_path(Path::new("/etc/hosts"), root), "/etc/hosts");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0.5), "500ms");
        assert_eq!(format_duration(3.7), "3.7s");
        assert_eq!(format_duration(125.0), "2m 5s");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 8), "hello...");
        assert_eq!(truncate("abcd", 3), "...");
        assert_eq!(truncate("ünïcödé", 5), "ün...");
    }
}
