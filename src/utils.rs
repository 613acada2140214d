/*!
 * Utility functions for fconcat
 */

use std::borrow::Cow;
use std::path::MAIN_SEPARATOR;

/// Longest relative path the walker will build, in bytes. Joined paths that
/// would exceed this are skipped with a warning.
pub const MAX_PATH_LEN: usize = 4096;

/// Format a human-readable file size
pub fn format_size(size: u64) -> String {
    const UNITS: [&str; 7] = ["B", "KB", "MB", "GB", "TB", "PB", "EB"];

    let mut value = size as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{} {}", size, UNITS[unit])
    } else {
        format!("{:.2} {}", value, UNITS[unit])
    }
}

/// Join a relative path with an entry name using the host separator.
///
/// Returns `None` when the joined path would exceed [`MAX_PATH_LEN`].
pub fn join_relative(parent: &str, name: &str) -> Option<String> {
    let required = if parent.is_empty() {
        name.len() + 1
    } else {
        parent.len() + 1 + name.len() + 1
    };
    if required > MAX_PATH_LEN {
        return None;
    }

    if parent.is_empty() {
        Some(name.to_string())
    } else {
        Some(format!("{}{}{}", parent, MAIN_SEPARATOR, name))
    }
}

/// Render a relative path with `/` separators regardless of the host
/// separator it was joined with
pub fn display_path(path: &str) -> Cow<'_, str> {
    if cfg!(windows) {
        Cow::Owned(path.replace('\\', "/"))
    } else {
        Cow::Borrowed(path)
    }
}

/// Final component of a relative path string
pub fn basename(path: &str) -> &str {
    match path.rfind(is_separator) {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

#[cfg(windows)]
fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

#[cfg(not(windows))]
fn is_separator(c: char) -> bool {
    c == '/'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size_bytes() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(8), "8 B");
        assert_eq!(format_size(1023), "1023 B");
    }

    #[test]
    fn test_format_size_units() {
        assert_eq!(format_size(1024), "1.00 KB");
        assert_eq!(format_size(1536), "1.50 KB");
        assert_eq!(format_size(1024 * 1024), "1.00 MB");
        assert_eq!(format_size(5 * 1024 * 1024 * 1024), "5.00 GB");
    }

    #[test]
    fn test_join_relative() {
        assert_eq!(join_relative("", "a.txt").as_deref(), Some("a.txt"));
        let joined = join_relative("dir", "a.txt").unwrap();
        assert_eq!(joined, format!("dir{}a.txt", MAIN_SEPARATOR));
    }

    #[test]
    fn test_join_relative_overflow() {
        let long = "x".repeat(MAX_PATH_LEN);
        assert!(join_relative(&long, "name").is_none());
        assert!(join_relative("", &long).is_none());
    }

    #[test]
    fn test_display_path_uses_forward_slashes() {
        assert_eq!(display_path("a/b/c.txt"), "a/b/c.txt");
        #[cfg(windows)]
        assert_eq!(display_path("a\\b\\c.txt"), "a/b/c.txt");
    }

    #[test]
    fn test_basename() {
        assert_eq!(basename("a/b/c.txt"), "c.txt");
        assert_eq!(basename("c.txt"), "c.txt");
        assert_eq!(basename("a/"), "");
    }
}
