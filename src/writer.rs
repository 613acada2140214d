/*!
 * Output formatting for the two-section concat layout
 *
 * Produces the deterministic byte layout: a "Directory Structure" section of
 * decorated tree lines, an optional total-size footer, then a "File
 * Contents" section of `// File:` headers with streamed bodies separated by
 * exactly two newlines.
 */

use std::io::{self, Write};

use crate::utils::{display_path, format_size};

/// Formatter over an output sink
pub struct ConcatWriter<'w, W: Write> {
    out: &'w mut W,
    show_size: bool,
}

impl<'w, W: Write> ConcatWriter<'w, W> {
    pub fn new(out: &'w mut W, show_size: bool) -> Self {
        Self { out, show_size }
    }

    /// Access the underlying sink for streamed content bytes
    pub fn raw(&mut self) -> &mut W {
        self.out
    }

    pub fn structure_header(&mut self) -> io::Result<()> {
        self.out.write_all(b"Directory Structure:\n==================\n\n")
    }

    pub fn contents_header(&mut self) -> io::Result<()> {
        self.out.write_all(b"\nFile Contents:\n=============\n\n")
    }

    pub fn total_size_footer(&mut self, total: u64) -> io::Result<()> {
        writeln!(self.out, "\nTotal Size: {} ({} bytes)", format_size(total), total)
    }

    // ------------------------------------------------ structure tree lines

    pub fn dir_line(&mut self, level: usize, name: &str) -> io::Result<()> {
        writeln!(self.out, "{:indent$}📁 {}/", "", name, indent = level * 2)
    }

    pub fn file_line(&mut self, level: usize, name: &str, size: u64) -> io::Result<()> {
        if self.show_size {
            writeln!(
                self.out,
                "{:indent$}📄 [{}] {}",
                "",
                format_size(size),
                name,
                indent = level * 2
            )
        } else {
            writeln!(self.out, "{:indent$}📄 {}", "", name, indent = level * 2)
        }
    }

    /// A symlink with a bracketed marker, e.g. `🔗 name -> [BROKEN LINK]`
    pub fn symlink_marker(&mut self, level: usize, name: &str, marker: &str) -> io::Result<()> {
        writeln!(
            self.out,
            "{:indent$}🔗 {} -> [{}]",
            "",
            name,
            marker,
            indent = level * 2
        )
    }

    /// A symlink to a directory with a marker, e.g. `🔗 name/ -> [FOLLOWING]`
    pub fn symlink_dir_marker(&mut self, level: usize, name: &str, marker: &str) -> io::Result<()> {
        writeln!(
            self.out,
            "{:indent$}🔗 {}/ -> [{}]",
            "",
            name,
            marker,
            indent = level * 2
        )
    }

    /// A symlinked file kept as a placeholder in the tree
    pub fn symlink_placeholder_line(&mut self, level: usize, name: &str, size: u64) -> io::Result<()> {
        if self.show_size {
            writeln!(
                self.out,
                "{:indent$}🔗 [{}] {} -> [SYMLINK]",
                "",
                format_size(size),
                name,
                indent = level * 2
            )
        } else {
            writeln!(self.out, "{:indent$}🔗 {} -> [SYMLINK]", "", name, indent = level * 2)
        }
    }

    /// A symlinked file whose target is included as a regular file
    pub fn symlink_file_line(&mut self, level: usize, name: &str, size: u64) -> io::Result<()> {
        if self.show_size {
            writeln!(
                self.out,
                "{:indent$}🔗 [{}] {}",
                "",
                format_size(size),
                name,
                indent = level * 2
            )
        } else {
            writeln!(self.out, "{:indent$}🔗 {}", "", name, indent = level * 2)
        }
    }

    // ------------------------------------------------ content pass pieces

    pub fn file_header(&mut self, relative: &str, is_symlink: bool) -> io::Result<()> {
        if is_symlink {
            writeln!(self.out, "// File: {} (symlink)", display_path(relative))
        } else {
            writeln!(self.out, "// File: {}", display_path(relative))
        }
    }

    /// Exactly two newlines between file bodies
    pub fn trailer(&mut self) -> io::Result<()> {
        self.out.write_all(b"\n\n")
    }

    pub fn binary_placeholder(&mut self, relative: &str, is_symlink: bool) -> io::Result<()> {
        self.file_header(relative, is_symlink)?;
        if is_symlink {
            writeln!(self.out, "// [Binary symlink file - content not displayed]")?;
        } else {
            writeln!(self.out, "// [Binary file - content not displayed]")?;
        }
        self.out.write_all(b"\n")
    }

    pub fn symlink_placeholder_comment(&mut self, relative: &str) -> io::Result<()> {
        self.file_header(relative, false)?;
        writeln!(self.out, "// [Symlink - content not followed]")?;
        self.out.write_all(b"\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render<F: FnOnce(&mut ConcatWriter<Vec<u8>>)>(show_size: bool, f: F) -> String {
        let mut buf = Vec::new();
        let mut writer = ConcatWriter::new(&mut buf, show_size);
        f(&mut writer);
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_section_headers() {
        let out = render(false, |w| {
            w.structure_header().unwrap();
            w.contents_header().unwrap();
        });
        assert_eq!(
            out,
            "Directory Structure:\n==================\n\n\nFile Contents:\n=============\n\n"
        );
    }

    #[test]
    fn test_tree_lines_and_indent() {
        let out = render(false, |w| {
            w.dir_line(0, "src").unwrap();
            w.file_line(1, "main.rs", 10).unwrap();
        });
        assert_eq!(out, "📁 src/\n  📄 main.rs\n");
    }

    #[test]
    fn test_file_line_with_size() {
        let out = render(true, |w| w.file_line(0, "x", 3).unwrap());
        assert_eq!(out, "📄 [3 B] x\n");
    }

    #[test]
    fn test_symlink_lines() {
        let out = render(false, |w| {
            w.symlink_marker(0, "a", "SYMLINK SKIPPED").unwrap();
            w.symlink_dir_marker(1, "b", "FOLLOWING").unwrap();
            w.symlink_placeholder_line(0, "c", 5).unwrap();
            w.symlink_file_line(0, "d", 5).unwrap();
        });
        assert_eq!(
            out,
            "🔗 a -> [SYMLINK SKIPPED]\n  🔗 b/ -> [FOLLOWING]\n🔗 c -> [SYMLINK]\n🔗 d\n"
        );
    }

    #[test]
    fn test_total_size_footer() {
        let out = render(true, |w| w.total_size_footer(8).unwrap());
        assert_eq!(out, "\nTotal Size: 8 B (8 bytes)\n");
    }

    #[test]
    fn test_file_header_variants() {
        let out = render(false, |w| {
            w.file_header("a.txt", false).unwrap();
            w.file_header("link.txt", true).unwrap();
        });
        assert_eq!(out, "// File: a.txt\n// File: link.txt (symlink)\n");
    }

    #[test]
    fn test_binary_placeholder() {
        let out = render(false, |w| w.binary_placeholder("b.bin", false).unwrap());
        assert_eq!(out, "// File: b.bin\n// [Binary file - content not displayed]\n\n");
    }

    #[test]
    fn test_binary_placeholder_for_symlinked_file() {
        let out = render(false, |w| w.binary_placeholder("blink", true).unwrap());
        assert_eq!(
            out,
            "// File: blink (symlink)\n// [Binary symlink file - content not displayed]\n\n"
        );
    }
}
