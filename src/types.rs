/*!
 * Core types and data structures shared across the fconcat pipeline
 */

/// Kind of a directory entry after lstat-style classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Regular file
    File,
    /// Directory
    Directory,
    /// Symbolic link (not followed at classification time)
    Symlink,
    /// Sockets, fifos, devices; ignored by the walker
    Other,
}

impl EntryKind {
    /// Classify a dirent's file type without following symlinks
    pub fn of(file_type: &std::fs::FileType) -> Self {
        if file_type.is_symlink() {
            EntryKind::Symlink
        } else if file_type.is_dir() {
            EntryKind::Directory
        } else if file_type.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        }
    }
}

/// Which of the two output passes the walker is currently producing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassMode {
    /// First walk: the decorated tree view
    Structure,
    /// Second walk: per-file headers and streamed content
    Content,
}

/// Counters accumulated while walking the tree
///
/// Entry counters are taken during the content pass; `total_size` is the
/// byte total accumulated by the structure pass.
#[derive(Debug, Clone, Default)]
pub struct WalkStats {
    /// Number of files whose contents were streamed to the output
    pub files_processed: usize,
    /// Number of files skipped (binary policy, unreadable, classifier errors)
    pub files_skipped: usize,
    /// Number of directories entered
    pub directories_processed: usize,
    /// Number of symbolic links encountered
    pub symlinks_processed: usize,
    /// Number of symbolic links not followed or not streamed
    pub symlinks_skipped: usize,
    /// Content bytes written to the output sink
    pub bytes_processed: u64,
    /// Sum of file sizes seen by the structure pass
    pub total_size: u64,
}
