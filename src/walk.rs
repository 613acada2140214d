/*!
 * Two-pass directory traversal engine
 *
 * The walker recursively visits the tree twice with identical policies: a
 * structure pass that renders the decorated tree view, then a content pass
 * that streams every kept file through the plugin chain. Both passes see
 * entries in the host's native directory-read order and start with a fresh
 * inode tracker, so they visit the same set of entries in the same order.
 */

use std::fs::{self, File};
use std::io::Write;
use std::os::unix::fs::MetadataExt;
use std::path::Path;
use std::sync::Arc;

use ignore::gitignore::Gitignore;
use indicatif::ProgressBar;
use walkdir::WalkDir;

use crate::config::{BinaryPolicy, Config, SymlinkPolicy};
use crate::detect::{self, Classification};
use crate::error::Result;
use crate::inode::{InodeTracker, Insert};
use crate::plugin::PluginChain;
use crate::types::{EntryKind, PassMode, WalkStats};
use crate::utils::join_relative;
use crate::writer::ConcatWriter;

/// Recursive two-pass traversal engine
pub struct Walker<'a> {
    config: &'a Config,
    progress: Arc<ProgressBar>,
    gitignore: Option<Gitignore>,
}

/// Mutable state threaded through one pass
struct PassState<'s> {
    tracker: &'s mut InodeTracker,
    total_size: &'s mut u64,
    stats: &'s mut WalkStats,
}

impl<'a> Walker<'a> {
    /// Create a walker over the configured base path
    pub fn new(config: &'a Config, progress: Arc<ProgressBar>) -> Self {
        let gitignore = if config.respect_gitignore {
            let (matcher, err) = Gitignore::new(config.base_path.join(".gitignore"));
            if let Some(err) = err {
                if config.verbose {
                    eprintln!("[fconcat] Gitignore: {}", err);
                }
            }
            Some(matcher)
        } else {
            None
        };

        Self {
            config,
            progress,
            gitignore,
        }
    }

    /// Run the structure pass, the optional size footer, then the content
    /// pass, writing everything to `sink`.
    pub fn run<W: Write>(&self, sink: &mut W, chain: &mut PluginChain) -> Result<WalkStats> {
        let mut stats = WalkStats::default();
        let mut writer = ConcatWriter::new(sink, self.config.show_size);
        let mut tracker = InodeTracker::new();

        // resolve the base once so enumeration works even when the input
        // directory is itself a symlink
        let base = fs::canonicalize(&self.config.base_path)?;

        writer.structure_header()?;
        let mut total_size = 0u64;
        {
            let mut state = PassState {
                tracker: &mut tracker,
                total_size: &mut total_size,
                stats: &mut stats,
            };
            self.walk_dir(
                PassMode::Structure,
                "",
                &base,
                0,
                &mut writer,
                chain,
                &mut state,
            )?;
        }
        stats.total_size = total_size;
        if self.config.show_size {
            writer.total_size_footer(total_size)?;
        }

        writer.contents_header()?;
        tracker.reset();
        let mut content_total = 0u64;
        {
            let mut state = PassState {
                tracker: &mut tracker,
                total_size: &mut content_total,
                stats: &mut stats,
            };
            self.walk_dir(
                PassMode::Content,
                "",
                &base,
                0,
                &mut writer,
                chain,
                &mut state,
            )?;
        }

        Ok(stats)
    }

    /// Visit one directory level in native read order.
    ///
    /// `relative` is the directory's path from the base (empty for the base
    /// itself); `full_path` is where to enumerate, which diverges from
    /// base/relative only when recursion entered a followed symlink.
    #[allow(clippy::too_many_arguments)]
    fn walk_dir<W: Write>(
        &self,
        pass: PassMode,
        relative: &str,
        full_path: &Path,
        level: usize,
        writer: &mut ConcatWriter<W>,
        chain: &mut PluginChain,
        state: &mut PassState,
    ) -> Result<()> {
        for entry in WalkDir::new(full_path)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    if self.config.verbose {
                        eprintln!("[fconcat] Cannot access entry: {}", err);
                    }
                    continue;
                }
            };
            let name = entry.file_name().to_string_lossy().into_owned();

            let entry_relative = match join_relative(relative, &name) {
                Some(path) => path,
                None => {
                    if self.config.verbose {
                        eprintln!("[fconcat] Path too long, skipping: {}/{}", relative, name);
                    }
                    continue;
                }
            };

            if self.config.excludes.matches(&entry_relative) {
                if self.config.verbose {
                    eprintln!("[fconcat] Excluded: {}", entry_relative);
                }
                continue;
            }

            let kind = EntryKind::of(&entry.file_type());
            if let Some(gitignore) = &self.gitignore {
                if gitignore
                    .matched(Path::new(&entry_relative), kind == EntryKind::Directory)
                    .is_ignore()
                {
                    if self.config.verbose {
                        eprintln!("[fconcat] Ignored by .gitignore: {}", entry_relative);
                    }
                    continue;
                }
            }

            // lstat-equivalent: walkdir does not follow the leaf here
            let metadata = match entry.metadata() {
                Ok(metadata) => metadata,
                Err(err) => {
                    if self.config.verbose {
                        eprintln!("[fconcat] Cannot access: {} ({})", entry_relative, err);
                    }
                    continue;
                }
            };

            match kind {
                EntryKind::Symlink => {
                    self.visit_symlink(pass, &entry_relative, &name, entry.path(), level, writer, chain, state)?;
                }
                EntryKind::Directory => {
                    if pass == PassMode::Structure {
                        writer.dir_line(level, &name)?;
                    } else {
                        state.stats.directories_processed += 1;
                    }
                    self.walk_dir(pass, &entry_relative, entry.path(), level + 1, writer, chain, state)?;
                }
                EntryKind::File => match pass {
                    PassMode::Structure => {
                        writer.file_line(level, &name, metadata.len())?;
                        *state.total_size += metadata.len();
                    }
                    PassMode::Content => {
                        self.emit_file_contents(&entry_relative, entry.path(), false, writer, chain, state.stats)?;
                    }
                },
                EntryKind::Other => {
                    if self.config.verbose {
                        eprintln!("[fconcat] Ignoring special file: {}", entry_relative);
                    }
                }
            }
        }

        Ok(())
    }

    /// Apply the symlink policy matrix to one link
    #[allow(clippy::too_many_arguments)]
    fn visit_symlink<W: Write>(
        &self,
        pass: PassMode,
        relative: &str,
        name: &str,
        full_path: &Path,
        level: usize,
        writer: &mut ConcatWriter<W>,
        chain: &mut PluginChain,
        state: &mut PassState,
    ) -> Result<()> {
        if pass == PassMode::Content {
            state.stats.symlinks_processed += 1;
        }

        if self.config.symlink_policy == SymlinkPolicy::Skip {
            if pass == PassMode::Structure {
                writer.symlink_marker(level, name, "SYMLINK SKIPPED")?;
            } else {
                state.stats.symlinks_skipped += 1;
            }
            if self.config.verbose {
                eprintln!("[fconcat] Skipping symlink: {}", relative);
            }
            return Ok(());
        }

        let target = match fs::metadata(full_path) {
            Ok(target) => target,
            Err(_) => {
                if pass == PassMode::Structure {
                    writer.symlink_marker(level, name, "BROKEN LINK")?;
                } else {
                    state.stats.symlinks_skipped += 1;
                }
                if self.config.verbose {
                    eprintln!("[fconcat] Broken symlink: {}", relative);
                }
                return Ok(());
            }
        };

        match self.config.symlink_policy {
            SymlinkPolicy::Placeholder => {
                if target.is_dir() {
                    if pass == PassMode::Structure {
                        writer.symlink_dir_marker(level, name, "SYMLINK TO DIR")?;
                    }
                } else {
                    match pass {
                        PassMode::Structure => {
                            writer.symlink_placeholder_line(level, name, target.len())?;
                            *state.total_size += target.len();
                        }
                        PassMode::Content => {
                            writer.symlink_placeholder_comment(relative)?;
                        }
                    }
                }
                if pass == PassMode::Content {
                    state.stats.symlinks_skipped += 1;
                }
            }
            SymlinkPolicy::Follow | SymlinkPolicy::Include => {
                if state.tracker.add(target.dev(), target.ino()) == Insert::Duplicate {
                    if pass == PassMode::Structure {
                        writer.symlink_marker(level, name, "LOOP DETECTED")?;
                    } else {
                        state.stats.symlinks_skipped += 1;
                    }
                    if self.config.verbose {
                        eprintln!("[fconcat] Symlink loop detected: {}", relative);
                    }
                    return Ok(());
                }

                if target.is_dir() {
                    if self.config.symlink_policy == SymlinkPolicy::Follow {
                        if pass == PassMode::Structure {
                            writer.symlink_dir_marker(level, name, "FOLLOWING")?;
                        }
                        // resolve the link so enumeration descends into the
                        // target directory
                        match fs::canonicalize(full_path) {
                            Ok(resolved) => {
                                self.walk_dir(pass, relative, &resolved, level + 1, writer, chain, state)?;
                            }
                            Err(err) => {
                                if self.config.verbose {
                                    eprintln!("[fconcat] Cannot resolve symlink {}: {}", relative, err);
                                }
                            }
                        }
                    }
                    // Include with a directory target: treated as absent
                } else {
                    match pass {
                        PassMode::Structure => {
                            writer.symlink_file_line(level, name, target.len())?;
                            *state.total_size += target.len();
                        }
                        PassMode::Content => {
                            self.emit_file_contents(relative, full_path, true, writer, chain, state.stats)?;
                        }
                    }
                }
            }
            SymlinkPolicy::Skip => unreachable!("handled above"),
        }

        Ok(())
    }

    /// Content-pass handling of one regular (or symlinked) file: classify,
    /// apply the binary policy, then stream through the plugin chain between
    /// a header and trailer.
    fn emit_file_contents<W: Write>(
        &self,
        relative: &str,
        full_path: &Path,
        is_symlink: bool,
        writer: &mut ConcatWriter<W>,
        chain: &mut PluginChain,
        stats: &mut WalkStats,
    ) -> Result<()> {
        self.progress.inc(1);
        self.progress.set_message(progress_label(relative));

        // Under Include the verdict cannot change the action, so the
        // classifier is not consulted at all.
        if self.config.binary_policy != BinaryPolicy::Include {
            match detect::classify_file(full_path) {
                Ok(Classification::Binary) => {
                    match self.config.binary_policy {
                        BinaryPolicy::Skip => {
                            if self.config.verbose {
                                eprintln!("[fconcat] Skipping binary file: {}", relative);
                            }
                        }
                        BinaryPolicy::Placeholder => {
                            writer.binary_placeholder(relative, is_symlink)?;
                        }
                        BinaryPolicy::Include => unreachable!("checked above"),
                    }
                    stats.files_skipped += 1;
                    return Ok(());
                }
                Ok(Classification::Text) => {}
                Err(err) => {
                    if self.config.verbose {
                        eprintln!("[fconcat] Cannot read: {} ({})", relative, err);
                    }
                    stats.files_skipped += 1;
                    return Ok(());
                }
            }
        }

        let file = match File::open(full_path) {
            Ok(file) => file,
            Err(err) => {
                if self.config.verbose {
                    eprintln!("[fconcat] Cannot open file: {} ({})", relative, err);
                }
                stats.files_skipped += 1;
                return Ok(());
            }
        };

        writer.file_header(relative, is_symlink)?;
        let written = chain.stream_file(relative, file, writer.raw())?;
        writer.trailer()?;

        stats.files_processed += 1;
        stats.bytes_processed += written;
        Ok(())
    }
}

/// Progress-bar message for the current file, truncated to keep the line
/// readable
fn progress_label(relative: &str) -> String {
    if relative.len() > 40 {
        let mut start = relative.len() - 37;
        while !relative.is_char_boundary(start) {
            start += 1;
        }
        format!("Current file: ...{}", &relative[start..])
    } else {
        format!("Current file: {}", relative)
    }
}
