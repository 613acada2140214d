/*!
 * fconcat - Concatenate a directory tree into a single text file
 *
 * This library walks a directory tree twice, writing a decorated structure
 * view followed by the contents of every included file, streamed in bounded
 * memory through an optional chain of content plugins. The output is
 * designed for feeding codebases to language models, documentation corpora,
 * and project snapshots.
 */

pub mod config;
pub mod detect;
pub mod error;
pub mod inode;
pub mod patterns;
pub mod plugin;
pub mod report;
pub mod types;
pub mod utils;
pub mod walk;
pub mod writer;


// Re-export main components for easier access
pub use config::{BinaryPolicy, Config, SymlinkPolicy};
pub use error::{FconcatError, Result};
pub use patterns::ExcludeSet;
pub use plugin::{FileFilter, PluginChain, PluginError, StreamingPlugin};
pub use report::{ReportFormat, Reporter, RunReport};
pub use types::{EntryKind, PassMode, WalkStats};
pub use utils::format_size;
pub use walk::Walker;
pub use writer::ConcatWriter;

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
