/*!
 * Streaming content plugins
 *
 * A plugin chain transforms file content while it is streamed to the output
 * in fixed-size chunks. Each plugin sees every chunk in chain order and may
 * keep per-file state, which lets a detector recognize patterns that span
 * chunk boundaries. Plugins are compiled in and resolved by name from the
 * built-in registry.
 */

mod builtin;
mod host;

pub use builtin::resolve;
pub use host::PluginChain;

use thiserror::Error;

/// Size of the chunks fed through the chain, in bytes
pub const CHUNK_SIZE: usize = 4096;

/// Errors raised while loading or running plugins
#[derive(Error, Debug)]
pub enum PluginError {
    /// No plugin registered under this name
    #[error("unknown plugin '{0}'")]
    Unknown(String),

    /// The spec string could not be parsed for this plugin
    #[error("invalid plugin spec '{0}': {1}")]
    InvalidSpec(String, String),

    /// The plugin's one-time setup failed
    #[error("plugin '{0}' failed to initialize: {1}")]
    Init(String, String),

    /// A per-chunk transformation failed
    #[error("{0}")]
    Chunk(String),
}

/// A content transformer participating in the per-file pipeline.
///
/// `init` and `cleanup` bracket the whole run; `file_start` is called once
/// per streamed file and yields the per-file state, or `None` to opt this
/// plugin out for that file.
pub trait StreamingPlugin {
    /// Plugin name, used in diagnostics and `--plugin` specs
    fn name(&self) -> &str;

    /// Plugin version string
    fn version(&self) -> &str;

    /// One-time setup before the content pass
    fn init(&mut self) -> Result<(), PluginError> {
        Ok(())
    }

    /// One-time teardown, called in reverse load order at shutdown
    fn cleanup(&mut self) {}

    /// Begin a new file, allocating its per-file state
    fn file_start(&mut self, relative_path: &str) -> Option<Box<dyn FileFilter>>;
}

/// Per-file transformation state.
///
/// The host owns the box for the lifetime of one file; dropping it is the
/// per-file teardown. Returning an empty buffer from `process_chunk` leaves
/// the running chunk unchanged for the rest of the chain.
pub trait FileFilter {
    /// Transform one chunk, possibly retaining carry-over for the next
    fn process_chunk(&mut self, input: &[u8]) -> Result<Vec<u8>, PluginError>;

    /// Final flush after end of file; returned bytes go to the output
    fn file_end(&mut self) -> Result<Vec<u8>, PluginError> {
        Ok(Vec::new())
    }
}
