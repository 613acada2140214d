/*!
 * Plugin chain host
 *
 * Loads the ordered chain and drives the per-file lifecycle: `file_start`
 * across all plugins, chunked piping left-to-right, tail flush via
 * `file_end`, and per-file teardown. A failing chunk transformation only
 * loses that plugin's contribution for that chunk; the pipeline continues
 * with the buffer it had.
 */

use std::io::{self, Read, Write};

use super::{builtin, FileFilter, PluginError, StreamingPlugin, CHUNK_SIZE};

/// Ordered chain of loaded plugins
pub struct PluginChain {
    plugins: Vec<Box<dyn StreamingPlugin>>,
    verbose: bool,
}

impl PluginChain {
    /// Resolve and initialize every plugin spec, preserving order.
    ///
    /// Any unresolvable spec or failing `init` aborts the load.
    pub fn load(specs: &[String], verbose: bool) -> Result<Self, PluginError> {
        let mut plugins: Vec<Box<dyn StreamingPlugin>> = Vec::with_capacity(specs.len());
        for spec in specs {
            let mut plugin = builtin::resolve(spec)?;
            plugin
                .init()
                .map_err(|e| PluginError::Init(plugin.name().to_string(), e.to_string()))?;
            if verbose {
                eprintln!(
                    "[fconcat] Loaded plugin: {} v{}",
                    plugin.name(),
                    plugin.version()
                );
            }
            plugins.push(plugin);
        }
        Ok(Self { plugins, verbose })
    }

    /// Whether the chain holds no plugins
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Number of loaded plugins
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Stream one file through the chain into `out`, returning the number of
    /// bytes written.
    ///
    /// With an empty chain this is a plain chunked copy. Read errors end the
    /// file early (logged at verbose); write errors propagate since the sink
    /// is fatal.
    pub fn stream_file<R: Read, W: Write>(
        &mut self,
        relative_path: &str,
        mut input: R,
        out: &mut W,
    ) -> io::Result<u64> {
        let mut written = 0u64;
        let mut buf = [0u8; CHUNK_SIZE];

        if self.plugins.is_empty() {
            loop {
                let n = match read_full(&mut input, &mut buf) {
                    Ok(0) => break,
                    Ok(n) => n,
                    Err(e) => {
                        if self.verbose {
                            eprintln!("[fconcat] Read error on {}: {}", relative_path, e);
                        }
                        break;
                    }
                };
                out.write_all(&buf[..n])?;
                written += n as u64;
            }
            return Ok(written);
        }

        let mut contexts: Vec<Option<Box<dyn FileFilter>>> = self
            .plugins
            .iter_mut()
            .map(|plugin| plugin.file_start(relative_path))
            .collect();

        loop {
            let n = match read_full(&mut input, &mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) => {
                    if self.verbose {
                        eprintln!("[fconcat] Read error on {}: {}", relative_path, e);
                    }
                    break;
                }
            };
            let chunk = &buf[..n];

            // Pipe the chunk left-to-right. `owned` holds the most recent
            // non-empty plugin output; plugins that return nothing or fail
            // leave the running buffer as it was.
            let mut owned: Option<Vec<u8>> = None;
            for (plugin, context) in self.plugins.iter().zip(contexts.iter_mut()) {
                let Some(context) = context else { continue };
                let current: &[u8] = owned.as_deref().unwrap_or(chunk);
                match context.process_chunk(current) {
                    Ok(output) if !output.is_empty() => owned = Some(output),
                    Ok(_) => {}
                    Err(e) => {
                        if self.verbose {
                            eprintln!(
                                "[fconcat] Plugin '{}' failed on a chunk of {}: {}",
                                plugin.name(),
                                relative_path,
                                e
                            );
                        }
                    }
                }
            }

            let final_chunk: &[u8] = owned.as_deref().unwrap_or(chunk);
            out.write_all(final_chunk)?;
            written += final_chunk.len() as u64;
        }

        for (plugin, context) in self.plugins.iter().zip(contexts.iter_mut()) {
            let Some(context) = context else { continue };
            match context.file_end() {
                Ok(tail) if !tail.is_empty() => {
                    out.write_all(&tail)?;
                    written += tail.len() as u64;
                }
                Ok(_) => {}
                Err(e) => {
                    if self.verbose {
                        eprintln!(
                            "[fconcat] Plugin '{}' failed at end of {}: {}",
                            plugin.name(),
                            relative_path,
                            e
                        );
                    }
                }
            }
        }

        Ok(written)
    }

    /// Tear the chain down in reverse load order
    pub fn shutdown(&mut self) {
        for plugin in self.plugins.iter_mut().rev() {
            plugin.cleanup();
        }
        self.plugins.clear();
    }
}

/// Read until the buffer is full or EOF, so every chunk except the last is
/// exactly [`CHUNK_SIZE`] bytes.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
