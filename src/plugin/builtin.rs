/*!
 * Built-in plugin registry
 *
 * Plugins are resolved from `--plugin` specs of the form `name` or
 * `name=argument`:
 *
 * - `upcase`: ASCII-uppercases content; stateless across chunks.
 * - `prefix=<text>`: inserts `<text>` at the start of every line; the
 *   line-start flag carries across chunk boundaries. Defaults to `"> "`.
 * - `redact=<word>`: replaces `<word>` with asterisks, holding back a
 *   partial-match tail across chunk boundaries and flushing it at file end.
 */

use super::{FileFilter, PluginError, StreamingPlugin};

/// Longest word `redact` accepts; a held-back tail never spans more than
/// one chunk boundary this way.
const MAX_REDACT_WORD: usize = 1024;

/// Resolve a `--plugin` spec into a plugin instance
pub fn resolve(spec: &str) -> Result<Box<dyn StreamingPlugin>, PluginError> {
    let (name, arg) = match spec.split_once('=') {
        Some((name, arg)) => (name, Some(arg)),
        None => (spec, None),
    };

    match name {
        "upcase" => Ok(Box::new(Upcase)),
        "prefix" => {
            let text = arg.unwrap_or("> ");
            Ok(Box::new(Prefix {
                text: text.to_string(),
            }))
        }
        "redact" => {
            let word = arg.ok_or_else(|| {
                PluginError::InvalidSpec(
                    spec.to_string(),
                    "requires a word, e.g. redact=secret".to_string(),
                )
            })?;
            if word.is_empty() {
                return Err(PluginError::InvalidSpec(
                    spec.to_string(),
                    "word must not be empty".to_string(),
                ));
            }
            if word.len() > MAX_REDACT_WORD {
                return Err(PluginError::InvalidSpec(
                    spec.to_string(),
                    format!("word longer than {} bytes", MAX_REDACT_WORD),
                ));
            }
            Ok(Box::new(Redact {
                word: word.as_bytes().to_vec(),
            }))
        }
        other => Err(PluginError::Unknown(other.to_string())),
    }
}

// ---------------------------------------------------------------- upcase

struct Upcase;

impl StreamingPlugin for Upcase {
    fn name(&self) -> &str {
        "upcase"
    }

    fn version(&self) -> &str {
        "1.0.0"
    }

    fn file_start(&mut self, _relative_path: &str) -> Option<Box<dyn FileFilter>> {
        Some(Box::new(UpcaseFilter))
    }
}

struct UpcaseFilter;

impl FileFilter for UpcaseFilter {
    fn process_chunk(&mut self, input: &[u8]) -> Result<Vec<u8>, PluginError> {
        Ok(input.to_ascii_uppercase())
    }
}

// ---------------------------------------------------------------- prefix

struct Prefix {
    text: String,
}

impl StreamingPlugin for Prefix {
    fn name(&self) -> &str {
        "prefix"
    }

    fn version(&self) -> &str {
        "1.0.0"
    }

    fn file_start(&mut self, _relative_path: &str) -> Option<Box<dyn FileFilter>> {
        Some(Box::new(PrefixFilter {
            text: self.text.clone().into_bytes(),
            at_line_start: true,
        }))
    }
}

struct PrefixFilter {
    text: Vec<u8>,
    // carries across chunks so a line split by a chunk boundary is
    // prefixed exactly once
    at_line_start: bool,
}

impl FileFilter for PrefixFilter {
    fn process_chunk(&mut self, input: &[u8]) -> Result<Vec<u8>, PluginError> {
        let mut output = Vec::with_capacity(input.len() + self.text.len());
        for &byte in input {
            if self.at_line_start {
                output.extend_from_slice(&self.text);
                self.at_line_start = false;
            }
            output.push(byte);
            if byte == b'\n' {
                self.at_line_start = true;
            }
        }
        Ok(output)
    }
}

// ---------------------------------------------------------------- redact

struct Redact {
    word: Vec<u8>,
}

impl StreamingPlugin for Redact {
    fn name(&self) -> &str {
        "redact"
    }

    fn version(&self) -> &str {
        "1.0.0"
    }

    fn file_start(&mut self, _relative_path: &str) -> Option<Box<dyn FileFilter>> {
        Some(Box::new(RedactFilter {
            word: self.word.clone(),
            carry: Vec::new(),
        }))
    }
}

struct RedactFilter {
    word: Vec<u8>,
    // tail of the previous chunk that is a proper prefix of the word and
    // might be completed by the next chunk
    carry: Vec<u8>,
}

impl FileFilter for RedactFilter {
    fn process_chunk(&mut self, input: &[u8]) -> Result<Vec<u8>, PluginError> {
        let mut data = std::mem::take(&mut self.carry);
        data.extend_from_slice(input);

        let word_len = self.word.len();
        let mut output = Vec::with_capacity(data.len());
        let mut i = 0;
        while i < data.len() {
            let remaining = &data[i..];
            if remaining.len() >= word_len && remaining[..word_len] == self.word[..] {
                output.resize(output.len() + word_len, b'*');
                i += word_len;
            } else if remaining.len() < word_len && self.word.starts_with(remaining) {
                break;
            } else {
                output.push(data[i]);
                i += 1;
            }
        }
        self.carry = data[i..].to_vec();

        // An empty buffer would tell the host "no contribution" and the raw
        // chunk would pass through anyway, so the held tail must be emitted
        // instead. Only reachable on a final short chunk, where no later
        // chunk can complete the match.
        if output.is_empty() && !input.is_empty() && !self.carry.is_empty() {
            output = std::mem::take(&mut self.carry);
        }
        Ok(output)
    }

    fn file_end(&mut self) -> Result<Vec<u8>, PluginError> {
        Ok(std::mem::take(&mut self.carry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_chunks(filter: &mut dyn FileFilter, chunks: &[&[u8]]) -> Vec<u8> {
        let mut out = Vec::new();
        for chunk in chunks {
            out.extend(filter.process_chunk(chunk).unwrap());
        }
        out.extend(filter.file_end().unwrap());
        out
    }

    #[test]
    fn test_resolve_unknown() {
        assert!(matches!(resolve("nosuch"), Err(PluginError::Unknown(_))));
    }

    #[test]
    fn test_resolve_redact_needs_word() {
        assert!(matches!(
            resolve("redact"),
            Err(PluginError::InvalidSpec(_, _))
        ));
        assert!(matches!(
            resolve("redact="),
            Err(PluginError::InvalidSpec(_, _))
        ));
        assert!(resolve("redact=secret").is_ok());
    }

    #[test]
    fn test_resolve_names_and_versions() {
        let plugin = resolve("prefix=# ").unwrap();
        assert_eq!(plugin.name(), "prefix");
        assert_eq!(plugin.version(), "1.0.0");
    }

    #[test]
    fn test_upcase() {
        let mut filter = Upcase.file_start("a.txt").unwrap();
        assert_eq!(run_chunks(filter.as_mut(), &[b"ab\ncd"]), b"AB\nCD");
    }

    #[test]
    fn test_prefix_lines() {
        let mut plugin = Prefix {
            text: "> ".to_string(),
        };
        let mut filter = plugin.file_start("a.txt").unwrap();
        assert_eq!(run_chunks(filter.as_mut(), &[b"ab\ncd"]), b"> ab\n> cd");
    }

    #[test]
    fn test_redact_simple() {
        let mut plugin = Redact {
            word: b"secret".to_vec(),
        };
        let mut filter = plugin.file_start("a.txt").unwrap();
        assert_eq!(
            run_chunks(filter.as_mut(), &[b"a secret here"]),
            b"a ****** here"
        );
    }

    #[test]
    fn test_redact_word_straddles_chunks() {
        let mut plugin = Redact {
            word: b"secret".to_vec(),
        };
        let mut filter = plugin.file_start("a.txt").unwrap();
        assert_eq!(
            run_chunks(filter.as_mut(), &[b"xxsec", b"retyy"]),
            b"xx******yy"
        );
    }

    #[test]
    fn test_redact_partial_tail_flushed_at_eof() {
        let mut plugin = Redact {
            word: b"secret".to_vec(),
        };
        let mut filter = plugin.file_start("a.txt").unwrap();
        assert_eq!(run_chunks(filter.as_mut(), &[b"ends with sec"]), b"ends with sec");
    }

    #[test]
    fn test_redact_repeated_occurrences() {
        let mut plugin = Redact {
            word: b"ab".to_vec(),
        };
        let mut filter = plugin.file_start("a.txt").unwrap();
        assert_eq!(run_chunks(filter.as_mut(), &[b"abxabab"]), b"**x****");
    }
}
