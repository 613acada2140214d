/*!
 * Configuration handling for fconcat
 */

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use clap_complete::Shell;

use crate::error::Result;
use crate::patterns::ExcludeSet;
use crate::{ensure, error};

/// How binary files are treated during the content pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BinaryPolicy {
    /// Skip binary files entirely (default)
    #[default]
    Skip,
    /// Stream binary file contents like any other file
    Include,
    /// Emit a one-line placeholder comment instead of the content
    Placeholder,
}

impl BinaryPolicy {
    /// Name used in the config echo
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryPolicy::Skip => "skip",
            BinaryPolicy::Include => "include",
            BinaryPolicy::Placeholder => "placeholder",
        }
    }
}

/// How symbolic links are treated in both passes
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum SymlinkPolicy {
    /// Ignore all symlinks (default, safe)
    #[default]
    Skip,
    /// Follow symlinks with loop detection
    Follow,
    /// Include symlink targets as files, without recursing into directories
    Include,
    /// Show symlinks in the structure but do not follow them
    Placeholder,
}

impl SymlinkPolicy {
    /// Name used in the config echo
    pub fn as_str(&self) -> &'static str {
        match self {
            SymlinkPolicy::Skip => "skip",
            SymlinkPolicy::Follow => "follow",
            SymlinkPolicy::Include => "include",
            SymlinkPolicy::Placeholder => "placeholder",
        }
    }
}

/// Command-line arguments for fconcat
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "fconcat",
    version = env!("CARGO_PKG_VERSION"),
    about = "Concatenate a directory tree into a single text file",
    long_about = "Recursively scans an input directory, writes a tree view of its structure, \
and concatenates the contents of all files into a single output file, streaming content \
through an optional plugin chain."
)]
pub struct Args {
    /// Directory to scan and concatenate
    #[clap(required_unless_present = "generate")]
    pub input_dir: Option<String>,

    /// Output file to write results to
    #[clap(required_unless_present = "generate")]
    pub output_file: Option<String>,

    /// Exclude files/directories matching these wildcard patterns (`*`, `?`)
    #[clap(long = "exclude", value_name = "PATTERN", num_args = 1..)]
    pub exclude: Vec<String>,

    /// Display file sizes in the directory structure and a total size footer
    #[clap(long, short = 's')]
    pub show_size: bool,

    /// Skip binary files entirely (default behavior)
    #[clap(long, overrides_with_all = ["binary_include", "binary_placeholder"])]
    pub binary_skip: bool,

    /// Include binary file contents in the concatenation
    #[clap(long, overrides_with_all = ["binary_skip", "binary_placeholder"])]
    pub binary_include: bool,

    /// Show a placeholder for binary files instead of their content
    #[clap(long, overrides_with_all = ["binary_skip", "binary_include"])]
    pub binary_placeholder: bool,

    /// How to handle symbolic links
    #[clap(long = "symlinks", value_enum, default_value = "skip", value_name = "MODE")]
    pub symlinks: SymlinkPolicy,

    /// Append a content plugin to the chain (name or name=argument; order preserved)
    #[clap(long = "plugin", value_name = "SPEC")]
    pub plugin: Vec<String>,

    /// Respect .gitignore in the input directory
    #[clap(long)]
    pub respect_gitignore: bool,

    /// Stay alive after the run until interrupted, keeping plugins loaded
    #[clap(long)]
    pub interactive: bool,

    /// Generate shell completions
    #[clap(long = "generate", value_enum, value_name = "SHELL")]
    pub generate: Option<Shell>,
}

/// Application configuration, immutable for a run
#[derive(Debug, Clone)]
pub struct Config {
    /// Root directory whose tree is serialized
    pub base_path: PathBuf,

    /// Output file path
    pub output_file: PathBuf,

    /// Wildcard exclusion patterns
    pub excludes: ExcludeSet,

    /// How binary files are treated
    pub binary_policy: BinaryPolicy,

    /// How symbolic links are treated
    pub symlink_policy: SymlinkPolicy,

    /// Whether tree entries carry formatted sizes
    pub show_size: bool,

    /// Ordered plugin specs for the content pipeline
    pub plugin_specs: Vec<String>,

    /// Whether .gitignore in the input directory is honored
    pub respect_gitignore: bool,

    /// Whether the process stays alive after the run until signaled
    pub interactive: bool,

    /// Whether per-entry diagnostics go to stderr (FCONCAT_VERBOSE)
    pub verbose: bool,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args(args: Args) -> Result<Self> {
        let input_dir = args
            .input_dir
            .ok_or_else(|| error!(InvalidArgument, "input directory must be specified"))?;
        let output_file = args
            .output_file
            .ok_or_else(|| error!(InvalidArgument, "output file must be specified"))?;
        ensure!(
            !input_dir.is_empty(),
            InvalidArgument,
            "input directory must not be empty"
        );
        ensure!(
            !output_file.is_empty(),
            InvalidArgument,
            "output file must not be empty"
        );

        let binary_policy = if args.binary_include {
            BinaryPolicy::Include
        } else if args.binary_placeholder {
            BinaryPolicy::Placeholder
        } else {
            BinaryPolicy::Skip
        };

        let mut excludes = ExcludeSet::new();
        for pattern in &args.exclude {
            excludes.add(pattern);
        }

        Ok(Self {
            base_path: PathBuf::from(input_dir),
            output_file: PathBuf::from(output_file),
            excludes,
            binary_policy,
            symlink_policy: args.symlinks,
            show_size: args.show_size,
            plugin_specs: args.plugin,
            respect_gitignore: args.respect_gitignore,
            interactive: args.interactive,
            verbose: verbose_from_env(),
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.base_path.is_dir(),
            PathNotFound,
            "input directory not found: {}",
            self.base_path.display()
        );

        if let Some(parent) = self.output_file.parent() {
            if parent != Path::new("") {
                ensure!(
                    parent.exists(),
                    PathNotFound,
                    "output directory not found: {}",
                    parent.display()
                );
            }
        }

        Ok(())
    }

    /// Prevent the output file from being read back into itself.
    ///
    /// When the output lies inside the input directory its absolute and
    /// relative paths are excluded; the basename is always excluded as a
    /// fallback, plus the raw path when the input directory is `.`.
    pub fn push_auto_excludes(&mut self) {
        let abs_input = absolute(&self.base_path);
        let abs_output = absolute(&self.output_file);

        if abs_output.starts_with(&abs_input) {
            self.excludes.add(&abs_output.to_string_lossy());
            if let Ok(relative) = abs_output.strip_prefix(&abs_input) {
                self.excludes.add(&relative.to_string_lossy());
            }
        }

        if let Some(name) = self.output_file.file_name() {
            self.excludes.add(&name.to_string_lossy());
        }

        if self.base_path == Path::new(".") {
            self.excludes.add(&self.output_file.to_string_lossy());
        }
    }
}

/// Resolve a path for auto-exclude comparison, falling back to joining the
/// current directory when the path does not exist yet.
fn absolute(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            env::current_dir()
                .map(|cwd| cwd.join(path))
                .unwrap_or_else(|_| path.to_path_buf())
        }
    })
}

/// FCONCAT_VERBOSE=1 (or true, case-insensitive) routes per-entry
/// diagnostics to stderr.
pub fn verbose_from_env() -> bool {
    env::var("FCONCAT_VERBOSE")
        .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}
