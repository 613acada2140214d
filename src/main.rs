/*!
 * Command-line interface for fconcat
 */

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};
use indicatif::{ProgressBar, ProgressStyle};
use signal_hook::consts::signal::{SIGINT, SIGTERM};
use signal_hook::iterator::Signals;

use fconcat::config::{Args, Config};
use fconcat::error::{Result, ResultExt};
use fconcat::plugin::PluginChain;
use fconcat::report::{ReportFormat, Reporter, RunReport};
use fconcat::walk::Walker;

/// Generate shell completions
fn print_completions(generator: Shell, cmd: &mut clap::Command) {
    generate(
        generator,
        cmd,
        cmd.get_name().to_string(),
        &mut io::stdout(),
    );
}

fn print_header() {
    println!(
        "fconcat v{} - Streaming file concatenator",
        fconcat::VERSION
    );
    println!("==========================================\n");
}

/// Block until SIGINT or SIGTERM arrives
fn wait_for_signal() -> io::Result<()> {
    let mut signals = Signals::new([SIGINT, SIGTERM])?;
    signals.forever().next();
    Ok(())
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Handle completions if requested
    if let Some(generator) = args.generate {
        let mut cmd = Args::command();
        eprintln!("Generating completion file for {generator:?}...");
        print_completions(generator, &mut cmd);
        return Ok(());
    }

    print_header();

    let mut config = Config::from_args(args)?;
    config.validate()?;
    config.push_auto_excludes();

    println!("Input directory : {}", config.base_path.display());
    println!("Output file     : {}", config.output_file.display());
    println!("Binary handling : {}", config.binary_policy.as_str());
    println!("Symlink handling: {}", config.symlink_policy.as_str());
    if !config.excludes.is_empty() {
        println!("Exclude patterns: {} patterns loaded", config.excludes.len());
    }
    if !config.plugin_specs.is_empty() {
        println!("Plugins         : {}", config.plugin_specs.join(", "));
    }
    println!();

    // Load and initialize the plugin chain before the content pass; a
    // failing load is fatal.
    let mut chain = PluginChain::load(&config.plugin_specs, config.verbose)?;

    let output = File::create(&config.output_file)
        .with_context(|| format!("opening output file '{}'", config.output_file.display()))?;
    let mut sink = BufWriter::new(output);

    let progress = ProgressBar::new_spinner();
    progress.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {wide_msg:.dim.white} ⏱️  {elapsed_precise}")
            .map_err(|e| fconcat::error!(Unexpected, "failed to create progress style: {}", e))?,
    );
    progress.enable_steady_tick(Duration::from_millis(100));
    progress.set_prefix("📄 Processing");
    progress.set_message("Starting scan...");

    let walker = Walker::new(&config, Arc::new(progress.clone()));

    let start_time = Instant::now();
    let stats = walker.run(&mut sink, &mut chain)?;
    sink.flush()?;
    let duration = start_time.elapsed();

    progress.finish_and_clear();

    let report = RunReport {
        output_file: config.output_file.display().to_string(),
        duration,
        stats,
    };
    Reporter::new(ReportFormat::ConsoleTable).print_report(&report);

    if config.interactive {
        println!("Interactive mode: plugins stay loaded; press Ctrl-C to exit.");
        wait_for_signal()?;
    }
    chain.shutdown();

    Ok(())
}
