//! BlockDupe - Block-wise Duplicate File Finder
//!
//! Finds files with identical content under a directory by comparing them
//! block by block. Block digests (CRC-32 or MD5) are cached per file, so
//! each block is read from storage at most once per scan no matter how
//! many comparisons it takes part in.

pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod scanner;

use std::io::{self, Write};

use anyhow::Context;

use crate::cli::{Cli, Commands, OutputFormat, ScanArgs};
use crate::config::ScanConfig;
use crate::duplicates::DuplicateFinder;
use crate::error::ExitCode;
use crate::output::{JsonOutput, TextOutput};

/// Run the application for parsed command-line arguments.
///
/// Returns the exit code to report on success; fatal errors are returned
/// for the caller to render.
///
/// # Errors
///
/// Returns an error when the configuration is invalid, the root cannot be
/// scanned, or the report cannot be written.
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    if cli.no_color {
        yansi::disable();
    }

    match cli.command {
        Commands::Scan(ref args) => run_scan(&cli, args),
    }
}

fn run_scan(cli: &Cli, args: &ScanArgs) -> anyhow::Result<ExitCode> {
    let config = ScanConfig::load(cli.config.as_deref(), args.overrides())
        .context("Failed to load configuration")?;
    log::info!(
        "Scanning {} (level {}, mask '{}', {} blocks, {})",
        config.root.display(),
        config.level,
        config.mask,
        config.block_size,
        config.algorithm
    );

    let finder = DuplicateFinder::new(config);
    let (groups, summary) = finder.find_duplicates()?;
    let exit_code = ExitCode::for_scan(groups.len(), summary.comparison_errors);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.output {
        OutputFormat::Text => {
            TextOutput::new(&groups, &summary)
                .with_color(!cli.no_color)
                .with_summary(!args.no_summary && !cli.quiet)
                .write_to(&mut out)
                .context("Failed to write report")?;
        }
        OutputFormat::Json => {
            JsonOutput::new(&groups, &summary, exit_code)
                .write_to(&mut out, true)
                .context("Failed to write JSON report")?;
        }
    }
    out.flush().context("Failed to flush output")?;

    log::info!(
        "Done in {:.2?}: {} group(s), {} storage reads, {:.1}% cache hits",
        summary.scan_duration,
        summary.duplicate_groups,
        summary.storage_reads,
        summary.cache_hit_rate()
    );

    Ok(exit_code)
}
