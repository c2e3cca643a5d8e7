//! Logging infrastructure for BlockDupe.
//!
//! Structured logging uses the `log` facade with an `env_logger` backend.
//! Log lines go to stderr so that stdout carries only scan results.
//!
//! Levels are determined by (in priority order):
//!
//! 1. `RUST_LOG` environment variable (if set)
//! 2. CLI flags: `--quiet` (error only) or `--verbose` (debug/trace)
//! 3. Default: warn level
//!
//! What is logged where:
//!
//! - `info`: phase summaries (candidates collected, groups found)
//! - `debug`: each candidate and each group as it is formed
//! - `trace`: per-entry filter decisions and per-block reads
//! - `warn`: files that could not be read during comparison

use env_logger::{Builder, Target};
use log::LevelFilter;
use std::env;
use std::io::Write;

/// Initialize the logging subsystem based on CLI verbosity flags.
///
/// Call once at startup. Later calls are ignored (with a debug message)
/// rather than panicking, so tests may call it freely.
///
/// # Arguments
///
/// * `verbose` - Verbosity count from CLI (0=warn, 1=info, 2=debug, 3+=trace)
/// * `quiet` - If true, only show errors (overridden by RUST_LOG)
pub fn init_logging(verbose: u8, quiet: bool) {
    let use_env = env::var("RUST_LOG").is_ok();

    let mut builder = Builder::new();
    builder.target(Target::Stderr);

    if use_env {
        builder.parse_default_env();
    } else {
        builder.filter_level(determine_level(verbose, quiet));
    }

    configure_format(&mut builder, verbose);

    match builder.try_init() {
        Ok(()) => {
            if use_env {
                log::debug!(
                    "Logging initialized from RUST_LOG: {:?}",
                    env::var("RUST_LOG").ok()
                );
            } else {
                log::debug!(
                    "Logging initialized at level: {:?}",
                    determine_level(verbose, quiet)
                );
            }
        }
        Err(e) => log::debug!("Logger already initialized: {}", e),
    }
}

/// Determine the log level from CLI flags.
fn determine_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Configure the log format.
///
/// At debug verbosity and above the module path is included; otherwise
/// lines carry only the level and message.
fn configure_format(builder: &mut Builder, verbose: u8) {
    builder.format(move |buf, record| {
        let level = record.level();
        let level_style = buf.default_level_style(level);

        if verbose >= 2 {
            writeln!(
                buf,
                "{} {level_style}{:<5}{level_style:#} [{}] {}",
                buf.timestamp_millis(),
                level,
                record.module_path().unwrap_or("unknown"),
                record.args()
            )
        } else {
            writeln!(
                buf,
                "{level_style}{:<5}{level_style:#} {}",
                level,
                record.args()
            )
        }
    });
}
