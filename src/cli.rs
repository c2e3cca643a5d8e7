//! Command-line interface definitions for BlockDupe.
//!
//! This module defines all CLI arguments and options using the clap derive API.
//! Global options (verbosity, color, config file) precede the subcommand.
//!
//! # Example
//!
//! ```bash
//! # Top-level files of ~/Downloads, default options
//! blockdupe scan ~/Downloads
//!
//! # Recurse, only .jpg files of at least 1 KiB, MD5 over 64 KiB blocks
//! blockdupe scan ~/Pictures --level 1 --mask '*.jpg' --min-size 1KiB \
//!     --block-size 64KiB --algorithm md5
//!
//! # Skip anything under .../tmp and .../cache, JSON output
//! blockdupe scan /srv --level 1 -e tmp -e cache --output json
//! ```

use std::path::PathBuf;

use bytesize::ByteSize;
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::ConfigOverrides;
use crate::scanner::HashAlgorithm;

/// Block-wise duplicate file finder.
///
/// BlockDupe compares candidate files block by block (CRC-32 or MD5 per
/// block) and reports groups of files with identical content.
#[derive(Debug, Parser)]
#[command(name = "blockdupe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Report fatal errors as JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Configuration file (TOML); defaults to the platform config directory
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for BlockDupe.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan a directory for duplicate files
    Scan(ScanArgs),
}

/// Arguments for the scan subcommand.
#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Directory path to scan for duplicates
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Skip files whose parent directory path ends with SUFFIX (repeatable)
    #[arg(short, long, value_name = "SUFFIX")]
    pub exclude: Vec<String>,

    /// Scan level: 0 = only files directly in PATH, 1 = recurse
    #[arg(short, long, value_name = "N")]
    pub level: Option<u32>,

    /// Minimum file size to consider (e.g., 1KB, 1KiB, 1MB)
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub min_size: Option<u64>,

    /// File name mask: `*` matches any run, `?` exactly one character
    #[arg(short, long, value_name = "PATTERN")]
    pub mask: Option<String>,

    /// Block size for reading and hashing (e.g., 4096, 64KiB)
    #[arg(short, long, value_name = "SIZE", value_parser = parse_size)]
    pub block_size: Option<u64>,

    /// Block hash algorithm
    #[arg(short, long, value_name = "ALGORITHM", value_parser = parse_algorithm)]
    pub algorithm: Option<HashAlgorithm>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Omit the summary line from text output
    #[arg(long)]
    pub no_summary: bool,
}

impl ScanArgs {
    /// Flags given on the command line, as the top configuration layer.
    #[must_use]
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            root: Some(self.path.clone()),
            exclude: (!self.exclude.is_empty()).then(|| self.exclude.clone()),
            level: self.level,
            min_size: self.min_size,
            mask: self.mask.clone(),
            block_size: self.block_size,
            algorithm: self.algorithm,
        }
    }
}

/// Output format for scan results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One path per line, blank line between groups
    Text,
    /// JSON output for scripting
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Parse a human-readable size string into bytes.
///
/// Plain numbers are bytes; SI (`KB`, `MB`) and IEC (`KiB`, `MiB`) suffixes
/// are accepted, case-insensitively.
///
/// # Examples
///
/// ```
/// use blockdupe::cli::parse_size;
///
/// assert_eq!(parse_size("1024").unwrap(), 1024);
/// assert_eq!(parse_size("1KB").unwrap(), 1000);
/// assert_eq!(parse_size("4KiB").unwrap(), 4096);
/// ```
///
/// # Errors
///
/// Returns an error if the string is empty or not a valid size.
pub fn parse_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Size cannot be empty".to_string());
    }
    s.parse::<ByteSize>()
        .map(|size| size.as_u64())
        .map_err(|e| format!("Invalid size '{s}': {e}"))
}

/// Parse a hash algorithm name (`crc32` or `md5`).
///
/// # Errors
///
/// Returns the rendered [`crate::config::ConfigError`] for unknown names.
pub fn parse_algorithm(s: &str) -> Result<HashAlgorithm, String> {
    s.parse().map_err(|e: crate::config::ConfigError| e.to_string())
}
