//! Output formatters for duplicate scan results.
//!
//! This module provides different output formats for scan results:
//! - Plain text (one path per line, blank line between groups)
//! - JSON for automation and scripting
//!
//! # Example
//!
//! ```no_run
//! use blockdupe::config::ScanConfig;
//! use blockdupe::duplicates::DuplicateFinder;
//! use blockdupe::error::ExitCode;
//! use blockdupe::output::JsonOutput;
//!
//! let finder = DuplicateFinder::new(ScanConfig::new("."));
//! let (groups, summary) = finder.find_duplicates().unwrap();
//!
//! let output = JsonOutput::new(&groups, &summary, ExitCode::Success);
//! println!("{}", output.to_json_pretty().unwrap());
//! ```

pub mod json;
pub mod text;

// Re-export main types
pub use json::JsonOutput;
pub use text::TextOutput;
