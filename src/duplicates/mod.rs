//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Block caching across comparisons ([`cache`])
//! - Block-wise file equality ([`equality`])
//! - Partitioning candidates into equivalence groups ([`groups`])
//! - Orchestrating a full scan ([`finder`])

pub mod cache;
pub mod equality;
pub mod finder;
pub mod groups;

use std::path::PathBuf;

pub use cache::BlockCache;
pub use equality::EqualityTester;
pub use finder::{DuplicateFinder, FinderError, ScanSummary};
pub use groups::{EquivalenceGroup, GroupBuilder, GroupingStats};

/// Errors that can occur while comparing file contents.
///
/// Reaching the end of a file is not an error; block reads report it as
/// `None`.
#[derive(thiserror::Error, Debug)]
pub enum CompareError {
    /// A file could not be inspected or read.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl CompareError {
    /// Path of the file that failed.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Io { path, .. } => path,
        }
    }
}
