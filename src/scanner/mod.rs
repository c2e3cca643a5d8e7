//! Scanner module for directory traversal, candidate filtering and block hashing.
//!
//! This module provides functionality for:
//! - Single-threaded directory walking using walkdir
//! - Candidate selection by name mask, size, excluded directories and depth
//! - Block hashing with CRC-32 or MD5
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal producing [`RawEntry`] values
//! - [`filter`]: [`CandidateFilter`] turning raw entries into [`FileCandidate`]s
//! - [`hasher`]: [`BlockHasher`] digesting byte blocks
//!
//! # Example
//!
//! ```no_run
//! use blockdupe::config::ScanConfig;
//! use blockdupe::scanner::{CandidateFilter, Walker};
//!
//! let config = ScanConfig::new("/home/user/Downloads")
//!     .with_level(1)
//!     .with_mask("*.iso");
//!
//! let filter = CandidateFilter::new(&config).unwrap();
//! let walker = Walker::new(&config.root, config.depth_restricted());
//! let candidates = filter.filter(walker.walk()).unwrap();
//! for candidate in &candidates {
//!     println!("{}: {} bytes", candidate.path.display(), candidate.size);
//! }
//! ```

pub mod filter;
pub mod hasher;
pub mod walker;

use std::path::PathBuf;

// Re-export main types
pub use filter::{CandidateFilter, NamePattern};
pub use hasher::{BlockHasher, HashAlgorithm};
pub use walker::Walker;

/// One entry of a recursive directory listing, before filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    /// Path of the entry
    pub path: PathBuf,
    /// Size in bytes (0 for directories)
    pub size: u64,
    /// Directory containing the entry
    pub parent: PathBuf,
    /// Whether the entry is a directory
    pub is_dir: bool,
}

impl RawEntry {
    /// Create a raw entry for a regular file.
    #[must_use]
    pub fn file(path: impl Into<PathBuf>, size: u64) -> Self {
        let path = path.into();
        let parent = path.parent().map(PathBuf::from).unwrap_or_default();
        Self {
            path,
            size,
            parent,
            is_dir: false,
        }
    }

    /// Create a raw entry for a directory.
    #[must_use]
    pub fn dir(path: impl Into<PathBuf>) -> Self {
        Self {
            is_dir: true,
            ..Self::file(path, 0)
        }
    }
}

/// A file that passed every inclusion filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    /// Absolute path to the file
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    /// Directory containing the file
    pub parent: PathBuf,
}

impl FileCandidate {
    /// Create a candidate; the parent is derived from `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, size: u64) -> Self {
        let path = path.into();
        let parent = path.parent().map(PathBuf::from).unwrap_or_default();
        Self { path, size, parent }
    }
}

impl From<RawEntry> for FileCandidate {
    fn from(entry: RawEntry) -> Self {
        Self {
            path: entry.path,
            size: entry.size,
            parent: entry.parent,
        }
    }
}

/// Errors that can occur during directory scanning.
///
/// Any of these aborts the scan; traversal errors are never skipped.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The specified path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// An I/O error occurred while accessing a file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The directory walk itself failed (e.g. a filesystem loop).
    #[error("Walk error for {path}: {message}")]
    Walk {
        /// Path where the walk failed
        path: PathBuf,
        /// Description from the walker
        message: String,
    },
}

impl ScanError {
    /// Classify an I/O error for `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path),
            std::io::ErrorKind::NotFound => Self::NotFound(path),
            _ => Self::Io { path, source },
        }
    }
}
