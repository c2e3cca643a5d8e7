//! JSON output formatter for duplicate scan results.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "groups": [
//!     {
//!       "size": 1024,
//!       "files": ["/path/to/file1.txt", "/path/to/file2.txt"]
//!     }
//!   ],
//!   "summary": {
//!     "total_files": 100,
//!     "candidates": 40,
//!     "duplicate_groups": 5,
//!     "duplicate_files": 10,
//!     "reclaimable_space": 51200,
//!     "comparisons": 780,
//!     "storage_reads": 2100,
//!     "cache_hits": 6300,
//!     "comparison_errors": 0,
//!     "scan_duration_ms": 1234,
//!     "exit_code": 0,
//!     "exit_code_name": "BD000"
//!   }
//! }
//! ```

use std::io::Write;

use serde::Serialize;

use crate::duplicates::{EquivalenceGroup, ScanSummary};
use crate::error::ExitCode;

/// A single duplicate group in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonGroup {
    /// File size in bytes
    pub size: u64,
    /// Absolute paths to all files in the group, sorted
    pub files: Vec<String>,
}

impl From<&EquivalenceGroup> for JsonGroup {
    fn from(group: &EquivalenceGroup) -> Self {
        Self {
            size: group.size,
            files: group
                .paths
                .iter()
                .map(|p| p.to_string_lossy().into_owned())
                .collect(),
        }
    }
}

/// Summary statistics in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    /// Files listed under the root
    pub total_files: usize,
    /// Files that passed every filter
    pub candidates: usize,
    /// Number of duplicate groups
    pub duplicate_groups: usize,
    /// Redundant copies across all groups
    pub duplicate_files: usize,
    /// Bytes freed by keeping one file per group
    pub reclaimable_space: u64,
    /// Pairwise comparisons performed
    pub comparisons: usize,
    /// Block reads that touched storage
    pub storage_reads: u64,
    /// Block requests served from the cache
    pub cache_hits: u64,
    /// Comparisons abandoned on read errors
    pub comparison_errors: usize,
    /// Walk and filter time in milliseconds
    pub walk_duration_ms: u64,
    /// Comparison time in milliseconds
    pub grouping_duration_ms: u64,
    /// Total scan time in milliseconds
    pub scan_duration_ms: u64,
    /// The exit code number
    pub exit_code: i32,
    /// The machine-readable exit code name (e.g., "BD000")
    pub exit_code_name: String,
}

impl JsonSummary {
    /// Create a JSON summary from a ScanSummary and an exit code.
    #[must_use]
    pub fn from_scan_summary(summary: &ScanSummary, exit_code: ExitCode) -> Self {
        Self {
            total_files: summary.total_files,
            candidates: summary.candidates,
            duplicate_groups: summary.duplicate_groups,
            duplicate_files: summary.duplicate_files,
            reclaimable_space: summary.reclaimable_space,
            comparisons: summary.comparisons,
            storage_reads: summary.storage_reads,
            cache_hits: summary.cache_hits,
            comparison_errors: summary.comparison_errors,
            walk_duration_ms: summary.walk_duration.as_millis() as u64,
            grouping_duration_ms: summary.grouping_duration.as_millis() as u64,
            scan_duration_ms: summary.scan_duration.as_millis() as u64,
            exit_code: exit_code.as_i32(),
            exit_code_name: exit_code.code_prefix().to_string(),
        }
    }
}

/// Complete JSON output structure.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// Duplicate groups in discovery order
    pub groups: Vec<JsonGroup>,
    /// Scan summary statistics
    pub summary: JsonSummary,
}

impl JsonOutput {
    /// Create a new JSON output from groups, summary and exit code.
    ///
    /// # Example
    ///
    /// ```
    /// use blockdupe::duplicates::{EquivalenceGroup, ScanSummary};
    /// use blockdupe::error::ExitCode;
    /// use blockdupe::output::json::JsonOutput;
    /// use blockdupe::scanner::FileCandidate;
    /// use std::path::PathBuf;
    ///
    /// let mut group = EquivalenceGroup::new(&FileCandidate::new("/file1.txt", 1024));
    /// group.insert(PathBuf::from("/file2.txt"));
    ///
    /// let output = JsonOutput::new(&[group], &ScanSummary::default(), ExitCode::Success);
    /// assert_eq!(output.groups.len(), 1);
    /// assert_eq!(output.groups[0].files, vec!["/file1.txt", "/file2.txt"]);
    /// ```
    #[must_use]
    pub fn new(groups: &[EquivalenceGroup], summary: &ScanSummary, exit_code: ExitCode) -> Self {
        Self {
            groups: groups.iter().map(JsonGroup::from).collect(),
            summary: JsonSummary::from_scan_summary(summary, exit_code),
        }
    }

    /// Serialize to compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write JSON to a writer, followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<(), JsonOutputError> {
        let json = if pretty {
            self.to_json_pretty()?
        } else {
            self.to_json()?
        };
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

/// Errors that can occur during JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error during writing
    #[error("I/O error during JSON generation: {0}")]
    Io(#[from] std::io::Error),
}
