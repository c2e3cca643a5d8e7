//! Duplicate finder orchestrating a complete scan.
//!
//! # Overview
//!
//! A scan runs in two phases on the calling thread:
//!
//! 1. **Collect**: walk the root and keep the entries accepted by the
//!    [`CandidateFilter`].
//! 2. **Group**: partition the candidates with a [`GroupBuilder`] backed by
//!    a fresh [`BlockCache`].
//!
//! # Example
//!
//! ```no_run
//! use blockdupe::config::ScanConfig;
//! use blockdupe::duplicates::DuplicateFinder;
//!
//! let config = ScanConfig::new("/some/path").with_level(1).with_mask("*.jpg");
//! let finder = DuplicateFinder::new(config);
//!
//! let (groups, summary) = finder.find_duplicates().unwrap();
//! println!("Found {} duplicate groups", summary.duplicate_groups);
//! println!("Reclaimable space: {}", summary.reclaimable_display());
//! ```

use std::path::PathBuf;
use std::time::{Duration, Instant};

use bytesize::ByteSize;

use super::{BlockCache, EqualityTester, EquivalenceGroup, GroupBuilder};
use crate::config::{ConfigError, ScanConfig};
use crate::scanner::{BlockHasher, CandidateFilter, FileCandidate, ScanError, Walker};

/// Summary statistics from a completed scan.
#[derive(Debug, Clone, Default)]
pub struct ScanSummary {
    /// Files listed under the root (before filtering)
    pub total_files: usize,
    /// Files that passed every filter
    pub candidates: usize,
    /// Combined size of all candidates in bytes
    pub candidate_size: u64,
    /// Number of duplicate groups found
    pub duplicate_groups: usize,
    /// Number of redundant copies (group members beyond the first)
    pub duplicate_files: usize,
    /// Bytes freed by keeping one file per group
    pub reclaimable_space: u64,
    /// Pairwise comparisons performed
    pub comparisons: usize,
    /// Block reads that touched storage
    pub storage_reads: u64,
    /// Block requests served from the cache
    pub cache_hits: u64,
    /// Bytes held by the block cache at the end of the run
    pub cached_bytes: u64,
    /// Comparisons abandoned because a file could not be read
    pub comparison_errors: usize,
    /// Time spent walking and filtering
    pub walk_duration: Duration,
    /// Time spent comparing and grouping
    pub grouping_duration: Duration,
    /// Total scan time
    pub scan_duration: Duration,
}

impl ScanSummary {
    /// Reclaimable space in human-readable form.
    #[must_use]
    pub fn reclaimable_display(&self) -> String {
        ByteSize::b(self.reclaimable_space).to_string()
    }

    /// Share of block requests answered from memory, in percent.
    #[must_use]
    pub fn cache_hit_rate(&self) -> f64 {
        let total = self.storage_reads + self.cache_hits;
        if total == 0 {
            0.0
        } else {
            (self.cache_hits as f64 / total as f64) * 100.0
        }
    }
}

/// Errors that can occur during duplicate finding.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The provided path does not exist.
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// The provided path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// The scan options are invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Directory traversal failed.
    #[error(transparent)]
    Scan(#[from] ScanError),
}

/// Duplicate finder running the collect and group phases.
#[derive(Debug, Clone)]
pub struct DuplicateFinder {
    config: ScanConfig,
}

impl DuplicateFinder {
    /// Create a new duplicate finder with the given configuration.
    #[must_use]
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    /// The configuration this finder runs with.
    #[must_use]
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Scan the configured root and return its duplicate groups.
    ///
    /// # Errors
    ///
    /// Returns `FinderError` if:
    /// - The root does not exist or is not a directory
    /// - The options are invalid (block size, name mask)
    /// - Any directory entry cannot be listed
    ///
    /// Unreadable files during comparison do not fail the scan; they are
    /// counted in [`ScanSummary::comparison_errors`].
    pub fn find_duplicates(&self) -> Result<(Vec<EquivalenceGroup>, ScanSummary), FinderError> {
        let start_time = Instant::now();
        let mut summary = ScanSummary::default();

        self.config.validate()?;
        let root = self.resolve_root()?;
        let config = ScanConfig {
            root: root.clone(),
            ..self.config.clone()
        };
        let filter = CandidateFilter::new(&config)?;

        log::info!("Scanning {}", root.display());
        let walk_start = Instant::now();
        let walker = Walker::new(&root, config.depth_restricted());
        let entries = walker.walk().inspect(|entry| {
            if matches!(entry, Ok(e) if !e.is_dir) {
                summary.total_files += 1;
            }
        });
        let candidates = filter.filter(entries)?;
        summary.walk_duration = walk_start.elapsed();
        log::info!(
            "Collected {} candidates from {} files",
            candidates.len(),
            summary.total_files
        );

        let groups = self.group_candidates(&candidates, &mut summary);
        summary.scan_duration = start_time.elapsed();

        Ok((groups, summary))
    }

    /// Group an already filtered candidate list.
    ///
    /// Grouping statistics are added to `summary`.
    pub fn group_candidates(
        &self,
        candidates: &[FileCandidate],
        summary: &mut ScanSummary,
    ) -> Vec<EquivalenceGroup> {
        let group_start = Instant::now();
        let tester = EqualityTester::new(BlockHasher::new(self.config.algorithm));
        let mut builder = GroupBuilder::new(tester, BlockCache::new(self.config.block_size));

        let groups = builder.build_groups(candidates);
        let (cache, stats) = builder.into_parts();

        summary.candidates = candidates.len();
        summary.candidate_size = candidates.iter().map(|c| c.size).sum();
        summary.duplicate_groups = groups.len();
        summary.duplicate_files = groups.iter().map(EquivalenceGroup::duplicate_count).sum();
        summary.reclaimable_space = groups.iter().map(EquivalenceGroup::wasted_space).sum();
        summary.comparisons = stats.comparisons;
        summary.comparison_errors = stats.errors.len();
        summary.storage_reads = cache.storage_reads();
        summary.cache_hits = cache.cache_hits();
        summary.cached_bytes = cache.cached_bytes();
        summary.grouping_duration = group_start.elapsed();

        if summary.comparison_errors > 0 {
            log::warn!(
                "{} comparison(s) skipped because a file could not be read",
                summary.comparison_errors
            );
        }
        log::info!(
            "Found {} duplicate groups ({} reclaimable, {:.1}% cache hits)",
            summary.duplicate_groups,
            summary.reclaimable_display(),
            summary.cache_hit_rate()
        );

        groups
    }

    /// Check the root and make it absolute.
    fn resolve_root(&self) -> Result<PathBuf, FinderError> {
        let root = &self.config.root;
        if !root.exists() {
            return Err(FinderError::PathNotFound(root.clone()));
        }
        if !root.is_dir() {
            return Err(FinderError::NotADirectory(root.clone()));
        }
        std::fs::canonicalize(root).map_err(|e| ScanError::io(root.clone(), e).into())
    }
}
