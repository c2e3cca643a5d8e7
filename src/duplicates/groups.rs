//! Partitioning candidates into groups of identical files.
//!
//! # Overview
//!
//! [`GroupBuilder::build_groups`] walks the candidates in order. The first
//! candidate not yet placed in a group becomes a representative and is
//! compared with every later unplaced candidate; each match joins a new
//! group with the representative. Candidates that match nothing are not
//! reported.
//!
//! Exact equality is transitive, so testing against the representative
//! alone is enough for every pair in a group to be equal. Worst-case cost is
//! O(n²) file comparisons; the shared [`BlockCache`] keeps the I/O for
//! repeated partners at one read per block.
//!
//! # Example
//!
//! ```no_run
//! use blockdupe::duplicates::{BlockCache, EqualityTester, GroupBuilder};
//! use blockdupe::scanner::FileCandidate;
//!
//! let candidates = vec![
//!     FileCandidate::new("/data/a.txt", 10),
//!     FileCandidate::new("/data/b.txt", 10),
//! ];
//!
//! let mut builder = GroupBuilder::new(EqualityTester::default(), BlockCache::new(4096));
//! let groups = builder.build_groups(&candidates);
//! println!("{} group(s), {} comparisons", groups.len(), builder.stats().comparisons);
//! ```

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::{BlockCache, CompareError, EqualityTester};
use crate::scanner::FileCandidate;

/// A set of files with identical content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EquivalenceGroup {
    /// Size shared by every member, in bytes
    pub size: u64,
    /// Member paths, unique and sorted
    pub paths: BTreeSet<PathBuf>,
}

impl EquivalenceGroup {
    /// Start a group with its representative.
    #[must_use]
    pub fn new(representative: &FileCandidate) -> Self {
        Self {
            size: representative.size,
            paths: BTreeSet::from([representative.path.clone()]),
        }
    }

    /// Add a member.
    pub fn insert(&mut self, path: PathBuf) {
        self.paths.insert(path);
    }

    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Whether `path` is a member.
    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        self.paths.contains(path)
    }

    /// Number of redundant copies (all members but one).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.paths.len().saturating_sub(1)
    }

    /// Bytes freed by keeping a single copy.
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        self.size * self.duplicate_count() as u64
    }
}

/// Statistics from the grouping pass.
#[derive(Debug, Default)]
pub struct GroupingStats {
    /// Number of candidates examined
    pub candidates: usize,
    /// Pairwise comparisons performed
    pub comparisons: usize,
    /// Comparisons decided by size alone
    pub size_mismatches: usize,
    /// Comparisons that matched
    pub matches: usize,
    /// Comparisons abandoned on a read error
    pub errors: Vec<CompareError>,
}

/// Drives pairwise comparison and collects equivalence groups.
#[derive(Debug)]
pub struct GroupBuilder {
    tester: EqualityTester,
    cache: BlockCache,
    stats: GroupingStats,
}

impl GroupBuilder {
    /// Create a builder that owns the cache for the whole pass.
    #[must_use]
    pub fn new(tester: EqualityTester, cache: BlockCache) -> Self {
        Self {
            tester,
            cache,
            stats: GroupingStats::default(),
        }
    }

    /// Statistics accumulated so far.
    #[must_use]
    pub fn stats(&self) -> &GroupingStats {
        &self.stats
    }

    /// The block cache.
    #[must_use]
    pub fn cache(&self) -> &BlockCache {
        &self.cache
    }

    /// Consume the builder, returning its cache and statistics.
    #[must_use]
    pub fn into_parts(self) -> (BlockCache, GroupingStats) {
        (self.cache, self.stats)
    }

    /// Partition `candidates` into groups of two or more identical files.
    ///
    /// A read error for one pair is logged and recorded in
    /// [`GroupingStats::errors`]; that pair counts as different and the
    /// pass continues.
    pub fn build_groups(&mut self, candidates: &[FileCandidate]) -> Vec<EquivalenceGroup> {
        let mut groups = Vec::new();
        let mut assigned = vec![false; candidates.len()];
        self.stats.candidates += candidates.len();

        for (i, representative) in candidates.iter().enumerate() {
            if assigned[i] {
                continue;
            }

            let mut group = EquivalenceGroup::new(representative);
            for (j, other) in candidates.iter().enumerate().skip(i + 1) {
                if assigned[j] {
                    continue;
                }
                if self.matches(representative, other) {
                    group.insert(other.path.clone());
                    assigned[j] = true;
                }
            }

            if group.len() > 1 {
                assigned[i] = true;
                log::debug!(
                    "Group of {} files ({} bytes each) led by {}",
                    group.len(),
                    group.size,
                    representative.path.display()
                );
                groups.push(group);
            }
        }

        log::info!(
            "Grouping complete: {} candidates, {} comparisons, {} groups",
            candidates.len(),
            self.stats.comparisons,
            groups.len()
        );

        groups
    }

    /// Compare one pair, folding errors into the statistics.
    fn matches(&mut self, first: &FileCandidate, second: &FileCandidate) -> bool {
        self.stats.comparisons += 1;
        if first.size != second.size {
            self.stats.size_mismatches += 1;
        }

        match self.tester.compare(&mut self.cache, first, second) {
            Ok(true) => {
                self.stats.matches += 1;
                true
            }
            Ok(false) => false,
            Err(e) => {
                log::warn!("{}", e);
                self.stats.errors.push(e);
                false
            }
        }
    }
}
