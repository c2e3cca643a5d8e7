//! Block-wise content equality of two files.
//!
//! Two files are equal when their sizes match and every pair of
//! corresponding blocks has the same digest. The comparison stops at the
//! first differing block, and a size mismatch is decided without reading
//! either file.
//!
//! Equality is digest equality per block; a hash collision would be
//! reported as a match.

use std::path::Path;

use super::{BlockCache, CompareError};
use crate::scanner::{BlockHasher, FileCandidate};

/// Compares files block by block through a [`BlockCache`].
#[derive(Debug, Clone, Copy, Default)]
pub struct EqualityTester {
    hasher: BlockHasher,
}

impl EqualityTester {
    /// Create a tester that digests blocks with `hasher`.
    #[must_use]
    pub fn new(hasher: BlockHasher) -> Self {
        Self { hasher }
    }

    /// The block hasher in use.
    #[must_use]
    pub fn hasher(&self) -> BlockHasher {
        self.hasher
    }

    /// Compare two files by path, reading their sizes from the filesystem.
    ///
    /// # Errors
    ///
    /// Returns [`CompareError::Io`] if either file cannot be inspected or
    /// read.
    pub fn are_equal(
        &self,
        cache: &mut BlockCache,
        first: &Path,
        second: &Path,
    ) -> Result<bool, CompareError> {
        let first = FileCandidate::new(first, file_size(first)?);
        let second = FileCandidate::new(second, file_size(second)?);
        self.compare(cache, &first, &second)
    }

    /// Compare two candidates using their recorded sizes.
    ///
    /// # Errors
    ///
    /// Returns [`CompareError::Io`] on a read failure. Running out of
    /// blocks is not an error.
    pub fn compare(
        &self,
        cache: &mut BlockCache,
        first: &FileCandidate,
        second: &FileCandidate,
    ) -> Result<bool, CompareError> {
        if first.size != second.size {
            log::trace!(
                "Size mismatch ({} vs {}): {} / {}",
                first.size,
                second.size,
                first.path.display(),
                second.path.display()
            );
            return Ok(false);
        }

        let mut index = 0;
        loop {
            let first_digest = cache
                .read_block(&first.path, index)?
                .map(|block| self.hasher.hash(block));
            let second_digest = cache
                .read_block(&second.path, index)?
                .map(|block| self.hasher.hash(block));

            match (first_digest, second_digest) {
                (Some(a), Some(b)) if a != b => {
                    log::trace!(
                        "Block {} differs: {} / {}",
                        index,
                        first.path.display(),
                        second.path.display()
                    );
                    return Ok(false);
                }
                (Some(_), Some(_)) => index += 1,
                (None, None) => return Ok(true),
                _ => {
                    // Sizes matched at scan time, so one file changed since.
                    log::debug!(
                        "Block counts diverge at block {}: {} / {}",
                        index,
                        first.path.display(),
                        second.path.display()
                    );
                    return Ok(false);
                }
            }
        }
    }
}

fn file_size(path: &Path) -> Result<u64, CompareError> {
    std::fs::metadata(path)
        .map(|m| m.len())
        .map_err(|source| CompareError::Io {
            path: path.to_path_buf(),
            source,
        })
}
