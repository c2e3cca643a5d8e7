//! In-memory block cache shared by every comparison in one run.
//!
//! # Overview
//!
//! A file is usually compared against several partners, so each block read
//! from storage is kept for the rest of the run. For every path the cache
//! holds one contiguous, append-only buffer: the concatenation of blocks
//! `0..n` read so far. Nothing is evicted.
//!
//! Block requests are served as follows:
//!
//! - a block already in the buffer is sliced out of memory;
//! - a block past a previously observed end-of-file is `None` with no I/O;
//! - otherwise the block is read at `index * block_size`, appended and
//!   returned. An empty read is end-of-file (`None`).
//!
//! Read failures are reported as [`CompareError::Io`], never as `None`.
//!
//! # Example
//!
//! ```no_run
//! use blockdupe::duplicates::BlockCache;
//! use std::path::Path;
//!
//! let mut cache = BlockCache::new(4096);
//! let first = cache.read_block(Path::new("/tmp/a.bin"), 0).unwrap().map(<[u8]>::to_vec);
//! let again = cache.read_block(Path::new("/tmp/a.bin"), 0).unwrap().map(<[u8]>::to_vec);
//! assert_eq!(first, again);
//! assert_eq!(cache.storage_reads(), 1);
//! ```

use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use super::CompareError;

/// Blocks read so far for one file.
#[derive(Debug, Default)]
struct CachedBlocks {
    /// Concatenated contents of blocks `0..blocks`
    data: Vec<u8>,
    /// Number of blocks held in `data`
    blocks: u64,
    /// End-of-file has been observed
    exhausted: bool,
}

/// Per-file cache of fixed-size blocks.
#[derive(Debug)]
pub struct BlockCache {
    block_size: u64,
    entries: HashMap<PathBuf, CachedBlocks>,
    storage_reads: u64,
    cache_hits: u64,
}

impl BlockCache {
    /// Create an empty cache for blocks of `block_size` bytes.
    ///
    /// # Panics
    ///
    /// Panics if `block_size` is zero; callers validate it through
    /// [`crate::config::ScanConfig::validate`].
    #[must_use]
    pub fn new(block_size: u64) -> Self {
        assert!(block_size > 0, "block size must be greater than zero");
        Self {
            block_size,
            entries: HashMap::new(),
            storage_reads: 0,
            cache_hits: 0,
        }
    }

    /// Block size in bytes.
    #[must_use]
    pub fn block_size(&self) -> u64 {
        self.block_size
    }

    /// Number of block reads that touched storage.
    #[must_use]
    pub fn storage_reads(&self) -> u64 {
        self.storage_reads
    }

    /// Number of block requests answered from memory.
    #[must_use]
    pub fn cache_hits(&self) -> u64 {
        self.cache_hits
    }

    /// Number of files with a cache entry.
    #[must_use]
    pub fn cached_files(&self) -> usize {
        self.entries.len()
    }

    /// Total bytes held across all entries.
    #[must_use]
    pub fn cached_bytes(&self) -> u64 {
        self.entries.values().map(|e| e.data.len() as u64).sum()
    }

    /// Return block `index` of `path`, or `None` past end-of-file.
    ///
    /// Blocks are expected in increasing order per file. Skipping ahead
    /// reads the intermediate blocks first so the buffer stays contiguous.
    ///
    /// # Errors
    ///
    /// Returns [`CompareError::Io`] if the file cannot be opened, seeked or
    /// read.
    pub fn read_block(&mut self, path: &Path, index: u64) -> Result<Option<&[u8]>, CompareError> {
        let block_size = self.block_size;

        let cached = self
            .entries
            .get(path)
            .is_some_and(|entry| index < entry.blocks || entry.exhausted);
        if cached {
            self.cache_hits += 1;
        } else {
            self.fill_to(path, index)?;
        }

        let Some(entry) = self.entries.get(path) else {
            return Ok(None);
        };
        if index >= entry.blocks {
            return Ok(None);
        }

        let start = usize::try_from(index * block_size).unwrap_or(usize::MAX);
        let end = usize::try_from((index + 1) * block_size)
            .unwrap_or(usize::MAX)
            .min(entry.data.len());
        Ok(Some(&entry.data[start..end]))
    }

    /// Read blocks from storage until `index` is cached or the file ends.
    ///
    /// The file is opened once per call and read sequentially from the
    /// first uncached block.
    fn fill_to(&mut self, path: &Path, index: u64) -> Result<(), CompareError> {
        let block_size = self.block_size;
        let entry = self.entries.entry(path.to_path_buf()).or_default();
        if entry.blocks > index || entry.exhausted {
            return Ok(());
        }

        let mut file = open_at(path, entry.blocks * block_size)?;
        while entry.blocks <= index && !entry.exhausted {
            let chunk = read_chunk(&mut file, path, block_size)?;
            self.storage_reads += 1;

            if chunk.is_empty() {
                log::trace!("End of file at block {} of {}", entry.blocks, path.display());
                entry.exhausted = true;
                break;
            }

            if (chunk.len() as u64) < block_size {
                entry.exhausted = true;
            }
            entry.data.reserve_exact(chunk.len());
            entry.data.extend_from_slice(&chunk);
            entry.blocks += 1;
            log::trace!(
                "Read block {} of {} ({} bytes)",
                entry.blocks - 1,
                path.display(),
                chunk.len()
            );
        }

        Ok(())
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> CompareError + '_ {
    move |source| CompareError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Open `path` positioned at `offset`.
fn open_at(path: &Path, offset: u64) -> Result<File, CompareError> {
    let mut file = File::open(path).map_err(io_error(path))?;
    file.seek(SeekFrom::Start(offset)).map_err(io_error(path))?;
    Ok(file)
}

/// Read up to `len` bytes from the current position; short only at end-of-file.
fn read_chunk(file: &mut File, path: &Path, len: u64) -> Result<Vec<u8>, CompareError> {
    let mut buffer = Vec::with_capacity(usize::try_from(len).unwrap_or(0));
    file.by_ref().take(len).read_to_end(&mut buffer).map_err(io_error(path))?;
    Ok(buffer)
}
