//! Directory walker implementation using walkdir.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct, which enumerates a directory
//! tree on the calling thread and yields one [`RawEntry`] per directory or
//! regular file. Inclusion rules live in [`super::filter`]; the walker only
//! lists.
//!
//! Children of each directory are visited in file-name order, so the output
//! is stable across runs on an unchanged tree.
//!
//! # Example
//!
//! ```no_run
//! use blockdupe::scanner::Walker;
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/home/user/Downloads"), false);
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(entry) => println!("{}: {} bytes", entry.path.display(), entry.size),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::{RawEntry, ScanError};

/// Single-threaded directory walker.
#[derive(Debug, Clone)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Only list direct children of the root
    top_level_only: bool,
}

impl Walker {
    /// Create a new walker for the given path.
    ///
    /// With `top_level_only`, traversal does not descend into
    /// subdirectories at all.
    #[must_use]
    pub fn new(path: &Path, top_level_only: bool) -> Self {
        Self {
            root: path.to_path_buf(),
            top_level_only,
        }
    }

    /// Root directory of this walk.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk the directory tree, yielding raw entries.
    ///
    /// The root itself is not yielded. Symbolic links are never descended
    /// into; a link to a regular file is listed under its own path with the
    /// target's size. Other special files are not reported.
    pub fn walk(&self) -> impl Iterator<Item = Result<RawEntry, ScanError>> + '_ {
        let mut walk_dir = WalkDir::new(&self.root)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name();
        if self.top_level_only {
            walk_dir = walk_dir.max_depth(1);
        }

        walk_dir
            .into_iter()
            .filter_map(move |entry_result| match entry_result {
                Ok(entry) => {
                    let file_type = entry.file_type();
                    let path = entry.into_path();

                    if file_type.is_dir() {
                        log::trace!("Directory: {}", path.display());
                        return Some(Ok(RawEntry::dir(path)));
                    }

                    if file_type.is_symlink() {
                        return self.resolve_symlink(path);
                    }

                    if !file_type.is_file() {
                        log::trace!("Skipping special file: {}", path.display());
                        return None;
                    }

                    match std::fs::metadata(&path) {
                        Ok(metadata) => Some(Ok(RawEntry::file(path, metadata.len()))),
                        Err(e) => Some(Err(self.handle_io_error(&path, e))),
                    }
                }
                Err(e) => Some(Err(self.handle_walk_error(e))),
            })
    }

    /// List a symbolic link by its target.
    ///
    /// A link to a regular file is reported as a file of the target's size.
    /// Links to directories are never descended into, and dangling links
    /// have no content to compare; both are left out.
    fn resolve_symlink(&self, path: PathBuf) -> Option<Result<RawEntry, ScanError>> {
        match std::fs::metadata(&path) {
            Ok(metadata) if metadata.is_file() => Some(Ok(RawEntry::file(path, metadata.len()))),
            Ok(_) => {
                log::trace!("Skipping link to non-file: {}", path.display());
                None
            }
            Err(e) => {
                log::debug!("Skipping dangling link {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Handle I/O errors during metadata access.
    fn handle_io_error(&self, path: &Path, error: std::io::Error) -> ScanError {
        log::warn!("I/O error for {}: {}", path.display(), error);
        ScanError::io(path, error)
    }

    /// Handle walkdir errors.
    fn handle_walk_error(&self, error: walkdir::Error) -> ScanError {
        let path = error
            .path()
            .map_or_else(|| self.root.clone(), Path::to_path_buf);
        log::warn!("Walker error for {}: {}", path.display(), error);

        match error.into_io_error() {
            Some(io_error) => ScanError::io(path, io_error),
            None => ScanError::Walk {
                message: "filesystem loop detected".to_string(),
                path,
            },
        }
    }
}
