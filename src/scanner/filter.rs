//! Candidate selection from a raw directory listing.
//!
//! A [`RawEntry`] becomes a [`FileCandidate`] only if it passes every rule:
//!
//! 1. it is a regular file;
//! 2. with depth restriction, its parent is exactly the root;
//! 3. its parent path does not end with an excluded suffix;
//! 4. its size is at least the minimum;
//! 5. its file name fully matches the name mask.
//!
//! # Name masks
//!
//! Masks use shell-style wildcards, translated to an anchored regex:
//! `.` is literal, `*` matches any run of characters (including none) and
//! `?` matches exactly one character. Other characters pass through to the
//! regex unchanged, so `[0-9]` is a character class and an unbalanced `(`
//! is a configuration error.
//!
//! ```
//! use blockdupe::scanner::NamePattern;
//!
//! let pattern = NamePattern::new("report?.csv").unwrap();
//! assert!(pattern.matches("report1.csv"));
//! assert!(!pattern.matches("report.csv"));
//! assert!(!pattern.matches("report12.csv"));
//! ```

use std::path::{Path, PathBuf};

use regex::Regex;

use super::{FileCandidate, RawEntry, ScanError};
use crate::config::{ConfigError, ScanConfig};

/// A compiled shell-style file name mask.
#[derive(Debug, Clone)]
pub struct NamePattern {
    mask: String,
    regex: Regex,
}

impl NamePattern {
    /// Compile a mask.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPattern`] if the translated expression
    /// does not compile.
    pub fn new(mask: &str) -> Result<Self, ConfigError> {
        let translated = translate_mask(mask);
        log::trace!("Name mask '{}' translated to '{}'", mask, translated);
        let regex = Regex::new(&translated).map_err(|source| ConfigError::InvalidPattern {
            pattern: mask.to_string(),
            source,
        })?;
        Ok(Self {
            mask: mask.to_string(),
            regex,
        })
    }

    /// The mask as given.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.mask
    }

    /// Whether `name` matches the whole mask.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }
}

/// Translate a wildcard mask into an anchored regular expression.
fn translate_mask(mask: &str) -> String {
    let mut translated = String::with_capacity(mask.len() + 8);
    translated.push_str("^(?:");
    for c in mask.chars() {
        match c {
            '*' => translated.push_str(".*"),
            '?' => translated.push('.'),
            '.' => translated.push_str("\\."),
            _ => translated.push(c),
        }
    }
    translated.push_str(")$");
    translated
}

/// Decides which listed files qualify for comparison.
#[derive(Debug, Clone)]
pub struct CandidateFilter {
    root: PathBuf,
    depth_restricted: bool,
    exclude: Vec<String>,
    min_size: u64,
    pattern: NamePattern,
}

impl CandidateFilter {
    /// Build a filter from the scan options.
    ///
    /// # Errors
    ///
    /// Fails fast with [`ConfigError::InvalidPattern`] on a bad mask.
    pub fn new(config: &ScanConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            root: config.root.clone(),
            depth_restricted: config.depth_restricted(),
            exclude: config.exclude.clone(),
            min_size: config.min_size,
            pattern: NamePattern::new(&config.mask)?,
        })
    }

    /// Whether `parent` ends with one of the excluded suffixes.
    fn is_excluded(&self, parent: &Path) -> bool {
        let parent = parent.to_string_lossy();
        self.exclude
            .iter()
            .any(|suffix| parent.ends_with(suffix.as_str()))
    }

    /// Check one entry against every inclusion rule.
    #[must_use]
    pub fn accepts(&self, entry: &RawEntry) -> bool {
        if entry.is_dir {
            return false;
        }

        if self.depth_restricted && entry.parent != self.root {
            log::trace!("Skipping nested file: {}", entry.path.display());
            return false;
        }

        if self.is_excluded(&entry.parent) {
            log::trace!("Skipping file in excluded directory: {}", entry.path.display());
            return false;
        }

        if entry.size < self.min_size {
            log::trace!(
                "Skipping file due to size filter ({}): {}",
                entry.size,
                entry.path.display()
            );
            return false;
        }

        let name = entry
            .path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        if !self.pattern.matches(&name) {
            log::trace!("Skipping file due to name mask: {}", entry.path.display());
            return false;
        }

        true
    }

    /// Filter a listing into candidates, preserving its order.
    ///
    /// # Errors
    ///
    /// The first traversal error aborts filtering and is returned.
    pub fn filter(
        &self,
        entries: impl IntoIterator<Item = Result<RawEntry, ScanError>>,
    ) -> Result<Vec<FileCandidate>, ScanError> {
        let mut candidates = Vec::new();
        for entry in entries {
            let entry = entry?;
            if self.accepts(&entry) {
                log::debug!("Candidate: {}", entry.path.display());
                candidates.push(FileCandidate::from(entry));
            }
        }
        Ok(candidates)
    }
}
