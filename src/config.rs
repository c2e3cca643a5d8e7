//! Scan configuration and layered loading.
//!
//! Settings are merged in priority order (lowest first):
//!
//! 1. Built-in defaults ([`ScanConfig::default`])
//! 2. A TOML config file (`--config PATH`, or `config.toml` in the platform
//!    config directory when present)
//! 3. `BLOCKDUPE_*` environment variables (e.g. `BLOCKDUPE_BLOCK_SIZE=8192`)
//! 4. Command-line flags ([`ConfigOverrides`])
//!
//! # Example
//!
//! ```no_run
//! use blockdupe::config::{ConfigOverrides, ScanConfig};
//! use std::path::PathBuf;
//!
//! let overrides = ConfigOverrides {
//!     root: Some(PathBuf::from("/data")),
//!     mask: Some("*.iso".to_string()),
//!     ..Default::default()
//! };
//! let config = ScanConfig::load(None, overrides).unwrap();
//! assert_eq!(config.mask, "*.iso");
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::scanner::HashAlgorithm;

/// Default block size used when hashing and caching file contents.
pub const DEFAULT_BLOCK_SIZE: u64 = 4096;

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "BLOCKDUPE_";

/// Errors raised while building or validating a configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The name mask did not translate into a valid regular expression.
    #[error("Invalid name pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The mask as given by the user
        pattern: String,
        /// The regex compilation error
        #[source]
        source: regex::Error,
    },

    /// The hash algorithm name is not recognized.
    #[error("Unknown hash algorithm '{value}' (expected crc32 or md5){}", did_you_mean(.suggestion))]
    UnknownAlgorithm {
        /// The rejected value
        value: String,
        /// Closest known algorithm name, if any is close enough
        suggestion: Option<String>,
    },

    /// Block size must be a positive number of bytes.
    #[error("Block size must be greater than zero")]
    InvalidBlockSize,

    /// Merging or extracting configuration layers failed.
    #[error("Failed to load configuration: {0}")]
    Load(#[from] figment::Error),
}

fn did_you_mean(suggestion: &Option<String>) -> String {
    suggestion
        .as_ref()
        .map(|s| format!(", did you mean '{s}'?"))
        .unwrap_or_default()
}

/// Either form of the `exclude` setting.
#[derive(Deserialize)]
#[serde(untagged)]
enum Suffixes {
    List(Vec<String>),
    Joined(String),
}

fn deserialize_suffixes<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Suffixes::deserialize(deserializer)? {
        Suffixes::List(list) => list,
        Suffixes::Joined(joined) => joined
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
    })
}

/// Options for one duplicate scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Directory to scan.
    pub root: PathBuf,
    /// Parent-directory suffixes to skip.
    ///
    /// Accepts a list, or a single comma-separated string as supplied by
    /// `BLOCKDUPE_EXCLUDE=tmp,cache`.
    #[serde(deserialize_with = "deserialize_suffixes")]
    pub exclude: Vec<String>,
    /// Scan depth: `0` restricts the scan to direct children of `root`.
    pub level: u32,
    /// Files smaller than this many bytes are ignored.
    pub min_size: u64,
    /// Shell-style file name mask (`*` any run, `?` exactly one character).
    pub mask: String,
    /// Chunk size for hashing and caching, in bytes.
    pub block_size: u64,
    /// Block hash algorithm.
    pub algorithm: HashAlgorithm,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            exclude: Vec::new(),
            level: 0,
            min_size: 1,
            mask: "*".to_string(),
            block_size: DEFAULT_BLOCK_SIZE,
            algorithm: HashAlgorithm::default(),
        }
    }
}

/// Values set explicitly on the command line.
///
/// Unset fields leave lower layers untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mask: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<HashAlgorithm>,
}

impl ScanConfig {
    /// Create a configuration for `root` with default options.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Default::default()
        }
    }

    /// Set the excluded parent-directory suffixes.
    #[must_use]
    pub fn with_exclude(mut self, exclude: Vec<String>) -> Self {
        self.exclude = exclude;
        self
    }

    /// Set the scan level (`0` = top-level files only).
    #[must_use]
    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    /// Set the minimum file size.
    #[must_use]
    pub fn with_min_size(mut self, min_size: u64) -> Self {
        self.min_size = min_size;
        self
    }

    /// Set the file name mask.
    #[must_use]
    pub fn with_mask(mut self, mask: impl Into<String>) -> Self {
        self.mask = mask.into();
        self
    }

    /// Set the block size.
    #[must_use]
    pub fn with_block_size(mut self, block_size: u64) -> Self {
        self.block_size = block_size;
        self
    }

    /// Set the hash algorithm.
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Whether only direct children of the root qualify.
    #[must_use]
    pub fn depth_restricted(&self) -> bool {
        self.level == 0
    }

    /// Check values that the type system cannot.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBlockSize`] if `block_size` is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.block_size == 0 {
            return Err(ConfigError::InvalidBlockSize);
        }
        Ok(())
    }

    /// Build the layered figment without extracting it.
    ///
    /// `config_file` takes precedence over the platform default path. A
    /// missing file contributes nothing.
    #[must_use]
    pub fn figment(config_file: Option<&Path>, overrides: ConfigOverrides) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(ScanConfig::default()));

        match config_file.map(Path::to_path_buf).or_else(default_config_path) {
            Some(path) => {
                log::debug!("Reading configuration from {}", path.display());
                figment = figment.merge(Toml::file(path));
            }
            None => log::debug!("No configuration file location available"),
        }

        figment
            .merge(Env::prefixed(ENV_PREFIX))
            .merge(Serialized::globals(overrides))
    }

    /// Load and validate the merged configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] if a layer cannot be parsed (including
    /// unknown algorithm names), or [`ConfigError::InvalidBlockSize`].
    pub fn load(config_file: Option<&Path>, overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        let config: ScanConfig = Self::figment(config_file, overrides).extract()?;
        config.validate()?;
        log::debug!("Effective configuration: {:?}", config);
        Ok(config)
    }
}

/// Platform-specific location of `config.toml`.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "blockdupe", "blockdupe")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}
