//! Block hashing with a selectable algorithm.
//!
//! # Overview
//!
//! Files are compared block by block, and each block is reduced to a digest
//! string before comparison. Two algorithms are available:
//!
//! - [`HashAlgorithm::Crc32`]: CRC-32 (IEEE), rendered as the decimal value
//! - [`HashAlgorithm::Md5`]: MD5, rendered as 32 uppercase hex characters
//!
//! # Example
//!
//! ```
//! use blockdupe::scanner::{BlockHasher, HashAlgorithm};
//!
//! let hasher = BlockHasher::new(HashAlgorithm::Md5);
//! assert_eq!(hasher.hash(b""), "D41D8CD98F00B204E9800998ECF8427E");
//!
//! let hasher = BlockHasher::new(HashAlgorithm::Crc32);
//! assert_eq!(hasher.hash(b""), "0");
//! ```

use std::fmt::{self, Write as _};
use std::str::FromStr;

use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Names accepted when parsing a [`HashAlgorithm`].
const ALGORITHM_NAMES: &[&str] = &["crc32", "md5"];

/// Hash algorithm used to digest file blocks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum HashAlgorithm {
    /// 32-bit CRC checksum. Fast, not collision resistant.
    #[default]
    Crc32,
    /// 128-bit MD5 digest.
    Md5,
}

impl HashAlgorithm {
    /// Canonical lowercase name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Crc32 => "crc32",
            Self::Md5 => "md5",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashAlgorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "");
        match normalized.as_str() {
            "crc32" => Ok(Self::Crc32),
            "md5" => Ok(Self::Md5),
            _ => {
                let suggestion = ALGORITHM_NAMES
                    .iter()
                    .map(|name| (name, strsim::jaro_winkler(&normalized, name)))
                    .filter(|(_, score)| *score > 0.7)
                    .max_by(|a, b| a.1.total_cmp(&b.1))
                    .map(|(name, _)| (*name).to_string());
                Err(ConfigError::UnknownAlgorithm {
                    value: s.to_string(),
                    suggestion,
                })
            }
        }
    }
}

impl TryFrom<String> for HashAlgorithm {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HashAlgorithm> for String {
    fn from(algorithm: HashAlgorithm) -> Self {
        algorithm.as_str().to_string()
    }
}

/// Computes block digests under one [`HashAlgorithm`].
///
/// The algorithm is fixed at construction; [`BlockHasher::hash`] is a pure
/// function of the input bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockHasher {
    algorithm: HashAlgorithm,
}

impl BlockHasher {
    /// Create a hasher for the given algorithm.
    #[must_use]
    pub fn new(algorithm: HashAlgorithm) -> Self {
        Self { algorithm }
    }

    /// The algorithm this hasher applies.
    #[must_use]
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Digest a block of bytes.
    ///
    /// Empty input is valid and yields the digest of the empty sequence.
    #[must_use]
    pub fn hash(&self, block: &[u8]) -> String {
        match self.algorithm {
            HashAlgorithm::Crc32 => crc32fast::hash(block).to_string(),
            HashAlgorithm::Md5 => {
                let digest = Md5::digest(block);
                digest
                    .iter()
                    .fold(String::with_capacity(32), |mut hex, byte| {
                        let _ = write!(hex, "{byte:02X}");
                        hex
                    })
            }
        }
    }
}
