//! Content fingerprints for cache-busting filenames.
//!
//! A fingerprint is the full lowercase hex digest of a file's raw bytes.
//! Two algorithms are available:
//!
//! | Algorithm | Digest  | Hex length | Notes                                  |
//! |-----------|---------|------------|----------------------------------------|
//! | `md5`     | 128-bit | 32         | Default, matches legacy webapp names   |
//! | `blake3`  | 256-bit | 64         | Faster on large files                  |
//!
//! # Usage
//!
//! ```ignore
//! use crate::utils::hash::{HashAlgorithm, Fingerprint};
//!
//! let fp = Fingerprint::of_file(HashAlgorithm::Md5, Path::new("css/site.css"))?;
//! assert_eq!(fp.as_str().len(), 32);
//! ```

use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Digest algorithm used to fingerprint resources.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Md5,
    Blake3,
}

impl HashAlgorithm {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Blake3 => "blake3",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lowercase hex digest of a resource's bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    #[cfg(test)]
    pub(crate) fn of_bytes<T: AsRef<[u8]> + ?Sized>(algorithm: HashAlgorithm, data: &T) -> Self {
        let data = data.as_ref();
        let hex = match algorithm {
            HashAlgorithm::Md5 => hex::encode(Md5::digest(data)),
            HashAlgorithm::Blake3 => hex::encode(blake3::hash(data).as_bytes()),
        };
        Self(hex)
    }

    /// Fingerprint a reader (streaming, for large files).
    pub fn of_reader(algorithm: HashAlgorithm, mut reader: impl Read) -> io::Result<Self> {
        let mut buffer = [0u8; 8192];
        let hex = match algorithm {
            HashAlgorithm::Md5 => {
                let mut hasher = Md5::new();
                loop {
                    let n = reader.read(&mut buffer)?;
                    if n == 0 {
                        break;
                    }
                    hasher.update(&buffer[..n]);
                }
                hex::encode(hasher.finalize())
            }
            HashAlgorithm::Blake3 => {
                let mut hasher = blake3::Hasher::new();
                loop {
                    let n = reader.read(&mut buffer)?;
                    if n == 0 {
                        break;
                    }
                    hasher.update(&buffer[..n]);
                }
                hex::encode(hasher.finalize().as_bytes())
            }
        };
        Ok(Self(hex))
    }

    /// Fingerprint a file on disk.
    pub fn of_file(algorithm: HashAlgorithm, path: &Path) -> io::Result<Self> {
        Self::of_reader(algorithm, File::open(path)?)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[cfg(test)]
    pub(crate) fn from_hex(hex: &str) -> Self {
        Self(hex.to_string())
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
