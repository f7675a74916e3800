//! SHA256 digests for integrity checks.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Newtype for a SHA256 hash string (hex encoded).
///
/// Comparison is a plain string comparison: a published checksum and a
/// locally computed one are equal only if they are byte-for-byte identical.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sha256Hash(String);

impl Sha256Hash {
    /// Create a new `Sha256Hash` without validation.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Hash an in-memory buffer.
    pub fn compute(data: &[u8]) -> Self {
        Self(hex::encode(Sha256::digest(data)))
    }

    /// Finish a streaming hasher.
    pub fn from_hasher(hasher: Sha256) -> Self {
        Self(hex::encode(hasher.finalize()))
    }

    /// Parse a published checksum file.
    ///
    /// These follow the `sha256sum` layout (`<hash>  <filename>`), so only the
    /// first whitespace-delimited token is kept. Returns `None` for an empty
    /// body.
    pub fn from_checksum_file(body: &str) -> Option<Self> {
        body.split_whitespace().next().map(Self::new)
    }

    /// Parse the contents of an install's `sha256.txt` sidecar.
    ///
    /// Surrounding whitespace is ignored. Returns `None` if nothing is left.
    pub fn from_sidecar(contents: &str) -> Option<Self> {
        let trimmed = contents.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self::new(trimmed))
        }
    }

    /// Return the inner hex string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Sha256Hash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
