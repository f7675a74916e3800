//! Domain-specific errors for catalog resolution and installs

use std::path::PathBuf;

use armtc_schema::Platform;
use thiserror::Error;

use crate::io::extract::ExtractError;

/// Failures mapping a (release, platform) pair to a distribution.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("invalid LLVM version {release}. Available: {available}")]
    UnknownRelease { release: String, available: String },

    #[error("platform {platform} is not supported for version {release}")]
    UnsupportedPlatform { release: String, platform: String },
}

/// Failures of a single install request.
///
/// Cache failures never appear here: they are logged and downgraded.
#[derive(Error, Debug)]
pub enum InstallError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("network error fetching {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("checksum file at {url} is empty")]
    EmptyChecksum { url: String },

    #[error(
        "downloaded SHA256 doesn't match expected value for {url}: {actual} != {expected}"
    )]
    Integrity {
        url: String,
        expected: String,
        actual: String,
    },

    #[error("can't decompress {url}: no extractor for this archive type")]
    UnsupportedArchive { url: String },

    #[error("failed to extract {url}: {source}")]
    Extract {
        url: String,
        #[source]
        source: ExtractError,
    },

    #[error("could not find {name} for {platform} under {}", root.display())]
    ExecutableNotFound {
        name: String,
        platform: Platform,
        root: PathBuf,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl InstallError {
    pub(crate) fn network(url: &str, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.to_string(),
            source,
        }
    }
}
