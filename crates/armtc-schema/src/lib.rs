//! Shared value types for armtc.
//!
//! These types cross every crate boundary: the caller-facing [`Platform`],
//! the [`ArchiveFormat`] an upstream release is published in, and the
//! [`Sha256Hash`] used for integrity checks and cache validation.

pub mod format;
pub mod hash;
pub mod platform;

// Re-exports
pub use format::*;
pub use hash::*;
pub use platform::*;

/// Name of the sidecar file recording the archive digest inside an install.
pub const CHECKSUM_SIDECAR: &str = "sha256.txt";

/// Suffix appended to a distribution URL to locate its published checksum.
pub const CHECKSUM_URL_SUFFIX: &str = ".sha256";
