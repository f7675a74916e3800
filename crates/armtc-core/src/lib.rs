//! Core library for armtc.
//!
//! Maps an Arm LLVM Embedded Toolchain release to its upstream archive,
//! downloads and verifies it, and extracts it into a reusable location.

pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod install;
pub mod integrity;
pub mod io;
pub mod locate;
pub mod paths;
pub mod reporter;
pub mod resolver;

#[cfg(test)]
mod testutil;

pub use cache::{CacheError, LocalCache, NoCache, ToolCache};
pub use config::InstallConfig;
pub use error::{InstallError, ResolveError};
pub use install::{Installed, Installer};
pub use integrity::{IntegrityChecker, Verification, verify};
pub use io::extract::{ArchiveExtractor, ExtractError, Extractor};
pub use locate::{find_clang, find_executable};
pub use paths::*;
pub use reporter::{NullReporter, Reporter};
pub use resolver::{DEFAULT_BASE_URL, Distribution, UrlResolver, distribution_url};

/// User-Agent sent with every request.
pub const USER_AGENT: &str = concat!("armtc/", env!("CARGO_PKG_VERSION"));
