//! armtc - Arm LLVM Embedded Toolchain installer
#![allow(missing_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
//!
//! Installs a release of the Arm LLVM Embedded Toolchain, reusing a cached
//! copy when its recorded SHA256 still matches the published one.
//!
//! # Directory Layout
//!
//! ```text
//! ~/.armtc/
//! ├── toolchains/  # One extracted tree per <tool>-<release>-<platform>
//! ├── cache/       # Local cache entries, same keys
//! └── tmp/         # Download scratch space
//! ```

pub mod cmd;
pub mod github;
pub mod ui;

pub use armtc_core::USER_AGENT;

use armtc_schema::Platform;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Release alias resolved to the newest catalog entry.
pub const LATEST: &str = "latest";

#[derive(Debug, Parser)]
#[command(name = "armtc")]
#[command(author, version, about = "Install the Arm LLVM Embedded Toolchain")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Download, verify and extract a toolchain release
    Install {
        /// Release to install, or "latest"
        #[arg(long, short, env = "ARMTC_RELEASE", default_value = LATEST)]
        release: String,
        /// Target platform (linux, win32, darwin); defaults to the host
        #[arg(long, short)]
        platform: Option<Platform>,
        /// Also export the clang directory under this environment variable
        #[arg(long)]
        path_env_var: Option<String>,
        /// Also export the toolchain root under this environment variable
        #[arg(long)]
        toolchain_env_var: Option<String>,
        /// Skip the local cache for this run
        #[arg(long)]
        no_cache: bool,
    },
    /// List known releases
    List {
        /// Print machine-readable JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the download URL for a release
    Url {
        /// Release to resolve, or "latest"
        #[arg(long, short, default_value = LATEST)]
        release: String,
        /// Target platform (linux, win32, darwin); defaults to the host
        #[arg(long, short)]
        platform: Option<Platform>,
    },
    /// Find the directory containing clang under an extracted toolchain
    Find {
        /// Extracted toolchain root
        dir: PathBuf,
        /// Platform whose executable naming applies; defaults to the host
        #[arg(long, short)]
        platform: Option<Platform>,
    },
}

/// Map the "latest" alias to a concrete release identifier.
pub fn resolve_release_alias(release: &str) -> String {
    if release.trim().is_empty() || release == LATEST {
        armtc_core::catalog::latest_version().to_string()
    } else {
        release.to_string()
    }
}

/// The requested platform, falling back to the host.
pub fn platform_or_host(platform: Option<Platform>) -> anyhow::Result<Platform> {
    platform
        .or_else(Platform::current)
        .ok_or_else(|| anyhow::anyhow!("host platform is not supported; pass --platform"))
}
