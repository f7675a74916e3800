//! Install configuration.
//!
//! Everything is derived from the armtc home directory plus a handful of
//! environment overrides, so a CI job can relocate the whole layout with a
//! single variable.

use std::path::PathBuf;

use crate::paths;
use crate::resolver::DEFAULT_BASE_URL;

/// Name every cache key and install directory starts with.
pub const TOOL_NAME: &str = "llvm-embedded-toolchain-for-arm";

/// Environment variable overriding the release host.
pub const BASE_URL_ENV: &str = "ARMTC_BASE_URL";

/// Environment variable disabling the local cache (`0` / `false`).
pub const CACHE_ENV: &str = "ARMTC_CACHE";

/// Where and how an install request runs.
#[derive(Debug, Clone)]
pub struct InstallConfig {
    /// Tool name used as the cache key prefix
    pub tool_name: String,
    /// Directory install paths are created under
    pub install_root: PathBuf,
    /// Scratch space for downloaded archives
    pub tmp_dir: PathBuf,
    /// Directory backing the local cache
    pub cache_dir: PathBuf,
    /// Whether the local cache is consulted at all
    pub cache_enabled: bool,
    /// Release host URLs are resolved against
    pub base_url: String,
}

impl InstallConfig {
    /// Lay out every path under `home`.
    pub fn with_home(home: impl Into<PathBuf>) -> Self {
        let home = home.into();
        Self {
            tool_name: TOOL_NAME.to_string(),
            install_root: paths::toolchains_path(&home),
            tmp_dir: paths::tmp_path(&home),
            cache_dir: paths::cache_path(&home),
            cache_enabled: true,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Load configuration from the environment.
    ///
    /// Returns `None` if no home directory can be determined.
    pub fn from_env() -> Option<Self> {
        let mut config = Self::with_home(paths::try_armtc_home()?);

        if let Some(url) = std::env::var(BASE_URL_ENV)
            .ok()
            .filter(|u| !u.trim().is_empty())
        {
            config.base_url = url;
        }

        config.cache_enabled = std::env::var(CACHE_ENV)
            .map(|v| !(v == "0" || v.eq_ignore_ascii_case("false")))
            .unwrap_or(true);

        Some(config)
    }

    /// Cache key for a request: `<tool>-<release>-<platform>`.
    pub fn cache_key(&self, release: &str, platform: &str) -> String {
        format!("{}-{release}-{platform}", self.tool_name)
    }

    /// Deterministic install location for a cache key.
    pub fn install_path(&self, cache_key: &str) -> PathBuf {
        self.install_root.join(cache_key)
    }
}
