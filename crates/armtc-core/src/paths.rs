use dirs::home_dir;
use std::path::{Path, PathBuf};

/// Environment variable overriding the armtc home directory.
pub const HOME_ENV: &str = "ARMTC_HOME";

/// Returns the armtc home directory, or None if the user's home cannot be resolved.
///
/// `ARMTC_HOME` wins; otherwise `~/.armtc`.
pub fn try_armtc_home() -> Option<PathBuf> {
    if let Ok(val) = std::env::var(HOME_ENV) {
        return Some(PathBuf::from(val));
    }
    home_dir().map(|h| h.join(".armtc"))
}

/// Install root: <home>/toolchains
pub fn toolchains_path(home: &Path) -> PathBuf {
    home.join("toolchains")
}

/// Local cache root: <home>/cache
pub fn cache_path(home: &Path) -> PathBuf {
    home.join("cache")
}

/// Temp path: <home>/tmp (same volume as the install root)
pub fn tmp_path(home: &Path) -> PathBuf {
    home.join("tmp")
}

/// Extract the filename from a URL.
pub fn filename_from_url(url: &str) -> &str {
    url.split('/').next_back().unwrap_or("")
}
