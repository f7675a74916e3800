use std::path::Path;

use anyhow::{Context, Result};
use armtc_core::InstallError;
use armtc_core::locate::{CLANG, find_clang};
use armtc_schema::Platform;

use crate::platform_or_host;

/// Print the directory containing clang under `dir`.
pub fn find(dir: &Path, platform: Option<Platform>) -> Result<()> {
    let platform = platform_or_host(platform)?;
    let found = find_clang(dir, platform)
        .with_context(|| format!("Failed to search {}", dir.display()))?
        .ok_or_else(|| InstallError::ExecutableNotFound {
            name: platform.executable_name(CLANG),
            platform,
            root: dir.to_path_buf(),
        })?;

    println!("{}", found.display());
    Ok(())
}
