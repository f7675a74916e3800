use anyhow::{Context, Result};
use armtc_core::{InstallConfig, UrlResolver};
use armtc_schema::Platform;

use crate::{platform_or_host, resolve_release_alias};

/// Print the distribution URL for a release.
pub fn url(release: &str, platform: Option<Platform>) -> Result<()> {
    let release = resolve_release_alias(release);
    let platform = platform_or_host(platform)?;

    let config = InstallConfig::from_env()
        .context("Could not determine the armtc home directory; set ARMTC_HOME")?;
    let dist = UrlResolver::with_base_url(config.base_url)
        .resolve(&release, platform)
        .with_context(|| format!("Failed to resolve LLVM {release} for {platform}"))?;

    println!("{}", dist.url);
    Ok(())
}
