use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use armtc_core::locate::{CLANG, find_clang};
use armtc_core::{
    ArchiveExtractor, InstallConfig, InstallError, Installer, LocalCache, NoCache, ToolCache,
};
use armtc_schema::Platform;
use tracing::info;

use crate::github::WorkflowFiles;
use crate::ui::ConsoleReporter;
use crate::{platform_or_host, resolve_release_alias};

/// Environment variable names to export alongside the step outputs.
#[derive(Debug, Clone, Default)]
pub struct ExportVars {
    pub path: Option<String>,
    pub toolchain: Option<String>,
}

/// Install a release and publish where its clang lives.
pub async fn install(
    release: &str,
    platform: Option<Platform>,
    exports: &ExportVars,
    no_cache: bool,
) -> Result<()> {
    let release = resolve_release_alias(release);
    let platform = platform_or_host(platform)?;

    let mut config = InstallConfig::from_env()
        .context("Could not determine the armtc home directory; set ARMTC_HOME")?;
    if no_cache {
        config.cache_enabled = false;
    }
    info!(%release, %platform, home = %config.install_root.display(), "Install requested");

    let cache: Arc<dyn ToolCache> = if config.cache_enabled {
        Arc::new(LocalCache::new(config.cache_dir.clone()))
    } else {
        Arc::new(NoCache)
    };
    let installer = Installer::new(config, cache, Arc::new(ArchiveExtractor))?
        .with_reporter(Arc::new(ConsoleReporter::new()));

    let installed = installer
        .install(&release, platform)
        .await
        .with_context(|| format!("Failed to install LLVM {release} for {platform}"))?;

    let clang_dir = find_clang(&installed.path, platform)
        .with_context(|| format!("Failed to search {}", installed.path.display()))?
        .ok_or_else(|| InstallError::ExecutableNotFound {
            name: platform.executable_name(CLANG),
            platform,
            root: installed.path.clone(),
        })?;
    let toolchain = clang_dir.parent().unwrap_or(&clang_dir);

    println!("path={}", clang_dir.display());
    println!("toolchain={}", toolchain.display());

    publish(&WorkflowFiles::from_env(), &clang_dir, toolchain, exports)
}

/// Write the install result into the workflow files, if any.
pub fn publish(
    workflow: &WorkflowFiles,
    clang_dir: &Path,
    toolchain: &Path,
    exports: &ExportVars,
) -> Result<()> {
    let clang_dir_str = clang_dir.to_string_lossy();
    let toolchain_str = toolchain.to_string_lossy();

    workflow.add_path(clang_dir)?;
    workflow.set_output("path", &clang_dir_str)?;
    if let Some(name) = exports.path.as_deref().filter(|n| !n.is_empty()) {
        workflow.export_variable(name, &clang_dir_str)?;
    }

    workflow.set_output("toolchain", &toolchain_str)?;
    if let Some(name) = exports.toolchain.as_deref().filter(|n| !n.is_empty()) {
        workflow.export_variable(name, &toolchain_str)?;
    }
    Ok(())
}
