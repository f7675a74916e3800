//! The install pipeline: cache check, download, verify, extract, cache save.
//!
//! ```text
//! CHECK_CACHE ─hit─▶ VALIDATE_CACHE ─valid─▶ DONE
//!      │                   │
//!     miss             stale/unknown
//!      ▼                   ▼
//!   DOWNLOAD ──▶ VERIFY_DOWNLOAD ──▶ EXTRACT ──▶ PERSIST_CACHE ──▶ DONE
//! ```
//!
//! Cache failures are downgraded to warnings in both directions. Catalog,
//! network and integrity failures abort the request.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use armtc_schema::{ArchiveFormat, CHECKSUM_SIDECAR, Platform, Sha256Hash};
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::cache::ToolCache;
use crate::catalog;
use crate::config::InstallConfig;
use crate::error::InstallError;
use crate::integrity::{IntegrityChecker, Verification, verify};
use crate::io::download::{DownloadError, download_to_file};
use crate::io::extract::Extractor;
use crate::reporter::{NullReporter, Reporter};
use crate::resolver::{Distribution, UrlResolver};

/// Result of a successful install request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Installed {
    /// Extracted toolchain root
    pub path: PathBuf,
    /// Digest recorded in the install's sidecar, if one is known
    pub sha256: Option<Sha256Hash>,
    /// Whether the request was served from cache without downloading
    pub from_cache: bool,
}

/// Runs install requests against a cache and an extractor.
pub struct Installer {
    config: InstallConfig,
    resolver: UrlResolver,
    checker: IntegrityChecker,
    client: Client,
    cache: Arc<dyn ToolCache>,
    extractor: Arc<dyn Extractor>,
    reporter: Arc<dyn Reporter>,
}

impl std::fmt::Debug for Installer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Installer")
            .field("config", &self.config)
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}

impl Installer {
    /// Build an installer. Fails only if the HTTP clients cannot be built.
    pub fn new(
        config: InstallConfig,
        cache: Arc<dyn ToolCache>,
        extractor: Arc<dyn Extractor>,
    ) -> Result<Self, InstallError> {
        let resolver = UrlResolver::with_base_url(config.base_url.clone());
        let checker = IntegrityChecker::new().map_err(|e| InstallError::network(resolver.base_url(), e))?;
        let client = Client::builder()
            .user_agent(crate::USER_AGENT)
            .build()
            .map_err(|e| InstallError::network(resolver.base_url(), e))?;

        Ok(Self {
            config,
            resolver,
            checker,
            client,
            cache,
            extractor,
            reporter: Arc::new(NullReporter),
        })
    }

    /// Route progress and status messages to `reporter`.
    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Install `release` for `platform`, reusing a valid cached copy if present.
    pub async fn install(&self, release: &str, platform: Platform) -> Result<Installed, InstallError> {
        let dist = self.resolver.resolve(release, platform)?;
        let release = dist.release.to_string();

        let cache_key = self.config.cache_key(&release, platform.as_str());
        let install_path = self.config.install_path(&cache_key);
        debug!(%cache_key, install_path = %install_path.display(), "Cache key");

        if let Some(installed) = self.try_cache(&dist, &cache_key, &install_path).await? {
            self.reporter.done(&dist, &installed.path, true);
            return Ok(installed);
        }

        self.reporter.section("Downloading");
        self.reporter
            .info(&format!("Cache miss, downloading LLVM {release} from {}", dist.url));
        let tmp = self.scratch_dir()?;
        let archive_path = tmp.path().join(dist.file_name());
        let download_hash = download_to_file(&self.client, &dist, &archive_path, &*self.reporter)
            .await
            .map_err(|e| match e {
                DownloadError::Http(source) => InstallError::network(&dist.url, source),
                DownloadError::Io(source) => InstallError::Io(source),
            })?;
        info!(sha256 = %download_hash, "Downloaded {}", dist.file_name());

        let expected = if catalog::has_checksum(&dist.release) {
            Some(self.checker.get_checksum(&dist).await?)
        } else {
            debug!(%release, "No published checksum, skipping verification");
            None
        };
        if let Verification::Mismatch { expected, actual } = verify(expected.as_ref(), &download_hash) {
            return Err(InstallError::Integrity {
                url: dist.url.clone(),
                expected: expected.to_string(),
                actual: actual.to_string(),
            });
        }

        let format = ArchiveFormat::from_url(&dist.url).ok_or_else(|| {
            InstallError::UnsupportedArchive {
                url: dist.url.clone(),
            }
        })?;

        self.reporter.section("Extracting");
        if install_path.exists() {
            // Left behind by a rejected cache hit.
            tokio::fs::remove_dir_all(&install_path).await?;
        }
        let extracted = self
            .extractor
            .extract(&archive_path, format, &install_path)
            .await
            .map_err(|source| InstallError::Extract {
                url: dist.url.clone(),
                source,
            })?;

        tokio::fs::write(extracted.join(CHECKSUM_SIDECAR), download_hash.as_str()).await?;

        info!(path = %extracted.display(), "Adding to cache");
        if let Err(e) = self.cache.save(&[extracted.clone()], &cache_key).await {
            warn!(error = %e, %cache_key, "Could not save to the cache");
            self.reporter
                .warning(&format!("Could not save to the cache: {e}"));
        }

        self.reporter.done(&dist, &extracted, false);
        Ok(Installed {
            path: extracted,
            sha256: Some(download_hash),
            from_cache: false,
        })
    }

    /// Restore and validate a cached install. `None` means download.
    async fn try_cache(
        &self,
        dist: &Distribution,
        cache_key: &str,
        install_path: &Path,
    ) -> Result<Option<Installed>, InstallError> {
        let matched = match self.cache.restore(&[install_path.to_path_buf()], cache_key).await {
            Ok(matched) => matched,
            Err(e) => {
                warn!(error = %e, %cache_key, "Could not restore from the cache");
                self.reporter
                    .warning(&format!("Could not find contents in the cache: {e}"));
                None
            }
        };
        debug!(?matched, "Matched cache restore key");

        if matched.as_deref() != Some(cache_key) {
            return Ok(None);
        }
        info!(path = %install_path.display(), "Cache found");

        if !catalog::has_checksum(&dist.release) {
            return Ok(Some(Installed {
                path: install_path.to_path_buf(),
                sha256: read_sidecar(install_path).await,
                from_cache: true,
            }));
        }

        let cached = read_sidecar(install_path).await;
        let expected = self.checker.get_checksum(dist).await?;

        match cached {
            Some(cached) if cached == expected => {
                info!("Cached version loaded");
                Ok(Some(Installed {
                    path: install_path.to_path_buf(),
                    sha256: Some(cached),
                    from_cache: true,
                }))
            }
            Some(cached) => {
                warn!(%cached, %expected, "Cached version SHA256 does not match");
                self.reporter.warning(&format!(
                    "Cached version SHA256 does not match: {cached} != {expected}"
                ));
                Ok(None)
            }
            None => {
                self.reporter
                    .warning("SHA256 not found in cached installation");
                Ok(None)
            }
        }
    }

    fn scratch_dir(&self) -> Result<tempfile::TempDir, InstallError> {
        std::fs::create_dir_all(&self.config.tmp_dir)?;
        Ok(tempfile::Builder::new()
            .prefix("armtc-download-")
            .tempdir_in(&self.config.tmp_dir)?)
    }
}

/// Read the digest recorded next to an install. Missing or unreadable is `None`.
async fn read_sidecar(install_path: &Path) -> Option<Sha256Hash> {
    let path = install_path.join(CHECKSUM_SIDECAR);
    match tokio::fs::read_to_string(&path).await {
        Ok(contents) => Sha256Hash::from_sidecar(&contents),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Could not read the cached SHA256");
            None
        }
    }
}
