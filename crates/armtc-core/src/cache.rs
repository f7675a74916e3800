//! Key-value cache for extracted toolchains.
//!
//! Keys are opaque strings with exact-match semantics. A backend either
//! restores every path saved under a key or reports a miss; it never hands
//! back a partial entry.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("cache unavailable: {0}")]
    Unavailable(String),

    #[error("cache entry {0} already exists")]
    AlreadyExists(String),

    #[error("invalid cache key: {0:?}")]
    InvalidKey(String),

    #[error("cache IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Put/get-by-key store for directory trees.
#[async_trait]
pub trait ToolCache: Send + Sync {
    /// Restore `paths` saved under `key`. Returns the matched key on a hit.
    async fn restore(&self, paths: &[PathBuf], key: &str) -> Result<Option<String>, CacheError>;

    /// Save `paths` under `key`. Fails if the key is already present.
    async fn save(&self, paths: &[PathBuf], key: &str) -> Result<(), CacheError>;
}

/// A cache that never hits and silently drops saves.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

#[async_trait]
impl ToolCache for NoCache {
    async fn restore(&self, _: &[PathBuf], _: &str) -> Result<Option<String>, CacheError> {
        Ok(None)
    }

    async fn save(&self, _: &[PathBuf], _: &str) -> Result<(), CacheError> {
        Ok(())
    }
}

/// Directory-backed cache.
///
/// Layout: `<root>/<key>/<n>/` holds the contents of the n-th saved path.
#[derive(Debug, Clone)]
pub struct LocalCache {
    root: PathBuf,
}

impl LocalCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry_dir(&self, key: &str) -> Result<PathBuf, CacheError> {
        if key.is_empty() || key == "." || key == ".." || key.contains(['/', '\\']) {
            return Err(CacheError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(key))
    }
}

#[async_trait]
impl ToolCache for LocalCache {
    async fn restore(&self, paths: &[PathBuf], key: &str) -> Result<Option<String>, CacheError> {
        let entry = self.entry_dir(key)?;
        if !entry.is_dir() {
            debug!(%key, "cache miss");
            return Ok(None);
        }

        let paths = paths.to_vec();
        let entry_clone = entry.clone();
        tokio::task::spawn_blocking(move || restore_entry(&entry_clone, &paths))
            .await
            .map_err(std::io::Error::other)??;

        debug!(%key, entry = %entry.display(), "cache hit");
        Ok(Some(key.to_string()))
    }

    async fn save(&self, paths: &[PathBuf], key: &str) -> Result<(), CacheError> {
        let entry = self.entry_dir(key)?;
        if entry.exists() {
            return Err(CacheError::AlreadyExists(key.to_string()));
        }

        let staging = self
            .root
            .join(format!(".staging-{key}-{}", std::process::id()));
        let paths = paths.to_vec();
        let key_owned = key.to_string();
        tokio::task::spawn_blocking(move || save_entry(&staging, &entry, &paths, &key_owned))
            .await
            .map_err(std::io::Error::other)??;

        debug!(%key, "saved to cache");
        Ok(())
    }
}

fn copy_options() -> fs_extra::dir::CopyOptions {
    let mut options = fs_extra::dir::CopyOptions::new();
    options.content_only = true;
    options.overwrite = true;
    options
}

fn restore_entry(entry: &Path, paths: &[PathBuf]) -> Result<(), CacheError> {
    // Check every slot first so a damaged entry leaves the targets untouched.
    for i in 0..paths.len() {
        if !entry.join(i.to_string()).is_dir() {
            return Err(CacheError::Unavailable(format!(
                "entry {} is missing slot {i}",
                entry.display()
            )));
        }
    }

    for (i, target) in paths.iter().enumerate() {
        if target.exists() {
            std::fs::remove_dir_all(target)?;
        }
        std::fs::create_dir_all(target)?;
        fs_extra::dir::copy(entry.join(i.to_string()), target, &copy_options())
            .map_err(|e| CacheError::Unavailable(e.to_string()))?;
    }
    Ok(())
}

fn save_entry(
    staging: &Path,
    entry: &Path,
    paths: &[PathBuf],
    key: &str,
) -> Result<(), CacheError> {
    if staging.exists() {
        std::fs::remove_dir_all(staging)?;
    }

    let result = stage_and_commit(staging, entry, paths, key);
    if result.is_err() {
        let _ = std::fs::remove_dir_all(staging);
    }
    result
}

fn stage_and_commit(
    staging: &Path,
    entry: &Path,
    paths: &[PathBuf],
    key: &str,
) -> Result<(), CacheError> {
    for (i, source) in paths.iter().enumerate() {
        let slot = staging.join(i.to_string());
        std::fs::create_dir_all(&slot)?;
        fs_extra::dir::copy(source, &slot, &copy_options())
            .map_err(|e| CacheError::Unavailable(e.to_string()))?;
    }

    // The rename is the commit point; a concurrent writer loses here.
    std::fs::rename(staging, entry).map_err(|e| {
        if entry.exists() {
            CacheError::AlreadyExists(key.to_string())
        } else {
            CacheError::Io(e)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn populate(dir: &Path) {
        std::fs::create_dir_all(dir.join("bin")).unwrap();
        std::fs::write(dir.join("bin/clang"), b"elf").unwrap();
        std::fs::write(dir.join("sha256.txt"), b"abc").unwrap();
    }

    #[tokio::test]
    async fn test_save_then_restore() {
        let dir = tempdir().unwrap();
        let cache = LocalCache::new(dir.path().join("cache"));
        let install = dir.path().join("install");
        populate(&install);

        cache.save(&[install.clone()], "tool-1.0.0-linux").await.unwrap();
        std::fs::remove_dir_all(&install).unwrap();

        let matched = cache.restore(&[install.clone()], "tool-1.0.0-linux").await.unwrap();
        assert_eq!(matched.as_deref(), Some("tool-1.0.0-linux"));
        assert_eq!(std::fs::read(install.join("bin/clang")).unwrap(), b"elf");
        assert_eq!(std::fs::read(install.join("sha256.txt")).unwrap(), b"abc");
    }

    #[tokio::test]
    async fn test_restore_miss() {
        let dir = tempdir().unwrap();
        let cache = LocalCache::new(dir.path());
        let install = dir.path().join("install");

        let matched = cache.restore(&[install.clone()], "nothing-here").await.unwrap();
        assert_eq!(matched, None);
        assert!(!install.exists());
    }

    #[tokio::test]
    async fn test_prefix_key_is_not_a_hit() {
        let dir = tempdir().unwrap();
        let cache = LocalCache::new(dir.path().join("cache"));
        let install = dir.path().join("install");
        populate(&install);

        cache.save(&[install.clone()], "tool-19.1.1-linux").await.unwrap();
        let matched = cache.restore(&[install], "tool-19.1").await.unwrap();
        assert_eq!(matched, None);
    }

    #[tokio::test]
    async fn test_duplicate_save_rejected() {
        let dir = tempdir().unwrap();
        let cache = LocalCache::new(dir.path().join("cache"));
        let install = dir.path().join("install");
        populate(&install);

        cache.save(&[install.clone()], "key").await.unwrap();
        let err = cache.save(&[install], "key").await.unwrap_err();
        assert!(matches!(err, CacheError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_save_missing_source_leaves_no_entry() {
        let dir = tempdir().unwrap();
        let cache = LocalCache::new(dir.path().join("cache"));

        let result = cache.save(&[dir.path().join("missing")], "key").await;
        assert!(result.is_err());
        assert!(!cache.root().join("key").exists());
    }

    #[tokio::test]
    async fn test_invalid_keys() {
        let dir = tempdir().unwrap();
        let cache = LocalCache::new(dir.path());
        for key in ["", "..", "a/b"] {
            let err = cache.restore(&[], key).await.unwrap_err();
            assert!(matches!(err, CacheError::InvalidKey(_)), "{key}");
        }
    }

    #[tokio::test]
    async fn test_no_cache() {
        let paths = [PathBuf::from("/nonexistent")];
        assert_eq!(NoCache.restore(&paths, "k").await.unwrap(), None);
        NoCache.save(&paths, "k").await.unwrap();
    }
}
