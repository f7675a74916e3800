//! Archive extraction module
//!
//! Handles zip, tar.gz, tar.xz and dmg. All four paths share one error type
//! and report failure the same way.

use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use armtc_schema::ArchiveFormat;
use async_trait::async_trait;
use thiserror::Error;
use zip::ZipArchive;

use super::dmg;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Archive error: {0}")]
    Archive(String),

    #[error("Disk image error: {0}")]
    Mount(String),
}

/// Unpacks a downloaded archive into a destination directory.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Extract `archive` (of `format`) into `dest`, returning the extracted root.
    async fn extract(
        &self,
        archive: &Path,
        format: ArchiveFormat,
        dest: &Path,
    ) -> Result<PathBuf, ExtractError>;
}

/// Extractor backed by the `zip`/`tar` crates and `hdiutil`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArchiveExtractor;

#[async_trait]
impl Extractor for ArchiveExtractor {
    async fn extract(
        &self,
        archive: &Path,
        format: ArchiveFormat,
        dest: &Path,
    ) -> Result<PathBuf, ExtractError> {
        let archive = archive.to_path_buf();
        let dest = dest.to_path_buf();
        tokio::task::spawn_blocking(move || extract(&archive, format, &dest))
            .await
            .map_err(io::Error::other)?
    }
}

/// Extract an archive synchronously, dispatching on `format`.
pub fn extract(
    archive_path: &Path,
    format: ArchiveFormat,
    dest_dir: &Path,
) -> Result<PathBuf, ExtractError> {
    let count = match format {
        ArchiveFormat::Zip => extract_zip(archive_path, dest_dir)?,
        ArchiveFormat::TarGz => extract_tar_gz(archive_path, dest_dir)?,
        ArchiveFormat::TarXz => extract_tar_xz(archive_path, dest_dir)?,
        ArchiveFormat::Dmg => extract_dmg(archive_path, dest_dir)?,
    };
    tracing::debug!(
        archive = %archive_path.display(),
        dest = %dest_dir.display(),
        %format,
        count,
        "extracted archive"
    );
    Ok(dest_dir.to_path_buf())
}

/// Extract a tar.gz archive to a destination directory
pub fn extract_tar_gz(archive_path: &Path, dest_dir: &Path) -> Result<usize, ExtractError> {
    let file = File::open(archive_path)?;
    let reader = BufReader::new(file);
    let gz_decoder = flate2::read::GzDecoder::new(reader);

    extract_tar(gz_decoder, dest_dir)
}

/// Extract a tar.xz archive to a destination directory
pub fn extract_tar_xz(archive_path: &Path, dest_dir: &Path) -> Result<usize, ExtractError> {
    let file = File::open(archive_path)?;
    let reader = BufReader::new(file);
    let xz_decoder = xz2::read::XzDecoder::new(reader);

    extract_tar(xz_decoder, dest_dir)
}

/// Extract a tar archive from a reader
fn extract_tar<R: Read>(reader: R, dest_dir: &Path) -> Result<usize, ExtractError> {
    fs::create_dir_all(dest_dir)?;

    let mut archive = tar::Archive::new(reader);
    archive.set_preserve_permissions(true);
    let mut count = 0;

    for entry in archive.entries()? {
        let mut entry = entry?;

        // unpack_in refuses paths escaping dest_dir (Zip Slip)
        if !entry.unpack_in(dest_dir)? {
            return Err(ExtractError::Archive(format!(
                "Invalid path in archive: {}",
                entry.path()?.display()
            )));
        }
        count += 1;
    }

    Ok(count)
}

/// Extract a zip archive
pub fn extract_zip(archive_path: &Path, dest_dir: &Path) -> Result<usize, ExtractError> {
    let file = File::open(archive_path)?;
    let mut archive = ZipArchive::new(file).map_err(|e| ExtractError::Archive(e.to_string()))?;

    fs::create_dir_all(dest_dir)?;
    let mut count = 0;

    for i in 0..archive.len() {
        let mut file = archive
            .by_index(i)
            .map_err(|e| ExtractError::Archive(e.to_string()))?;
        let Some(relative_path) = file.enclosed_name().map(|p| p.to_path_buf()) else {
            return Err(ExtractError::Archive(format!(
                "Invalid path in archive: {}",
                file.name()
            )));
        };

        let absolute_path = dest_dir.join(&relative_path);
        if file.is_dir() {
            fs::create_dir_all(&absolute_path)?;
            continue;
        }

        if let Some(p) = absolute_path.parent() {
            fs::create_dir_all(p)?;
        }

        let mut outfile = File::create(&absolute_path)?;
        io::copy(&mut file, &mut outfile)?;

        #[cfg(unix)]
        if let Some(mode) = file.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&absolute_path, fs::Permissions::from_mode(mode))?;
        }

        count += 1;
    }

    Ok(count)
}

/// Mount a disk image, copy its contents into `dest_dir`, and unmount it.
pub fn extract_dmg(archive_path: &Path, dest_dir: &Path) -> Result<usize, ExtractError> {
    let mount = dmg::attach(archive_path)?;
    fs::create_dir_all(dest_dir)?;

    let mut options = fs_extra::dir::CopyOptions::new();
    options.content_only = true;
    options.overwrite = true;

    // On failure the mount is dropped, which detaches it.
    fs_extra::dir::copy(&mount.path, dest_dir, &options)
        .map_err(|e| ExtractError::Archive(format!("copy from disk image failed: {e}")))?;

    mount.detach()?;
    Ok(fs::read_dir(dest_dir)?.count())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{write_tar_gz, write_tar_xz, write_zip};
    use tempfile::tempdir;

    #[test]
    fn test_extract_tar_gz() {
        let dir = tempdir().unwrap();
        let archive = dir.path().join("tc.tar.gz");
        write_tar_gz(&archive, &[("tc/bin/clang", b"elf")]);

        let dest = dir.path().join("out");
        let root = extract(&archive, ArchiveFormat::TarGz, &dest).unwrap();

        assert_eq!(root, dest);
        assert_eq!(fs::read(dest.join("tc/bin/clang")).unwrap(), b"elf");
    }

    #[test]
    fn test_extract_tar_xz() {
        let dir = tempdir().unwrap();
        let archive = dir.path().join("tc.tar.xz");
        write_tar_xz(&archive, &[("tc/bin/clang", b"elf"), ("tc/README", b"hi")]);

        let dest = dir.path().join("out");
        let count = extract_tar_xz(&archive, &dest).unwrap();

        assert_eq!(count, 2);
        assert!(dest.join("tc/bin/clang").is_file());
        assert!(dest.join("tc/README").is_file());
    }

    #[cfg(unix)]
    #[test]
    fn test_extract_tar_preserves_exec_bit() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let archive = dir.path().join("tc.tar.gz");
        write_tar_gz(&archive, &[("bin/clang", b"elf")]);

        let dest = dir.path().join("out");
        extract_tar_gz(&archive, &dest).unwrap();

        let mode = fs::metadata(dest.join("bin/clang")).unwrap().permissions().mode();
        assert_ne!(mode & 0o111, 0);
    }

    #[test]
    fn test_extract_zip() {
        let dir = tempdir().unwrap();
        let archive = dir.path().join("tc.zip");
        write_zip(&archive, &[("tc/bin/clang.exe", b"pe")]);

        let dest = dir.path().join("out");
        extract(&archive, ArchiveFormat::Zip, &dest).unwrap();

        assert_eq!(fs::read(dest.join("tc/bin/clang.exe")).unwrap(), b"pe");
    }

    #[test]
    fn test_corrupt_zip_is_archive_error() {
        let dir = tempdir().unwrap();
        let archive = dir.path().join("bad.zip");
        fs::write(&archive, b"definitely not a zip").unwrap();

        let err = extract_zip(&archive, &dir.path().join("out")).unwrap_err();
        assert!(matches!(err, ExtractError::Archive(_)));
    }

    #[test]
    fn test_missing_archive_is_io_error() {
        let dir = tempdir().unwrap();
        let err = extract_tar_gz(&dir.path().join("missing.tar.gz"), dir.path()).unwrap_err();
        assert!(matches!(err, ExtractError::Io(_)));
    }

    #[test]
    fn test_dmg_failure_propagates() {
        let dir = tempdir().unwrap();
        let err = extract(
            &dir.path().join("missing.dmg"),
            ArchiveFormat::Dmg,
            &dir.path().join("out"),
        )
        .unwrap_err();
        assert!(matches!(err, ExtractError::Mount(_)));
    }

    #[tokio::test]
    async fn test_archive_extractor_runs_off_thread() {
        let dir = tempdir().unwrap();
        let archive = dir.path().join("tc.tar.gz");
        write_tar_gz(&archive, &[("bin/clang", b"elf")]);

        let dest = dir.path().join("out");
        let root = ArchiveExtractor
            .extract(&archive, ArchiveFormat::TarGz, &dest)
            .await
            .unwrap();
        assert!(root.join("bin/clang").is_file());
    }
}
