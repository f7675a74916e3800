//! DMG handling via hdiutil

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use super::extract::ExtractError;

/// Represents a mounted DMG. Dropping this struct will detach the volume.
#[derive(Debug)]
pub struct MountPoint {
    pub path: PathBuf,
    detached: bool,
}

impl MountPoint {
    /// Detach now, reporting failure instead of swallowing it in `Drop`.
    pub fn detach(mut self) -> Result<(), ExtractError> {
        self.detached = true;
        detach(&self.path)
    }
}

impl Drop for MountPoint {
    fn drop(&mut self) {
        if !self.detached {
            let _ = detach(&self.path);
        }
    }
}

/// Attach a DMG file and return its mount point
pub fn attach(dmg_path: &Path) -> Result<MountPoint, ExtractError> {
    if !dmg_path.exists() {
        return Err(ExtractError::Mount(format!(
            "disk image not found: {}",
            dmg_path.display()
        )));
    }

    let output = Command::new("hdiutil")
        .arg("attach")
        .arg("-nobrowse")
        .arg("-readonly")
        .arg(dmg_path)
        .output()?;

    if !output.status.success() {
        return Err(ExtractError::Mount(format!(
            "hdiutil attach failed: {}",
            String::from_utf8_lossy(&output.stderr)
        )));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    parse_mount_point(&stdout)
        .map(|path| MountPoint {
            path,
            detached: false,
        })
        .ok_or_else(|| {
            ExtractError::Mount(format!(
                "could not find mount point in hdiutil output: {stdout}"
            ))
        })
}

/// Detach a volume
pub fn detach(mount_point: &Path) -> Result<(), ExtractError> {
    if !mount_point.starts_with("/Volumes") {
        return Err(ExtractError::Mount(format!(
            "refusing to detach {}: not under /Volumes",
            mount_point.display()
        )));
    }

    // Busy volumes often need a moment before they let go.
    for _ in 0..3 {
        let status = Command::new("hdiutil")
            .arg("detach")
            .arg(mount_point)
            .arg("-force")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        if status.is_ok_and(|s| s.success()) {
            return Ok(());
        }
        std::thread::sleep(std::time::Duration::from_millis(500));
    }

    Err(ExtractError::Mount(format!(
        "Failed to detach {}",
        mount_point.display()
    )))
}

/// Find the `/Volumes/...` mount point in `hdiutil attach` output.
///
/// Format: `/dev/diskXsY <TYPE> <MOUNTPOINT>`, tab or space separated.
fn parse_mount_point(stdout: &str) -> Option<PathBuf> {
    stdout.lines().find_map(|line| {
        line.find("/Volumes/")
            .map(|idx| PathBuf::from(line[idx..].trim()))
    })
}
