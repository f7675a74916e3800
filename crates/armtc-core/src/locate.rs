//! Locating executables inside an extracted toolchain.

use std::io;
use std::path::{Path, PathBuf};

use armtc_schema::Platform;
use walkdir::WalkDir;

/// Executable the install is expected to provide.
pub const CLANG: &str = "clang";

/// Find the directory containing `clang` (`clang.exe` on Windows) under `root`.
///
/// Returns `Ok(None)` when the whole tree was searched without a match.
/// Unreadable directories are errors, not misses.
pub fn find_clang(root: &Path, platform: Platform) -> io::Result<Option<PathBuf>> {
    find_executable(root, &platform.executable_name(CLANG))
}

/// Depth-first search for an entry named `name`; returns its parent directory.
///
/// Entries are visited in file-name order. Symlinks are not followed, but a
/// symlink named `name` matches (toolchains often ship `clang` as a link to
/// the versioned binary).
pub fn find_executable(root: &Path, name: &str) -> io::Result<Option<PathBuf>> {
    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_dir() || entry.file_name() != name {
            continue;
        }
        return Ok(entry.path().parent().map(Path::to_path_buf));
    }
    Ok(None)
}
