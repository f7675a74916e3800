//! Archive formats upstream releases are published in.

use std::path::Path;

/// Archive container an upstream release is published in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArchiveFormat {
    /// `.zip` (all Windows releases)
    Zip,
    /// `.tar.gz` (releases up to 16.0.0)
    TarGz,
    /// `.tar.xz` (newer Linux releases)
    TarXz,
    /// `.dmg` (newer macOS releases)
    Dmg,
}

impl ArchiveFormat {
    /// File extension, without the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Zip => "zip",
            Self::TarGz => "tar.gz",
            Self::TarXz => "tar.xz",
            Self::Dmg => "dmg",
        }
    }

    /// Detect the format from a file name or URL.
    ///
    /// Returns `None` for anything we have no extractor for.
    pub fn detect(path: &Path) -> Option<Self> {
        let path_str = path.to_string_lossy().to_lowercase();

        if path_str.ends_with(".zip") {
            Some(Self::Zip)
        } else if path_str.ends_with(".tar.gz") || path_str.ends_with(".tgz") {
            Some(Self::TarGz)
        } else if path_str.ends_with(".tar.xz") || path_str.ends_with(".txz") {
            Some(Self::TarXz)
        } else if path_str.ends_with(".dmg") {
            Some(Self::Dmg)
        } else {
            None
        }
    }

    /// Detect the format from a URL string.
    pub fn from_url(url: &str) -> Option<Self> {
        Self::detect(Path::new(url))
    }
}

impl std::fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}
