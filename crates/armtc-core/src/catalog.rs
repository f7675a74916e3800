//! Static catalog of upstream toolchain releases.
//!
//! The table is append-only: new releases are added at the top. The latest
//! release is picked by semver ordering rather than by table position, so an
//! out-of-order insertion cannot silently change what "latest" means.

use semver::Version;

use crate::error::ResolveError;

/// First release that published macOS builds.
pub const DARWIN_SINCE: Version = Version::new(16, 0, 0);

/// The two earliest releases: short lowercase build tags, no `.sha256` sidecars.
const LEGACY_RELEASES: [Version; 2] = [Version::new(13, 0, 0), Version::new(14, 0, 0)];

/// A published release and the build tags it ships.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReleaseEntry {
    major: u64,
    minor: u64,
    patch: u64,
    /// Build tags used in the release's file names, in upstream order.
    pub build_tags: &'static [&'static str],
}

impl ReleaseEntry {
    const fn new(major: u64, minor: u64, patch: u64, build_tags: &'static [&'static str]) -> Self {
        Self {
            major,
            minor,
            patch,
            build_tags,
        }
    }

    /// The release's semantic version.
    pub fn version(&self) -> Version {
        Version::new(self.major, self.minor, self.patch)
    }

    /// Whether this release publishes a build with the given tag.
    pub fn supports(&self, build_tag: &str) -> bool {
        self.build_tags.contains(&build_tag)
    }
}

const RELEASES: &[ReleaseEntry] = &[
    ReleaseEntry::new(19, 1, 1, &["Darwin-universal", "Windows-x86_64", "Linux-x86_64"]),
    ReleaseEntry::new(18, 1, 3, &["Darwin-universal", "Windows-x86_64", "Linux-x86_64"]),
    ReleaseEntry::new(17, 0, 1, &["Darwin", "Windows-x86_64", "Linux-x86_64"]),
    ReleaseEntry::new(16, 0, 0, &["Darwin", "Windows-x86_64", "Linux-x86_64"]),
    ReleaseEntry::new(15, 0, 2, &["Windows-x86_64", "Linux-x86_64"]),
    ReleaseEntry::new(14, 0, 0, &["windows", "linux"]),
    ReleaseEntry::new(13, 0, 0, &["windows", "linux"]),
];

/// All catalog entries, newest first.
pub fn entries() -> Vec<ReleaseEntry> {
    let mut entries = RELEASES.to_vec();
    entries.sort_by_key(|e| std::cmp::Reverse(e.version()));
    entries
}

/// All known release identifiers, newest first.
pub fn available_versions() -> Vec<Version> {
    entries().iter().map(ReleaseEntry::version).collect()
}

/// The newest release in the catalog.
pub fn latest_version() -> Version {
    RELEASES
        .iter()
        .map(ReleaseEntry::version)
        .max()
        .unwrap_or(Version::new(0, 0, 0))
}

/// Look up a release by its identifier.
///
/// The identifier must parse as a semantic version and be present in the
/// catalog; anything else is an unknown release.
pub fn lookup(release: &str) -> Result<ReleaseEntry, ResolveError> {
    let unknown = || ResolveError::UnknownRelease {
        release: release.to_string(),
        available: available_versions()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", "),
    };

    let version = Version::parse(release.trim()).map_err(|_| unknown())?;
    RELEASES
        .iter()
        .find(|e| e.version() == version)
        .copied()
        .ok_or_else(unknown)
}

/// Whether the release published macOS builds.
pub fn has_darwin(release: &Version) -> bool {
    *release >= DARWIN_SINCE
}

/// Whether the release predates the capitalized `<Os>-<arch>` build tags.
pub fn is_legacy(release: &Version) -> bool {
    LEGACY_RELEASES.contains(release)
}

/// Whether upstream publishes a `.sha256` sidecar for the release.
pub fn has_checksum(release: &Version) -> bool {
    !is_legacy(release)
}
