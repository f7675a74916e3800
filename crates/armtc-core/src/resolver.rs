//! Maps a (release, platform) pair to its upstream download URL.
//!
//! Resolution is pure: no network, no filesystem. Every naming convention
//! upstream changed across releases lives here:
//!
//! | Release        | Build tags                       | Prefix                        |
//! |----------------|----------------------------------|-------------------------------|
//! | 13.0.0, 14.0.0 | `windows`, `linux`               | `LLVMEmbeddedToolchainForArm` |
//! | ..= 17.0.1     | `Darwin`, `<Os>-x86_64`          | `LLVMEmbeddedToolchainForArm` |
//! | later          | `Darwin-universal`, `<Os>-x86_64` | `LLVM-ET-Arm`                |

use armtc_schema::{ArchiveFormat, CHECKSUM_URL_SUFFIX, Platform};
use semver::Version;
use serde::Serialize;

use crate::catalog;
use crate::error::ResolveError;

/// Upstream release host.
pub const DEFAULT_BASE_URL: &str =
    "https://github.com/ARM-software/LLVM-embedded-toolchain-for-Arm/releases/download";

/// Last release using the plain `Darwin` tag and the long file name prefix.
const LONG_PREFIX_UNTIL: Version = Version::new(17, 0, 1);

/// Last release published as `.tar.gz` on Linux and macOS.
const GZIP_UNTIL: Version = Version::new(16, 0, 0);

/// A resolved upstream artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Distribution {
    pub release: Version,
    pub platform: Platform,
    pub build_tag: &'static str,
    pub url: String,
    pub format: ArchiveFormat,
}

impl Distribution {
    /// URL of the published `.sha256` sidecar.
    pub fn checksum_url(&self) -> String {
        format!("{}{CHECKSUM_URL_SUFFIX}", self.url)
    }

    /// File name component of the URL.
    pub fn file_name(&self) -> &str {
        crate::paths::filename_from_url(&self.url)
    }
}

/// Resolves distributions against a release host.
#[derive(Debug, Clone)]
pub struct UrlResolver {
    base_url: String,
}

impl Default for UrlResolver {
    fn default() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }
}

impl UrlResolver {
    /// Resolve against a mirror or test server instead of upstream.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// The host URLs are composed against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve the distribution for `release` on `platform`.
    pub fn resolve(&self, release: &str, platform: Platform) -> Result<Distribution, ResolveError> {
        let entry = catalog::lookup(release)?;
        let version = entry.version();

        let unsupported = || ResolveError::UnsupportedPlatform {
            release: version.to_string(),
            platform: platform.to_string(),
        };

        let build_tag = build_tag(&version, platform).ok_or_else(unsupported)?;
        if !entry.supports(build_tag) {
            return Err(unsupported());
        }

        let format = archive_format(&version, platform);
        let prefix = if version <= LONG_PREFIX_UNTIL {
            "LLVMEmbeddedToolchainForArm"
        } else {
            "LLVM-ET-Arm"
        };

        let url = format!(
            "{}/release-{version}/{prefix}-{version}-{build_tag}.{}",
            self.base_url,
            format.extension()
        );

        Ok(Distribution {
            release: version,
            platform,
            build_tag,
            url,
            format,
        })
    }
}

/// Resolve the upstream download URL for `release` on `platform`.
pub fn distribution_url(release: &str, platform: Platform) -> Result<String, ResolveError> {
    UrlResolver::default()
        .resolve(release, platform)
        .map(|d| d.url)
}

fn build_tag(version: &Version, platform: Platform) -> Option<&'static str> {
    if catalog::is_legacy(version) {
        return match platform {
            Platform::Windows => Some("windows"),
            Platform::Linux => Some("linux"),
            Platform::Darwin => None,
        };
    }

    match platform {
        Platform::Darwin if *version <= LONG_PREFIX_UNTIL => Some("Darwin"),
        Platform::Darwin => Some("Darwin-universal"),
        Platform::Linux => Some("Linux-x86_64"),
        Platform::Windows => Some("Windows-x86_64"),
    }
}

fn archive_format(version: &Version, platform: Platform) -> ArchiveFormat {
    match platform {
        Platform::Windows => ArchiveFormat::Zip,
        _ if *version <= GZIP_UNTIL => ArchiveFormat::TarGz,
        Platform::Darwin => ArchiveFormat::Dmg,
        Platform::Linux => ArchiveFormat::TarXz,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = DEFAULT_BASE_URL;

    fn url(release: &str, platform: Platform) -> String {
        distribution_url(release, platform).unwrap()
    }

    #[test]
    fn legacy_windows() {
        assert_eq!(
            url("13.0.0", Platform::Windows),
            format!("{BASE}/release-13.0.0/LLVMEmbeddedToolchainForArm-13.0.0-windows.zip")
        );
    }

    #[test]
    fn legacy_linux() {
        assert_eq!(
            url("14.0.0", Platform::Linux),
            format!("{BASE}/release-14.0.0/LLVMEmbeddedToolchainForArm-14.0.0-linux.tar.gz")
        );
    }

    #[test]
    fn legacy_darwin_unsupported() {
        let err = distribution_url("13.0.0", Platform::Darwin).unwrap_err();
        assert_eq!(
            err,
            ResolveError::UnsupportedPlatform {
                release: "13.0.0".to_string(),
                platform: "darwin".to_string(),
            }
        );
    }

    #[test]
    fn windows_16() {
        assert_eq!(
            url("16.0.0", Platform::Windows),
            format!(
                "{BASE}/release-16.0.0/LLVMEmbeddedToolchainForArm-16.0.0-Windows-x86_64.zip"
            )
        );
    }

    #[test]
    fn darwin_16_is_gzip() {
        assert_eq!(
            url("16.0.0", Platform::Darwin),
            format!("{BASE}/release-16.0.0/LLVMEmbeddedToolchainForArm-16.0.0-Darwin.tar.gz")
        );
    }

    #[test]
    fn darwin_17_is_dmg_with_plain_tag() {
        assert_eq!(
            url("17.0.1", Platform::Darwin),
            format!("{BASE}/release-17.0.1/LLVMEmbeddedToolchainForArm-17.0.1-Darwin.dmg")
        );
    }

    #[test]
    fn linux_17_is_xz() {
        assert_eq!(
            url("17.0.1", Platform::Linux),
            format!(
                "{BASE}/release-17.0.1/LLVMEmbeddedToolchainForArm-17.0.1-Linux-x86_64.tar.xz"
            )
        );
    }

    #[test]
    fn newer_releases_use_short_prefix_and_universal_darwin() {
        assert_eq!(
            url("18.1.3", Platform::Darwin),
            format!("{BASE}/release-18.1.3/LLVM-ET-Arm-18.1.3-Darwin-universal.dmg")
        );
        assert_eq!(
            url("19.1.1", Platform::Linux),
            format!("{BASE}/release-19.1.1/LLVM-ET-Arm-19.1.1-Linux-x86_64.tar.xz")
        );
        assert_eq!(
            url("19.1.1", Platform::Windows),
            format!("{BASE}/release-19.1.1/LLVM-ET-Arm-19.1.1-Windows-x86_64.zip")
        );
    }

    #[test]
    fn tag_missing_from_release_is_unsupported() {
        assert!(matches!(
            distribution_url("15.0.2", Platform::Darwin),
            Err(ResolveError::UnsupportedPlatform { .. })
        ));
    }

    #[test]
    fn unknown_release() {
        assert!(matches!(
            distribution_url("99.0.0", Platform::Linux),
            Err(ResolveError::UnknownRelease { .. })
        ));
    }

    #[test]
    fn every_published_pair_resolves_consistently() {
        let resolver = UrlResolver::default();
        for version in catalog::available_versions() {
            let release = version.to_string();
            for platform in [Platform::Linux, Platform::Windows, Platform::Darwin] {
                let Ok(first) = resolver.resolve(&release, platform) else {
                    continue;
                };
                let second = resolver.resolve(&release, platform).unwrap();
                assert_eq!(first, second);

                let expected_ext = match platform {
                    Platform::Windows => "zip",
                    _ if version <= Version::new(16, 0, 0) => "tar.gz",
                    Platform::Darwin => "dmg",
                    Platform::Linux => "tar.xz",
                };
                assert!(
                    first.url.ends_with(&format!(".{expected_ext}")),
                    "{}",
                    first.url
                );
                assert_eq!(ArchiveFormat::from_url(&first.url), Some(first.format));
            }
        }
    }

    #[test]
    fn darwin_published_exactly_when_has_darwin() {
        let resolver = UrlResolver::default();
        for version in catalog::available_versions() {
            let resolved = resolver.resolve(&version.to_string(), Platform::Darwin);
            assert_eq!(resolved.is_ok(), catalog::has_darwin(&version), "{version}");
        }
    }

    #[test]
    fn custom_base_url_trims_trailing_slash() {
        let resolver = UrlResolver::with_base_url("http://127.0.0.1:1234/");
        let dist = resolver.resolve("19.1.1", Platform::Linux).unwrap();
        assert_eq!(
            dist.url,
            "http://127.0.0.1:1234/release-19.1.1/LLVM-ET-Arm-19.1.1-Linux-x86_64.tar.xz"
        );
        assert_eq!(dist.checksum_url(), format!("{}.sha256", dist.url));
        assert_eq!(dist.file_name(), "LLVM-ET-Arm-19.1.1-Linux-x86_64.tar.xz");
    }
}
