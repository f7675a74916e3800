//! Caller-facing operating system identifiers.

use thiserror::Error;

/// Operating system a toolchain is installed for.
///
/// Upstream publishes builds for Linux, Windows and (from 16.0.0) macOS.
/// The platform is mapped to a release-specific build tag by the resolver;
/// this type only carries the caller's intent.
///
/// # Example
///
/// ```
/// use armtc_schema::Platform;
///
/// let p: Platform = "win32".parse().unwrap();
/// assert_eq!(p, Platform::Windows);
/// assert_eq!(p.executable_name("clang"), "clang.exe");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Linux (`x86_64`)
    Linux,
    /// Windows (`x86_64`)
    Windows,
    /// macOS
    Darwin,
}

/// A platform string that does not name any supported operating system.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown platform '{0}' (expected linux, win32/windows or darwin/macos)")]
pub struct UnknownPlatform(pub String);

impl Platform {
    /// The platform this binary was compiled for, if it is one we know.
    pub fn current() -> Option<Self> {
        match std::env::consts::OS {
            "linux" => Some(Self::Linux),
            "windows" => Some(Self::Windows),
            "macos" => Some(Self::Darwin),
            _ => None,
        }
    }

    /// Canonical name, used in cache keys and install directory names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linux => "linux",
            Self::Windows => "win32",
            Self::Darwin => "darwin",
        }
    }

    /// File name of an executable called `stem` on this platform.
    pub fn executable_name(&self, stem: &str) -> String {
        match self {
            Self::Windows => format!("{stem}.exe"),
            Self::Linux | Self::Darwin => stem.to_string(),
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Platform {
    type Err = UnknownPlatform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "linux" => Ok(Self::Linux),
            "win32" | "windows" => Ok(Self::Windows),
            "darwin" | "macos" => Ok(Self::Darwin),
            _ => Err(UnknownPlatform(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_aliases() {
        assert_eq!("linux".parse::<Platform>(), Ok(Platform::Linux));
        assert_eq!("win32".parse::<Platform>(), Ok(Platform::Windows));
        assert_eq!("windows".parse::<Platform>(), Ok(Platform::Windows));
        assert_eq!("darwin".parse::<Platform>(), Ok(Platform::Darwin));
        assert_eq!("macOS".parse::<Platform>(), Ok(Platform::Darwin));
    }

    #[test]
    fn rejects_unknown() {
        let err = "freebsd".parse::<Platform>().unwrap_err();
        assert_eq!(err, UnknownPlatform("freebsd".to_string()));
        assert!(err.to_string().contains("freebsd"));
    }

    #[test]
    fn display_round_trips_through_parse() {
        for p in [Platform::Linux, Platform::Windows, Platform::Darwin] {
            assert_eq!(p.to_string().parse::<Platform>(), Ok(p));
        }
    }

    #[test]
    fn executable_suffix_only_on_windows() {
        assert_eq!(Platform::Windows.executable_name("clang"), "clang.exe");
        assert_eq!(Platform::Linux.executable_name("clang"), "clang");
        assert_eq!(Platform::Darwin.executable_name("clang"), "clang");
    }

    #[test]
    fn serde_uses_lowercase() {
        let json = serde_json::to_string(&Platform::Darwin).unwrap();
        assert_eq!(json, "\"darwin\"");
    }
}
