//! Tool identity and upstream coordinates.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::platform::Platform;

/// Identifies a specific build of the CLI: the cache key `(name, version)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// Cache name (e.g., "aws-copilot-cli").
    pub name: String,
    /// Release tag (e.g., "v1.34.0").
    pub version: String,
}

impl ToolDescriptor {
    /// Create a new descriptor.
    #[must_use]
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

impl std::fmt::Display for ToolDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}

/// A tool registered in the host cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedTool {
    /// Name and resolved version.
    pub descriptor: ToolDescriptor,
    /// Directory holding the executable; this is what goes on the search path.
    pub installed_path: PathBuf,
}

/// Fixed upstream coordinates of the CLI being managed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliDistribution {
    /// Name used as the cache key.
    pub cache_name: &'static str,
    /// Executable name, also the asset name prefix.
    pub binary: &'static str,
    /// Upstream repository owner.
    pub owner: &'static str,
    /// Upstream repository name.
    pub repo: &'static str,
    /// Base URL that release assets are served under.
    pub release_base: &'static str,
}

impl CliDistribution {
    /// The AWS Copilot CLI.
    pub const COPILOT: Self = Self {
        cache_name: "aws-copilot-cli",
        binary: "copilot",
        owner: "aws",
        repo: "copilot-cli",
        release_base: "https://github.com/aws/copilot-cli/releases/download",
    };

    /// Descriptor for the given version of this CLI.
    #[must_use]
    pub fn descriptor(&self, version: impl Into<String>) -> ToolDescriptor {
        ToolDescriptor::new(self.cache_name, version)
    }

    /// Download URL: `<release-base>/<version>/<binary>-<platform>-<version>`.
    #[must_use]
    pub fn download_url(&self, version: &str, platform: &Platform) -> String {
        format!(
            "{}/{version}/{}-{}-{version}{}",
            self.release_base,
            self.binary,
            platform.release_identifier(),
            platform.exe_suffix()
        )
    }

    /// Name of the executable inside the cache directory.
    #[must_use]
    pub fn executable_name(&self, platform: &Platform) -> String {
        format!("{}{}", self.binary, platform.exe_suffix())
    }
}

impl Default for CliDistribution {
    fn default() -> Self {
        Self::COPILOT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{Arch, Os};

    #[test]
    fn test_download_url_linux() {
        let url = CliDistribution::COPILOT
            .download_url("v1.34.0", &Platform::new(Os::Linux, Arch::X86_64));
        assert_eq!(
            url,
            "https://github.com/aws/copilot-cli/releases/download/v1.34.0/copilot-linux-v1.34.0"
        );
    }

    #[test]
    fn test_download_url_arm64() {
        let url = CliDistribution::COPILOT
            .download_url("v1.34.0", &Platform::new(Os::Darwin, Arch::Arm64));
        assert!(url.ends_with("/v1.34.0/copilot-darwin-arm64-v1.34.0"));
    }

    #[test]
    fn test_download_url_windows() {
        let url = CliDistribution::COPILOT
            .download_url("v1.34.0", &Platform::new(Os::Windows, Arch::X86_64));
        assert!(url.ends_with("/copilot-windows-v1.34.0.exe"));
    }

    #[test]
    fn test_descriptor_uses_cache_name() {
        let d = CliDistribution::COPILOT.descriptor("v1.2.3");
        assert_eq!(d.name, "aws-copilot-cli");
        assert_eq!(d.version, "v1.2.3");
        assert_eq!(d.to_string(), "aws-copilot-cli@v1.2.3");
    }

    #[test]
    fn test_executable_name() {
        let dist = CliDistribution::default();
        assert_eq!(
            dist.executable_name(&Platform::new(Os::Linux, Arch::Arm64)),
            "copilot"
        );
        assert_eq!(
            dist.executable_name(&Platform::new(Os::Windows, Arch::X86_64)),
            "copilot.exe"
        );
    }
}
