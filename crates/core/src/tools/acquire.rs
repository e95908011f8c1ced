//! Download and registration of the CLI binary.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tracing::{debug, info};

use super::descriptor::{CliDistribution, ToolDescriptor};
use super::platform::Platform;
use super::store::ToolStore;
use crate::Result;

/// Fetches a URL into a local file.
#[async_trait]
pub trait ArtifactDownloader: Send + Sync {
    /// Download `url` and write the body to `dest`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::DownloadFailure`] on network errors or a
    /// non-success status.
    async fn download(&self, url: &str, dest: &Path) -> Result<()>;
}

/// Downloads the CLI and registers it into the [`ToolStore`].
///
/// The acquirer never consults the cache itself; callers look the descriptor
/// up first so that a given `(name, version)` is installed at most once.
pub struct Acquirer {
    store: Arc<dyn ToolStore>,
    downloader: Arc<dyn ArtifactDownloader>,
    distribution: CliDistribution,
    temp_dir: PathBuf,
}

impl Acquirer {
    /// Create an acquirer staging downloads under the system temp directory.
    #[must_use]
    pub fn new(
        store: Arc<dyn ToolStore>,
        downloader: Arc<dyn ArtifactDownloader>,
        distribution: CliDistribution,
    ) -> Self {
        Self {
            store,
            downloader,
            distribution,
            temp_dir: std::env::temp_dir(),
        }
    }

    /// Stage downloads under `dir` instead of the system temp directory.
    #[must_use]
    pub fn with_temp_dir(mut self, dir: PathBuf) -> Self {
        self.temp_dir = dir;
        self
    }

    /// Download, mark executable, register, and put the tool on the search path.
    ///
    /// Returns the cache directory the tool was registered into.
    ///
    /// # Errors
    ///
    /// Returns an error if the download fails or the cache rejects the file.
    /// Nothing is retried.
    pub async fn acquire(&self, descriptor: &ToolDescriptor, platform: &Platform) -> Result<PathBuf> {
        let url = self
            .distribution
            .download_url(&descriptor.version, platform);
        info!("Downloading AWS Copilot CLI from {url}");

        std::fs::create_dir_all(&self.temp_dir)?;
        let staging = tempfile::Builder::new()
            .prefix("copilot-action-")
            .tempdir_in(&self.temp_dir)?;
        let executable = self.distribution.executable_name(platform);
        let download_path = staging.path().join(&executable);

        self.downloader.download(&url, &download_path).await?;
        make_executable(&download_path)?;

        let sha256 = compute_file_sha256(&download_path).await?;
        debug!(tool = %descriptor, %sha256, "Downloaded binary");

        let installed = self
            .store
            .register(descriptor, &download_path, &executable)?;
        self.store.append_to_search_path(&installed)?;

        info!(tool = %descriptor, path = ?installed, "Registered tool in cache");
        Ok(installed)
    }
}

/// Set mode 0o755 on unix; a no-op elsewhere.
fn make_executable(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = std::fs::metadata(path)?.permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(path, perms)?;
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}

/// Compute SHA256 hash of a file.
async fn compute_file_sha256(path: &Path) -> Result<String> {
    let mut file = tokio::fs::File::open(path).await?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; 8192];

    loop {
        let n = file.read(&mut buffer).await?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}
