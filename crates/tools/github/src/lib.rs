//! GitHub Releases support for copilot-action.
//!
//! Provides [`GitHubReleases`], which implements both collaborator traits the
//! core needs from GitHub:
//! - [`ReleaseSource`]: latest published release tag of a repository
//! - [`ArtifactDownloader`]: streaming download of a release asset to disk

use async_trait::async_trait;
use copilot_action_core::tools::{ArtifactDownloader, ReleaseSource};
use copilot_action_core::{Error, Result};
use reqwest::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT as USER_AGENT_HEADER};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Public GitHub REST API.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// User agent sent with every request; the GitHub API rejects requests without one.
pub const USER_AGENT: &str = concat!("copilot-action/", env!("CARGO_PKG_VERSION"));

/// GitHub release metadata from the API.
#[derive(Debug, Deserialize)]
struct Release {
    #[serde(default)]
    tag_name: String,
}

/// Client for GitHub Releases.
pub struct GitHubReleases {
    client: Client,
    token: Option<SecretString>,
    api_base: String,
}

impl GitHubReleases {
    /// Create a client authenticating release lookups with `token`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialised (TLS backend).
    pub fn new(token: Option<SecretString>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                Error::Io(std::io::Error::other(format!(
                    "Failed to create HTTP client: {e}"
                )))
            })?;

        Ok(Self {
            client,
            token,
            api_base: DEFAULT_API_BASE.to_string(),
        })
    }

    /// Use a different API base URL (GitHub Enterprise).
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Use a preconfigured HTTP client.
    #[must_use]
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// URL of the latest-release endpoint for `owner/repo`.
    #[must_use]
    pub fn latest_release_url(&self, owner: &str, repo: &str) -> String {
        format!("{}/repos/{owner}/{repo}/releases/latest", self.api_base)
    }
}

/// Pick the token for release lookups: the explicit input, else `GITHUB_TOKEN`,
/// else `GH_TOKEN`. Empty values are ignored.
#[must_use]
pub fn resolve_token(explicit: Option<String>) -> Option<SecretString> {
    explicit
        .into_iter()
        .chain(std::env::var("GITHUB_TOKEN").ok())
        .chain(std::env::var("GH_TOKEN").ok())
        .map(|t| t.trim().to_string())
        .find(|t| !t.is_empty())
        .map(SecretString::from)
}

#[async_trait]
impl ReleaseSource for GitHubReleases {
    async fn latest_release_tag(&self, owner: &str, repo: &str) -> Result<String> {
        let token = self.token.as_ref().ok_or_else(|| {
            Error::upstream_unavailable("a GitHub token is required to look up the latest release")
        })?;

        let url = self.latest_release_url(owner, repo);
        debug!(%url, "Fetching latest GitHub release");

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/vnd.github+json")
            .header(USER_AGENT_HEADER, USER_AGENT)
            .header(
                AUTHORIZATION,
                format!("Bearer {}", token.expose_secret()),
            )
            .send()
            .await
            .map_err(|e| Error::upstream_unavailable(format!("Failed to fetch release: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::upstream_unavailable(format!(
                "Latest release not found for {owner}/{repo} (HTTP {})",
                response.status()
            )));
        }

        let release: Release = response.json().await.map_err(|e| {
            Error::upstream_unavailable(format!("Failed to parse release: {e}"))
        })?;

        if release.tag_name.trim().is_empty() {
            return Err(Error::upstream_unavailable(format!(
                "Latest release of {owner}/{repo} has no tag"
            )));
        }

        Ok(release.tag_name)
    }
}

#[async_trait]
impl ArtifactDownloader for GitHubReleases {
    async fn download(&self, url: &str, dest: &Path) -> Result<()> {
        debug!(%url, ?dest, "Downloading GitHub asset");

        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::download_failure(url, e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::download_failure(
                url,
                format!("HTTP {}", response.status()),
            ));
        }

        let mut file = tokio::fs::File::create(dest).await?;
        let mut written = 0usize;
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| Error::download_failure(url, format!("Failed to read asset: {e}")))?
        {
            file.write_all(&chunk).await?;
            written += chunk.len();
        }
        file.flush().await?;

        debug!(%url, bytes = written, "Downloaded GitHub asset");
        Ok(())
    }
}
