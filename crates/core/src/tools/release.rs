//! Version resolution against the upstream release registry.

use async_trait::async_trait;
use tracing::{debug, info};

use super::descriptor::CliDistribution;
use crate::Result;

/// A registry that can report the latest published release of a project.
#[async_trait]
pub trait ReleaseSource: Send + Sync {
    /// Tag name of the most recent published release of `owner/repo`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::UpstreamUnavailable`] if the query cannot
    /// complete (network, authentication, no releases).
    async fn latest_release_tag(&self, owner: &str, repo: &str) -> Result<String>;
}

/// Resolve the version to install.
///
/// A non-empty `explicit` version is returned unchanged without touching the
/// network. Otherwise the latest release tag of the distribution's upstream
/// project is returned.
///
/// # Errors
///
/// Propagates the release source's error when the lookup is needed and fails.
pub async fn resolve_version(
    explicit: Option<&str>,
    releases: &dyn ReleaseSource,
    distribution: &CliDistribution,
) -> Result<String> {
    if let Some(version) = explicit.filter(|v| !v.trim().is_empty()) {
        debug!(%version, "Using pinned version");
        return Ok(version.to_string());
    }

    info!(
        owner = distribution.owner,
        repo = distribution.repo,
        "Looking up latest release"
    );
    let version = releases
        .latest_release_tag(distribution.owner, distribution.repo)
        .await?;
    debug!(%version, "Resolved latest release");
    Ok(version)
}
