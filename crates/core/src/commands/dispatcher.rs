//! Dispatch of `install`, `package` and `deploy`.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::args::{self, DeployArgs};
use super::invocation::{CommandInvocation, CommandRunner, ProcessOutput};
use super::request::{Operation, OperationParameters, OperationRequest};
use crate::Result;
use crate::tools::{
    Acquirer, ArtifactDownloader, CachedTool, CliDistribution, Platform, ReleaseSource,
    ToolDescriptor, ToolStore, resolve_version,
};

/// Runs one operation end to end.
pub struct Dispatcher {
    releases: Arc<dyn ReleaseSource>,
    store: Arc<dyn ToolStore>,
    acquirer: Acquirer,
    runner: Arc<dyn CommandRunner>,
    distribution: CliDistribution,
    platform: Platform,
}

impl Dispatcher {
    /// Create a dispatcher for the Copilot CLI on the current platform.
    #[must_use]
    pub fn new(
        releases: Arc<dyn ReleaseSource>,
        store: Arc<dyn ToolStore>,
        downloader: Arc<dyn ArtifactDownloader>,
        runner: Arc<dyn CommandRunner>,
    ) -> Self {
        let distribution = CliDistribution::COPILOT;
        Self {
            acquirer: Acquirer::new(Arc::clone(&store), downloader, distribution.clone()),
            releases,
            store,
            runner,
            distribution,
            platform: Platform::current(),
        }
    }

    /// Install for another platform than the one we run on.
    #[must_use]
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Stage downloads under `dir`.
    #[must_use]
    pub fn with_temp_dir(mut self, dir: PathBuf) -> Self {
        self.acquirer = self.acquirer.with_temp_dir(dir);
        self
    }

    /// Run the requested operation.
    ///
    /// # Errors
    ///
    /// Returns the first error of the operation; nothing is retried.
    #[instrument(skip_all, fields(command = %request.operation))]
    pub async fn dispatch(&self, request: &OperationRequest) -> Result<()> {
        match request.operation {
            Operation::Install => self.install(&request.parameters).await.map(|_| ()),
            Operation::Package => self.package(&request.parameters).await,
            Operation::Deploy => self.deploy(&request.parameters).await,
        }
    }

    /// Install the CLI, reusing a cached copy when present.
    ///
    /// # Errors
    ///
    /// Returns an error if version resolution or the download fails.
    pub async fn install(&self, params: &OperationParameters) -> Result<CachedTool> {
        info!("Installing AWS Copilot...");

        let descriptor = self.resolve_descriptor(params).await?;
        let installed_path = match self.store.find(&descriptor) {
            Some(path) => {
                debug!(tool = %descriptor, ?path, "Found cached tool");
                self.store.append_to_search_path(&path)?;
                path
            }
            None => self.acquirer.acquire(&descriptor, &self.platform).await?,
        };

        info!("Installing AWS Copilot CLI to {}", installed_path.display());
        info!("AWS Copilot CLI installed successfully");

        Ok(CachedTool {
            descriptor,
            installed_path,
        })
    }

    /// List the application's local services and jobs.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::MissingParameter`] without `app`, or the first
    /// failing listing.
    pub async fn package(&self, params: &OperationParameters) -> Result<()> {
        self.ensure_installed(params).await?;
        let app = args::require_app(params)?;

        let services = self.run(args::service_list(app), &params.path).await?;
        let jobs = self.run(args::job_list(app), &params.path).await?;

        debug!("Services {}", services.stdout.trim());
        debug!("Jobs {}", jobs.stdout.trim());

        info!("Copilot package created successfully");
        Ok(())
    }

    /// Deploy the application to an environment.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::MissingParameter`] without `app` or `env`, or the
    /// deploy failure.
    pub async fn deploy(&self, params: &OperationParameters) -> Result<()> {
        self.ensure_installed(params).await?;
        let deploy = DeployArgs::from_parameters(params)?;

        let output = self.run(deploy.to_args(), &params.path).await?;

        debug!(
            "Deploying app {} to env {} {} is done {}",
            deploy.app,
            deploy.env,
            if deploy.force { "with force" } else { "" },
            output.code.unwrap_or_default()
        );

        info!("Copilot application deployed successfully");
        Ok(())
    }

    /// Probe the cache for the requested version and acquire inline on a miss.
    async fn ensure_installed(&self, params: &OperationParameters) -> Result<PathBuf> {
        let descriptor = self.resolve_descriptor(params).await?;
        if let Some(path) = self.store.find(&descriptor) {
            debug!(tool = %descriptor, ?path, "Tool already installed");
            self.store.append_to_search_path(&path)?;
            return Ok(path);
        }

        info!(tool = %descriptor, "Tool not installed yet");
        self.acquirer.acquire(&descriptor, &self.platform).await
    }

    async fn resolve_descriptor(&self, params: &OperationParameters) -> Result<ToolDescriptor> {
        let version = resolve_version(
            params.version.as_deref(),
            self.releases.as_ref(),
            &self.distribution,
        )
        .await?;
        Ok(self.distribution.descriptor(version))
    }

    async fn run(&self, args: Vec<String>, working_dir: &Path) -> Result<ProcessOutput> {
        let invocation = CommandInvocation::new(
            self.distribution.binary,
            args,
            working_dir.to_path_buf(),
        )
        .with_search_path(self.store.search_path());
        self.runner.run(&invocation).await
    }
}
