//! copilot-action - install the AWS Copilot CLI in CI and package or deploy with it.
//!
//! The binary runs as a GitHub Actions step. Inputs arrive as `INPUT_*`
//! environment variables (or the equivalent flags when run by hand), one
//! operation is dispatched, and the outcome is reported through the exit code
//! and an `::error::` workflow command.

/// Input parsing, exit codes and failure reporting.
pub mod cli;
/// Tracing and logging configuration.
pub mod tracing;

use std::sync::Arc;

use copilot_action_core::Result;
use copilot_action_core::commands::{Dispatcher, TokioCommandRunner};
use copilot_action_core::tools::Platform;
use copilot_action_github::{RunnerEnvironment, RunnerToolCache};
use copilot_action_tools_github::{GitHubReleases, resolve_token};

use crate::cli::Cli;

/// Build the collaborators for this runner and run the requested operation.
///
/// # Errors
///
/// Returns the first error raised by input validation or the operation.
pub async fn run(cli: &Cli, runner: &RunnerEnvironment) -> Result<()> {
    let request = cli.to_request()?;
    let platform = cli.platform.unwrap_or_else(Platform::current);

    ::tracing::debug!(
        command = %request.operation,
        %platform,
        tool_cache = ?runner.tool_cache_dir,
        "Starting copilot-action"
    );

    let github = Arc::new(GitHubReleases::new(resolve_token(cli.github_token.clone()))?);
    let store = Arc::new(
        RunnerToolCache::new(runner.tool_cache_dir.clone(), platform.arch)
            .with_path_file(runner.path_file.clone()),
    );

    let dispatcher = Dispatcher::new(
        github.clone(),
        store,
        github,
        Arc::new(TokioCommandRunner::new()),
    )
    .with_platform(platform)
    .with_temp_dir(runner.temp_dir.clone());

    dispatcher.dispatch(&request).await
}
