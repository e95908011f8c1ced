//! Variables the Actions runner provides to every step.

use std::path::PathBuf;

use crate::tool_cache::default_tool_cache_dir;

/// Runner-provided environment relevant to installing tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerEnvironment {
    /// `GITHUB_ACTIONS=true` when running inside a workflow.
    pub in_actions: bool,
    /// `RUNNER_DEBUG=1` when step debug logging is enabled.
    pub debug: bool,
    /// Root of the host tool cache (`RUNNER_TOOL_CACHE`).
    pub tool_cache_dir: PathBuf,
    /// Scratch directory cleaned by the runner after the job (`RUNNER_TEMP`).
    pub temp_dir: PathBuf,
    /// File whose lines are prepended to `PATH` for later steps (`GITHUB_PATH`).
    pub path_file: Option<PathBuf>,
}

impl RunnerEnvironment {
    /// Read the runner environment, with local fallbacks outside Actions.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            in_actions: std::env::var("GITHUB_ACTIONS").is_ok_and(|v| v == "true"),
            debug: std::env::var("RUNNER_DEBUG").is_ok_and(|v| v == "1"),
            tool_cache_dir: non_empty_path("RUNNER_TOOL_CACHE")
                .unwrap_or_else(default_tool_cache_dir),
            temp_dir: non_empty_path("RUNNER_TEMP").unwrap_or_else(std::env::temp_dir),
            path_file: non_empty_path("GITHUB_PATH"),
        }
    }
}

fn non_empty_path(var: &str) -> Option<PathBuf> {
    std::env::var_os(var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}
