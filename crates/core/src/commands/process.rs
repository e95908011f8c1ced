//! Process runner backed by `tokio::process`.

use async_trait::async_trait;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

use super::invocation::{CommandInvocation, CommandRunner, ProcessOutput};
use crate::{Error, Result};

/// Runs invocations as real child processes, capturing stdout and stderr.
///
/// Captured output is echoed line by line at info level so it lands in the
/// job log.
#[derive(Debug, Clone, Default)]
pub struct TokioCommandRunner;

impl TokioCommandRunner {
    /// Create a runner.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for TokioCommandRunner {
    async fn run(&self, invocation: &CommandInvocation) -> Result<ProcessOutput> {
        let shown = invocation.display();
        debug!(command = %shown, cwd = ?invocation.working_dir, "Running command");

        let mut command = Command::new(&invocation.program);
        command
            .args(&invocation.args)
            .current_dir(&invocation.working_dir)
            .stdin(Stdio::null());

        if !invocation.search_path.is_empty() {
            command.env(
                "PATH",
                prepend_search_path(&invocation.search_path, std::env::var_os("PATH"))?,
            );
        }

        let output = command.output().await.map_err(|e| {
            Error::child_process_failure(&shown, None, format!("failed to start: {e}"))
        })?;

        let result = ProcessOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        for line in result.stdout.lines().chain(result.stderr.lines()) {
            info!("{line}");
        }

        if !output.status.success() {
            let stderr = result.stderr.trim();
            let message = if stderr.is_empty() {
                match result.code {
                    Some(code) => format!("exited with code {code}"),
                    None => "terminated by signal".to_string(),
                }
            } else {
                stderr.to_string()
            };
            return Err(Error::child_process_failure(shown, result.code, message));
        }

        Ok(result)
    }
}

/// Build a `PATH` value with `dirs` ahead of the existing entries.
fn prepend_search_path(dirs: &[PathBuf], existing: Option<OsString>) -> Result<OsString> {
    let existing = existing
        .as_deref()
        .map(|p| std::env::split_paths(p).collect::<Vec<_>>())
        .unwrap_or_default();

    std::env::join_paths(dirs.iter().cloned().chain(existing)).map_err(|e| {
        Error::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("invalid search path entry: {e}"),
        ))
    })
}
