//! Child-process invocations of the CLI.

use async_trait::async_trait;
use std::path::PathBuf;

use crate::Result;

/// A single child-process execution, derived from an operation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    /// Executable, resolved through the search path when not absolute.
    pub program: String,
    /// Discrete argv tokens; no shell is involved.
    pub args: Vec<String>,
    /// Working directory for the child.
    pub working_dir: PathBuf,
    /// Directories prepended to the child's `PATH`.
    pub search_path: Vec<PathBuf>,
}

impl CommandInvocation {
    /// Create an invocation with an empty search path.
    #[must_use]
    pub fn new(program: impl Into<String>, args: Vec<String>, working_dir: PathBuf) -> Self {
        Self {
            program: program.into(),
            args,
            working_dir,
            search_path: Vec::new(),
        }
    }

    /// Prepend these directories to the child's `PATH`.
    #[must_use]
    pub fn with_search_path(mut self, search_path: Vec<PathBuf>) -> Self {
        self.search_path = search_path;
        self
    }

    /// Command line for logs and error messages.
    #[must_use]
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Captured result of a completed child process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, `None` if terminated by a signal.
    pub code: Option<i32>,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

/// Executes command invocations.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run the invocation to completion and capture its output.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::ChildProcessFailure`] if the process cannot be
    /// started or exits unsuccessfully.
    async fn run(&self, invocation: &CommandInvocation) -> Result<ProcessOutput>;
}
