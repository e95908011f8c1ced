//! Core types and workflow for copilot-action.
//!
//! The crate owns everything that does not depend on a concrete host:
//!
//! - [`tools`] - the tool model, the collaborator traits behind which the host
//!   cache, the release registry and the HTTP downloader live, plus the version
//!   resolver and the acquirer built on top of them
//! - [`commands`] - operation requests, command invocations, the process
//!   runner and the dispatcher for `install`, `package` and `deploy`
//!
//! Host integrations (GitHub Actions runner, GitHub Releases) implement the
//! traits in their own crates.

// Rust 1.92 compiler bug: false positives for thiserror/miette derive macro fields
// https://github.com/rust-lang/rust/issues/147648
#![allow(unused_assignments)]

pub mod commands;
pub mod tools;

#[cfg(test)]
pub(crate) mod test_utils;

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for copilot-action operations.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// A required input was absent or empty.
    #[error("{message}")]
    #[diagnostic(
        code(copilot_action::missing_parameter),
        help("Set the input in the workflow step's `with:` block")
    )]
    MissingParameter {
        /// Input name (e.g. `app`).
        name: &'static str,
        /// User-facing message.
        message: String,
    },

    /// An input was present but could not be interpreted.
    #[error("Input '{name}' is invalid: {message}")]
    #[diagnostic(code(copilot_action::invalid_input))]
    InvalidInput {
        /// Input name.
        name: String,
        /// Why the value was rejected.
        message: String,
    },

    /// The release registry could not report the latest release.
    #[error("Failed to look up the latest release: {0}")]
    #[diagnostic(
        code(copilot_action::upstream_unavailable),
        help("Pin the `version` input or provide a valid `github-token`")
    )]
    UpstreamUnavailable(String),

    /// Downloading the tool binary failed.
    #[error("Failed to download {url}: {message}")]
    #[diagnostic(code(copilot_action::download_failure))]
    DownloadFailure {
        /// Download URL.
        url: String,
        /// Error message.
        message: String,
    },

    /// A child process could not start or exited unsuccessfully.
    #[error("Command `{command}` failed: {message}")]
    #[diagnostic(code(copilot_action::child_process_failure))]
    ChildProcessFailure {
        /// The command line, for display only.
        command: String,
        /// Exit code when the process ran to completion.
        code: Option<i32>,
        /// Error message (spawn error or captured stderr).
        message: String,
    },

    /// The host tool cache rejected an operation.
    #[error("Tool cache error: {0}")]
    #[diagnostic(code(copilot_action::cache))]
    Cache(String),

    /// IO error.
    #[error("IO error: {0}")]
    #[diagnostic(code(copilot_action::io))]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a missing parameter error.
    #[must_use]
    pub fn missing_parameter(name: &'static str, message: impl Into<String>) -> Self {
        Self::MissingParameter {
            name,
            message: message.into(),
        }
    }

    /// Create an invalid input error.
    #[must_use]
    pub fn invalid_input(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create an upstream unavailable error.
    #[must_use]
    pub fn upstream_unavailable(message: impl Into<String>) -> Self {
        Self::UpstreamUnavailable(message.into())
    }

    /// Create a download failure error.
    #[must_use]
    pub fn download_failure(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DownloadFailure {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a child process failure error.
    #[must_use]
    pub fn child_process_failure(
        command: impl Into<String>,
        code: Option<i32>,
        message: impl Into<String>,
    ) -> Self {
        Self::ChildProcessFailure {
            command: command.into(),
            code,
            message: message.into(),
        }
    }

    /// Create a tool cache error.
    #[must_use]
    pub fn cache(message: impl Into<String>) -> Self {
        Self::Cache(message.into())
    }
}

/// Result type alias for copilot-action operations.
pub type Result<T> = std::result::Result<T, Error>;
