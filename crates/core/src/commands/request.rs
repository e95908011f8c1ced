//! Operation requests read from the invoking environment.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

use crate::{Error, Result};

/// The unit of work requested for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Install the CLI and put it on the search path.
    #[default]
    Install,
    /// List the application's local services and jobs.
    Package,
    /// Deploy the application to an environment.
    Deploy,
}

impl Operation {
    /// All operations, in help-text order.
    pub const ALL: [Self; 3] = [Self::Install, Self::Package, Self::Deploy];

    /// Input value naming this operation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Install => "install",
            Self::Package => "package",
            Self::Deploy => "deploy",
        }
    }
}

impl FromStr for Operation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|op| op.as_str() == s.trim())
            .ok_or_else(|| {
                Error::invalid_input(
                    "command",
                    format!("unknown command '{s}', expected one of install, package, deploy"),
                )
            })
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named inputs for an operation.
///
/// String inputs are `None` when absent or empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationParameters {
    /// Pinned CLI version; `None` means latest release.
    pub version: Option<String>,
    /// Target application.
    pub app: Option<String>,
    /// Working directory for CLI invocations.
    pub path: PathBuf,
    /// Target environment.
    pub env: Option<String>,
    /// Service or job to deploy.
    pub name: Option<String>,
    /// Image tag to deploy.
    pub tag: Option<String>,
    /// Free-form resource tags passed through to `--resource-tags`.
    pub resource_tags: Option<String>,
    /// Deploy without waiting for completion.
    pub detach: bool,
    /// Deploy even without changes.
    pub force: bool,
}

impl Default for OperationParameters {
    fn default() -> Self {
        Self {
            version: None,
            app: None,
            path: PathBuf::from("."),
            env: None,
            name: None,
            tag: None,
            resource_tags: None,
            detach: false,
            force: false,
        }
    }
}

impl OperationParameters {
    /// Normalise an input value: trim it and treat empty as absent.
    #[must_use]
    pub fn input(value: Option<String>) -> Option<String> {
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// Interpret the `force` input; only the literal `true` enables it.
    #[must_use]
    pub fn force_flag(value: Option<&str>) -> bool {
        value.map(str::trim) == Some("true")
    }
}

/// One operation plus its parameters, built once per run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationRequest {
    /// What to run.
    pub operation: Operation,
    /// Normalised inputs.
    pub parameters: OperationParameters,
}

impl OperationRequest {
    /// Create a request.
    #[must_use]
    pub fn new(operation: Operation, parameters: OperationParameters) -> Self {
        Self {
            operation,
            parameters,
        }
    }
}

/// Parse a boolean the way workflow inputs are specified (YAML 1.2 core schema).
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] for anything other than
/// `true | True | TRUE | false | False | FALSE`.
pub fn parse_strict_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim() {
        "true" | "True" | "TRUE" => Ok(true),
        "false" | "False" | "FALSE" => Ok(false),
        other => Err(Error::invalid_input(
            name,
            format!(
                "'{other}' does not meet YAML 1.2 \"Core Schema\" specification. \
                 Support boolean input list: `true | True | TRUE | false | False | FALSE`"
            ),
        )),
    }
}
