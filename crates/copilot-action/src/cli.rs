use clap::Parser;
use copilot_action_core::Error;
use copilot_action_core::commands::{
    Operation, OperationParameters, OperationRequest, parse_strict_bool,
};
use copilot_action_core::tools::Platform;
use copilot_action_github::workflow;
use miette::Report;
use std::io::{self, Write};
use std::path::PathBuf;

use crate::tracing::{LogLevel, TracingFormat};

/// Successful exit code
pub const EXIT_OK: i32 = 0;
/// Any failure; the runner marks the step failed
pub const EXIT_FAILURE: i32 = 1;

/// Step inputs.
///
/// Every input can be given as a flag or through the variable the runner sets
/// for `with:` entries (`INPUT_<NAME>`).
#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "copilot-action",
    disable_version_flag = true,
    about = "Install the AWS Copilot CLI and package or deploy applications from CI"
)]
pub struct Cli {
    /// Operation to run: install, package or deploy
    #[arg(long, env = "INPUT_COMMAND")]
    pub command: Option<String>,

    /// Copilot CLI version to install (defaults to the latest release)
    #[arg(long, env = "INPUT_VERSION")]
    pub version: Option<String>,

    /// Token used to look up the latest release
    #[arg(long = "github-token", env = "INPUT_GITHUB-TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Copilot application name
    #[arg(long, env = "INPUT_APP")]
    pub app: Option<String>,

    /// Working directory for Copilot commands
    #[arg(long, env = "INPUT_PATH")]
    pub path: Option<String>,

    /// Copilot environment to deploy to
    #[arg(long, env = "INPUT_ENV")]
    pub env: Option<String>,

    /// Service or job to deploy
    #[arg(long, env = "INPUT_NAME")]
    pub name: Option<String>,

    /// Image tag to deploy
    #[arg(long, env = "INPUT_TAG")]
    pub tag: Option<String>,

    /// Resource tags passed to `copilot deploy --resource-tags`
    #[arg(long = "resource-tags", env = "INPUT_RESOURCE-TAGS")]
    pub resource_tags: Option<String>,

    /// Deploy without waiting for the deployment to finish (true/false)
    #[arg(long, env = "INPUT_DETACH")]
    pub detach: Option<String>,

    /// Deploy even if nothing changed; only the value `true` enables it
    #[arg(long, env = "INPUT_FORCE")]
    pub force: Option<String>,

    /// Install the build for this platform instead of the current one (e.g. linux-arm64)
    #[arg(long, env = "COPILOT_ACTION_PLATFORM", value_parser = parse_platform)]
    pub platform: Option<Platform>,

    /// Log output format (defaults to `actions` inside GitHub Actions)
    #[arg(long = "log-format", env = "COPILOT_ACTION_LOG_FORMAT", value_enum)]
    pub log_format: Option<TracingFormat>,

    /// Log level
    #[arg(long = "log-level", env = "COPILOT_ACTION_LOG_LEVEL", value_enum)]
    pub log_level: Option<LogLevel>,
}

impl Cli {
    /// Turn the raw inputs into an operation request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for an unknown command, or for a `detach`
    /// value that is not a boolean when deploying. Other operations ignore it.
    pub fn to_request(&self) -> copilot_action_core::Result<OperationRequest> {
        let input = |value: &Option<String>| OperationParameters::input(value.clone());

        let operation = match input(&self.command) {
            Some(command) => command.parse()?,
            None => Operation::Install,
        };

        let detach = match (operation, input(&self.detach)) {
            (Operation::Deploy, Some(value)) => parse_strict_bool("detach", &value)?,
            _ => false,
        };

        let parameters = OperationParameters {
            version: input(&self.version),
            app: input(&self.app),
            path: input(&self.path).map_or_else(|| PathBuf::from("."), PathBuf::from),
            env: input(&self.env),
            name: input(&self.name),
            tag: input(&self.tag),
            resource_tags: input(&self.resource_tags),
            detach,
            force: OperationParameters::force_flag(self.force.as_deref()),
        };

        Ok(OperationRequest::new(operation, parameters))
    }
}

fn parse_platform(s: &str) -> Result<Platform, String> {
    Platform::parse(s).ok_or_else(|| {
        format!("unknown platform '{s}', expected <os>-<arch> such as linux-x86_64 or darwin-arm64")
    })
}

/// Report a failed run.
///
/// Inside Actions the message becomes an `::error::` command on stdout so the
/// runner annotates the step; elsewhere miette renders the full diagnostic.
#[allow(clippy::print_stderr)]
pub fn render_error(err: Error, format: &TracingFormat) {
    ::tracing::debug!(error = ?err, "Run failed");

    match format {
        TracingFormat::Actions => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            if workflow::error(&mut out, &err.to_string()).is_err() {
                eprintln!("Error: {err}");
            }
            let _ = out.flush();
        }
        TracingFormat::Pretty | TracingFormat::Compact | TracingFormat::Json => {
            let report = Report::new(err);
            eprintln!("{report:?}");
            let _ = io::stderr().flush();
        }
    }
}

/// Exit code for a run result.
#[must_use]
pub fn exit_code_for<T>(result: &copilot_action_core::Result<T>) -> i32 {
    if result.is_ok() { EXIT_OK } else { EXIT_FAILURE }
}
