//! Tracing configuration for the action binary
//!
//! Inside a workflow, events are written to stdout as workflow commands so the
//! runner can fold debug output and annotate warnings. Run by hand, the usual
//! `tracing-subscriber` formats are written to stderr.

use copilot_action_github::ActionsFormat;
use std::io;
pub use tracing::Level;
use tracing_subscriber::{filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

/// Tracing output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum TracingFormat {
    /// Workflow commands understood by the Actions runner
    Actions,
    /// Pretty-printed human-readable format
    Pretty,
    /// Compact single-line format
    Compact,
    /// Structured JSON format
    Json,
}

/// Log level options for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevel {
    /// Show all logs (trace level)
    Trace,
    /// Show debug and above
    Debug,
    /// Show info and above (default)
    Info,
    /// Show warnings and above
    Warn,
    /// Show errors only
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

/// Tracing configuration
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Output format
    pub format: TracingFormat,
    /// Level for the workspace crates when `RUST_LOG` is unset
    pub level: Level,
}

impl TracingConfig {
    /// Pick format and level from explicit choices and the runner environment.
    ///
    /// The `actions` format is the default inside a workflow; step debug
    /// logging (`RUNNER_DEBUG=1`) raises the default level to debug.
    #[must_use]
    pub fn resolve(
        format: Option<TracingFormat>,
        level: Option<LogLevel>,
        in_actions: bool,
        runner_debug: bool,
    ) -> Self {
        let format = format.unwrap_or(if in_actions {
            TracingFormat::Actions
        } else {
            TracingFormat::Compact
        });
        let level = match level {
            Some(level) => level.into(),
            None if runner_debug => Level::DEBUG,
            None => Level::INFO,
        };
        Self { format, level }
    }

    fn directives(&self) -> String {
        let level = self.level.as_str().to_lowercase();
        [
            "copilot_action",
            "copilot_action_core",
            "copilot_action_github",
            "copilot_action_tools_github",
        ]
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
    }
}

/// Global correlation ID for tracing request correlation
static CORRELATION_ID: std::sync::OnceLock<Uuid> = std::sync::OnceLock::new();

/// Get or create a correlation ID for the current run
pub fn correlation_id() -> Uuid {
    *CORRELATION_ID.get_or_init(Uuid::new_v4)
}

/// Initialize tracing with the given configuration
///
/// # Errors
///
/// Returns an error if the filter directives cannot be parsed.
pub fn init_tracing(config: TracingConfig) -> miette::Result<()> {
    let correlation_id = correlation_id();

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.directives()))
        .map_err(|e| miette::miette!("Failed to create tracing filter: {e}"))?;

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.format {
        TracingFormat::Actions => {
            let layer = tracing_subscriber::fmt::layer()
                .event_format(ActionsFormat)
                .with_writer(io::stdout);

            registry.with(layer).init();
        }
        TracingFormat::Pretty => {
            let layer = tracing_subscriber::fmt::layer()
                .pretty()
                .with_writer(io::stderr)
                .with_target(true);

            registry.with(layer).init();
        }
        TracingFormat::Compact => {
            let layer = tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(io::stderr)
                .with_target(false)
                .with_thread_ids(false);

            registry.with(layer).init();
        }
        TracingFormat::Json => {
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(io::stderr)
                .with_current_span(true)
                .with_span_list(true);

            registry.with(layer).init();
        }
    }

    tracing::debug!(
        correlation_id = %correlation_id,
        version = env!("CARGO_PKG_VERSION"),
        format = ?config.format,
        "Tracing initialized"
    );

    Ok(())
}
