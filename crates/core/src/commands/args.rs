//! Argument builders for Copilot CLI subcommands.

use super::request::OperationParameters;
use crate::{Error, Result};

/// Require the `app` input.
///
/// # Errors
///
/// Returns [`Error::MissingParameter`] when absent or empty.
pub fn require_app(params: &OperationParameters) -> Result<&str> {
    non_empty(params.app.as_deref())
        .ok_or_else(|| Error::missing_parameter("app", "App name is required"))
}

/// Require the `env` input.
///
/// # Errors
///
/// Returns [`Error::MissingParameter`] when absent or empty.
pub fn require_env(params: &OperationParameters) -> Result<&str> {
    non_empty(params.env.as_deref())
        .ok_or_else(|| Error::missing_parameter("env", "Environment is required"))
}

/// `svc ls --app <app> --local --json`
#[must_use]
pub fn service_list(app: &str) -> Vec<String> {
    workload_list("svc", app)
}

/// `job ls --app <app> --local --json`
#[must_use]
pub fn job_list(app: &str) -> Vec<String> {
    workload_list("job", app)
}

fn workload_list(kind: &str, app: &str) -> Vec<String> {
    [kind, "ls", "--app", app, "--local", "--json"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Validated inputs for `copilot deploy`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployArgs<'a> {
    /// `--app`
    pub app: &'a str,
    /// `--env`
    pub env: &'a str,
    /// `--name`, when set
    pub name: Option<&'a str>,
    /// `--tag`, when set
    pub tag: Option<&'a str>,
    /// Adds `--force`
    pub force: bool,
    /// Adds `--detach`
    pub detach: bool,
    /// `--resource-tags`, when set
    pub resource_tags: Option<&'a str>,
}

impl<'a> DeployArgs<'a> {
    /// Validate `app` then `env` and borrow the optional inputs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingParameter`] for the first required input missing.
    pub fn from_parameters(params: &'a OperationParameters) -> Result<Self> {
        let app = require_app(params)?;
        let env = require_env(params)?;
        Ok(Self {
            app,
            env,
            name: non_empty(params.name.as_deref()),
            tag: non_empty(params.tag.as_deref()),
            force: params.force,
            detach: params.detach,
            resource_tags: non_empty(params.resource_tags.as_deref()),
        })
    }

    /// Argv tokens: `deploy --app <app> --env <env>` then each optional
    /// segment whose predicate holds, in declaration order.
    #[must_use]
    pub fn to_args(&self) -> Vec<String> {
        let mut args: Vec<String> = ["deploy", "--app", self.app, "--env", self.env]
            .into_iter()
            .map(String::from)
            .collect();

        let segments: [(bool, &dyn Fn() -> Vec<String>); 5] = [
            (self.name.is_some(), &|| flag_value("--name", self.name)),
            (self.tag.is_some(), &|| flag_value("--tag", self.tag)),
            (self.force, &|| vec!["--force".to_string()]),
            (self.detach, &|| vec!["--detach".to_string()]),
            (self.resource_tags.is_some(), &|| {
                flag_value("--resource-tags", self.resource_tags)
            }),
        ];

        args.extend(
            segments
                .into_iter()
                .filter(|(include, _)| *include)
                .flat_map(|(_, tokens)| tokens()),
        );
        args
    }
}

fn flag_value(flag: &str, value: Option<&str>) -> Vec<String> {
    value
        .map(|v| vec![flag.to_string(), v.to_string()])
        .unwrap_or_default()
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
