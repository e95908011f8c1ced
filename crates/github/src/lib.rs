//! GitHub Actions runner integration for copilot-action.
//!
//! This crate provides the runner-side collaborators:
//! - [`RunnerEnvironment`] for the variables the runner sets for every step
//! - [`RunnerToolCache`], the [`ToolStore`](copilot_action_core::tools::ToolStore)
//!   backed by the runner's tool cache directory and `GITHUB_PATH`
//! - [`workflow`] for workflow commands (`::error::`, `::debug::`) and their
//!   escaping rules
//! - [`ActionsFormat`], a tracing event format that renders log levels as
//!   workflow commands

#![warn(missing_docs)]

mod format;
mod runner;
mod tool_cache;
pub mod workflow;

pub use format::ActionsFormat;
pub use runner::RunnerEnvironment;
pub use tool_cache::{RunnerToolCache, default_tool_cache_dir};
