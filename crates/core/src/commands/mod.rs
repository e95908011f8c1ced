//! Operations the action can perform and how they reach the CLI.
//!
//! An [`OperationRequest`] is built once from the runner's inputs. The
//! [`Dispatcher`] makes sure the CLI is installed, turns the request into
//! [`CommandInvocation`]s via the argument builders in [`args`], and hands each
//! one to a [`CommandRunner`].

pub mod args;
mod dispatcher;
mod invocation;
mod process;
mod request;

pub use dispatcher::Dispatcher;
pub use invocation::{CommandInvocation, CommandRunner, ProcessOutput};
pub use process::TokioCommandRunner;
pub use request::{Operation, OperationParameters, OperationRequest, parse_strict_bool};
