//! copilot-action binary.
//!
//! Reads the step inputs, runs one operation and exits 0 on success or 1 after
//! reporting the failure.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use clap::Parser;
use copilot_action::cli::{Cli, EXIT_FAILURE, exit_code_for, render_error};
use copilot_action::tracing::{TracingConfig, init_tracing};
use copilot_action_github::RunnerEnvironment;

fn main() {
    // NOTE: eprintln! in the panic hook; the subscriber may be unusable mid-panic.
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panicked: {panic_info}");
        eprintln!("Internal error occurred. Run with RUST_LOG=debug for more information.");
    }));

    let cli = Cli::parse();
    let runner = RunnerEnvironment::from_env();

    let config = TracingConfig::resolve(cli.log_format, cli.log_level, runner.in_actions, runner.debug);
    let format = config.format;
    if let Err(e) = init_tracing(config) {
        eprintln!("Fatal error: {e:?}");
        std::process::exit(EXIT_FAILURE);
    }

    let exit_code = run_with_tokio(&cli, &runner, format);
    std::process::exit(exit_code);
}

/// Create a tokio runtime and run the requested operation
fn run_with_tokio(
    cli: &Cli,
    runner: &RunnerEnvironment,
    format: copilot_action::tracing::TracingFormat,
) -> i32 {
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Fatal error: Failed to create tokio runtime: {e}");
            return EXIT_FAILURE;
        }
    };

    let result = rt.block_on(copilot_action::run(cli, runner));
    let exit_code = exit_code_for(&result);
    if let Err(err) = result {
        render_error(err, &format);
    }
    exit_code
}
