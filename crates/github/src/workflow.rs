//! Workflow commands understood by the Actions runner.
//!
//! Commands are lines on stdout of the form `::<command>::<message>`. Message
//! data must be escaped so that a multi-line message stays a single command.

use std::io::Write;

/// Escape command data: `%`, `\r` and `\n`.
#[must_use]
pub fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Format a workflow command line without the trailing newline.
#[must_use]
pub fn format_command(command: &str, message: &str) -> String {
    format!("::{command}::{}", escape_data(message))
}

/// Mark the step as failed with `message`.
///
/// The runner turns the command into an error annotation; the caller is still
/// responsible for exiting non-zero.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn error(out: &mut impl Write, message: &str) -> std::io::Result<()> {
    writeln!(out, "{}", format_command("error", message))
}
