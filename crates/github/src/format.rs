//! Tracing output rendered as workflow commands.

use std::fmt;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

use crate::workflow::format_command;

/// Event format for the Actions job log.
///
/// INFO events are printed as plain lines. DEBUG and TRACE become `::debug::`
/// (hidden unless step debug logging is on), WARN becomes `::warning::` and
/// ERROR becomes `::error::`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionsFormat;

impl ActionsFormat {
    /// Workflow command used for events at `level`, `None` for plain output.
    #[must_use]
    pub fn command_for(level: Level) -> Option<&'static str> {
        match level {
            Level::ERROR => Some("error"),
            Level::WARN => Some("warning"),
            Level::INFO => None,
            Level::DEBUG | Level::TRACE => Some("debug"),
        }
    }
}

impl<S, N> FormatEvent<S, N> for ActionsFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut message = String::new();
        ctx.format_fields(Writer::new(&mut message), event)?;

        match Self::command_for(*event.metadata().level()) {
            Some(command) => writeln!(writer, "{}", format_command(command, &message)),
            None => writeln!(writer, "{message}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Capture {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn capture(f: impl FnOnce()) -> String {
        let out = Capture::default();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::TRACE)
            .event_format(ActionsFormat)
            .with_writer(out.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        let bytes = out.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_command_for_levels() {
        assert_eq!(ActionsFormat::command_for(Level::ERROR), Some("error"));
        assert_eq!(ActionsFormat::command_for(Level::WARN), Some("warning"));
        assert_eq!(ActionsFormat::command_for(Level::INFO), None);
        assert_eq!(ActionsFormat::command_for(Level::DEBUG), Some("debug"));
        assert_eq!(ActionsFormat::command_for(Level::TRACE), Some("debug"));
    }

    #[test]
    fn test_info_is_plain() {
        let out = capture(|| tracing::info!("AWS Copilot CLI installed successfully"));
        assert_eq!(out, "AWS Copilot CLI installed successfully\n");
    }

    #[test]
    fn test_debug_is_workflow_command() {
        let out = capture(|| tracing::debug!("Services {}", "[]"));
        assert_eq!(out, "::debug::Services []\n");
    }

    #[test]
    fn test_multiline_warning_is_escaped() {
        let out = capture(|| tracing::warn!("first\nsecond"));
        assert_eq!(out, "::warning::first%0Asecond\n");
    }

    #[test]
    fn test_fields_are_included() {
        let out = capture(|| tracing::info!(version = "v1.34.0", "Resolved"));
        assert_eq!(out.lines().count(), 1);
        assert!(out.contains("Resolved"));
        assert!(out.contains("version=\"v1.34.0\""));
    }
}
