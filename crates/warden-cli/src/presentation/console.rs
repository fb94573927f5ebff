//! Console reporting sink.

use std::io::Write;

use serde_json::Value;
use warden_core::ReportSink;

use super::events::{format_event, is_error_event};

/// Writes info lines and structured events to stdout, errors to stderr.
///
/// Diagnostics from `tracing` also go to stderr but are filtered separately,
/// so operator output stays readable with logging turned down.
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl ConsoleSink {
    pub const fn new() -> Self {
        Self
    }
}

impl ReportSink for ConsoleSink {
    fn info(&self, line: &str) {
        // A closed stdout (e.g. piped into `head`) must not take the supervisor down
        let _ = writeln!(std::io::stdout().lock(), "{line}");
    }

    fn error(&self, line: &str) {
        let _ = writeln!(std::io::stderr().lock(), "{line}");
    }

    fn structured(&self, event: &Value) {
        let line = format_event(event);
        if is_error_event(event) {
            self.error(&line);
        } else {
            self.info(&line);
        }
    }
}
