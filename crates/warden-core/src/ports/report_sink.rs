//! Reporting sink port for operator-facing output.
//!
//! This port abstracts where classified child output ends up, allowing a
//! console implementation for the CLI and collecting implementations for tests.

use serde_json::Value;

/// Port receiving the supervisor's operator-facing messages.
///
/// Implementations should be thread-safe and non-blocking where possible.
pub trait ReportSink: Send + Sync {
    /// An informational line (banner, plain stdout output).
    fn info(&self, line: &str);

    /// An error line (plain stderr output, suppression notices, failures).
    fn error(&self, line: &str);

    /// A structured event emitted by the child, passed through opaquely.
    fn structured(&self, event: &Value);
}
