//! In-memory reporting sink.

use std::sync::Mutex;

use serde_json::Value;
use warden_core::ReportSink;

/// A message as received by a [`ReportSink`].
#[derive(Debug, Clone, PartialEq)]
pub enum SinkMessage {
    Info(String),
    Error(String),
    Structured(Value),
}

/// Sink that records everything it receives, in order.
///
/// Used by tests and by callers that want to inspect output after a run.
#[derive(Debug, Default)]
pub struct CollectingSink {
    messages: Mutex<Vec<SinkMessage>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all messages received so far
    pub fn messages(&self) -> Vec<SinkMessage> {
        self.lock().clone()
    }

    /// Info lines received so far
    pub fn infos(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|m| match m {
                SinkMessage::Info(line) => Some(line.clone()),
                _ => None,
            })
            .collect()
    }

    /// Error lines received so far
    pub fn errors(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|m| match m {
                SinkMessage::Error(line) => Some(line.clone()),
                _ => None,
            })
            .collect()
    }

    /// Structured events received so far
    pub fn structured_events(&self) -> Vec<Value> {
        self.lock()
            .iter()
            .filter_map(|m| match m {
                SinkMessage::Structured(value) => Some(value.clone()),
                _ => None,
            })
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<SinkMessage>> {
        // A panicking test thread must not hide the messages from the others
        self.messages
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn record(&self, message: SinkMessage) {
        self.lock().push(message);
    }
}

impl ReportSink for CollectingSink {
    fn info(&self, line: &str) {
        self.record(SinkMessage::Info(line.to_string()));
    }

    fn error(&self, line: &str) {
        self.record(SinkMessage::Error(line.to_string()));
    }

    fn structured(&self, event: &Value) {
        self.record(SinkMessage::Structured(event.clone()));
    }
}
