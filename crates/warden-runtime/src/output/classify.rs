//! Line classification.

use serde_json::Value;

use crate::process::StreamKind;

/// One classified unit of child output, in the order it was reported.
#[derive(Debug, Clone, PartialEq)]
pub enum OutputEvent {
    /// A line that parsed as a JSON object or array.
    Structured { stream: StreamKind, payload: Value },
    /// Free text. Stdout text is informational, stderr text is an error.
    Plain { stream: StreamKind, text: String },
    /// `count` further identical stderr lines were collapsed into the
    /// preceding `Plain` event.
    Suppressed { stream: StreamKind, count: usize },
}

/// Parse `line` as a structured event.
///
/// Only documents whose top level is an object or an array count; bare
/// scalars such as `42` or `"ok"` are text.
pub fn parse_structured(line: &str) -> Option<Value> {
    match serde_json::from_str::<Value>(line) {
        Ok(value @ (Value::Object(_) | Value::Array(_))) => Some(value),
        _ => None,
    }
}

/// Notice reported after a collapsed group of identical error lines.
pub fn suppression_notice(count: usize) -> String {
    if count == 1 {
        "↑ 1 similar error was reported.".to_string()
    } else {
        format!("↑ {count} similar errors were reported.")
    }
}
