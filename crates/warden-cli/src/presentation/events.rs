//! Formatting of structured events emitted by the server.
//!
//! The server reports requests and uncaught errors as JSON lines with a
//! `type` field. Known types get a one-line summary; anything else is shown
//! as compact JSON.

use serde_json::Value;

/// Render a structured event as a single terminal line.
pub fn format_event(event: &Value) -> String {
    let formatted = match event_type(event) {
        Some("request") => format_request(event),
        Some("throwable") => format_throwable(event),
        Some("log") => format_log(event),
        _ => None,
    };

    formatted.unwrap_or_else(|| event.to_string())
}

/// Whether the event describes a failure and belongs on stderr.
pub(crate) fn is_error_event(event: &Value) -> bool {
    event_type(event) == Some("throwable")
}

fn event_type(event: &Value) -> Option<&str> {
    event.get("type").and_then(Value::as_str)
}

fn format_request(event: &Value) -> Option<String> {
    let status = event.get("statusCode").and_then(Value::as_u64)?;
    let method = event.get("method").and_then(Value::as_str)?;
    let url = event.get("url").and_then(Value::as_str)?;

    let mut line = format!("{status:>4}  {method:<7} {url}");
    if let Some(duration) = event.get("duration").and_then(Value::as_f64) {
        line.push_str(&format!(" {duration:.2} ms"));
    }
    if let Some(memory) = event.get("memory").and_then(Value::as_u64) {
        #[allow(clippy::cast_precision_loss)]
        let megabytes = memory as f64 / 1_048_576.0;
        line.push_str(&format!(" {megabytes:.1} mb"));
    }
    Some(line)
}

fn format_throwable(event: &Value) -> Option<String> {
    let class = event.get("class").and_then(Value::as_str)?;
    let message = event.get("message").and_then(Value::as_str).unwrap_or_default();

    let mut line = format!("{class}: {message}");
    if let (Some(file), Some(number)) = (
        event.get("file").and_then(Value::as_str),
        event.get("line").and_then(Value::as_u64),
    ) {
        line.push_str(&format!(" in {file}:{number}"));
    }
    Some(line)
}

fn format_log(event: &Value) -> Option<String> {
    let message = event.get("message").and_then(Value::as_str)?;
    match event.get("level").and_then(Value::as_str) {
        Some(level) => Some(format!("[{level}] {message}")),
        None => Some(message.to_string()),
    }
}
