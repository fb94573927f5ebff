//! Per-tick draining, classification and stderr deduplication.

use std::collections::HashMap;

use warden_core::ReportSink;

use super::classify::{OutputEvent, parse_structured, suppression_notice};
use super::lines::LineBuffer;
use crate::process::{OutputChunk, ProcessHandle, StreamKind};

/// Drains a child's output once per tick and reports it to a sink.
///
/// Holds only the partial-line carry for each stream between ticks. Error
/// groups are built and discarded inside a single call, so identical errors
/// arriving in different ticks are reported separately.
#[derive(Debug, Default)]
pub struct OutputMultiplexer {
    stdout: LineBuffer,
    stderr: LineBuffer,
}

impl OutputMultiplexer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read everything the child produced since the last drain and report it.
    ///
    /// Never blocks and never fails; returns the events in report order.
    pub fn drain(&mut self, handle: &mut ProcessHandle, sink: &dyn ReportSink) -> Vec<OutputEvent> {
        let chunks = handle.read_available();
        self.process(chunks, sink)
    }

    /// Report one tick's worth of raw chunks.
    pub fn process(&mut self, chunks: Vec<OutputChunk>, sink: &dyn ReportSink) -> Vec<OutputEvent> {
        let mut stdout_lines = Vec::new();
        let mut stderr_lines = Vec::new();

        for chunk in chunks {
            match chunk.stream {
                StreamKind::Stdout => stdout_lines.extend(self.stdout.push(&chunk.bytes)),
                StreamKind::Stderr => stderr_lines.extend(self.stderr.push(&chunk.bytes)),
            }
        }

        report_batch(stdout_lines, stderr_lines, sink)
    }

    /// Report trailing partial lines once the child's streams are closed.
    pub fn finish(&mut self, sink: &dyn ReportSink) -> Vec<OutputEvent> {
        let stdout_lines = self.stdout.flush().into_iter().collect();
        let stderr_lines = self.stderr.flush().into_iter().collect();
        report_batch(stdout_lines, stderr_lines, sink)
    }
}

fn report_batch(
    stdout_lines: Vec<Vec<u8>>,
    stderr_lines: Vec<Vec<u8>>,
    sink: &dyn ReportSink,
) -> Vec<OutputEvent> {
    let mut events = Vec::new();
    report_stdout(&decode(stdout_lines), sink, &mut events);
    report_stderr(&decode(stderr_lines), sink, &mut events);
    events
}

/// Lossy decode, dropping empty lines.
fn decode(lines: Vec<Vec<u8>>) -> Vec<String> {
    lines
        .into_iter()
        .filter(|line| !line.is_empty())
        .map(|line| String::from_utf8_lossy(&line).into_owned())
        .collect()
}

fn report_stdout(lines: &[String], sink: &dyn ReportSink, events: &mut Vec<OutputEvent>) {
    let stream = StreamKind::Stdout;

    for line in lines {
        if let Some(payload) = parse_structured(line) {
            sink.structured(&payload);
            events.push(OutputEvent::Structured { stream, payload });
        } else {
            sink.info(line);
            events.push(OutputEvent::Plain {
                stream,
                text: line.clone(),
            });
        }
    }
}

/// Structured lines pass straight through. Plain lines are grouped by exact
/// text; each group is reported where its first member appeared, followed by
/// a notice counting the suppressed repeats.
fn report_stderr(lines: &[String], sink: &dyn ReportSink, events: &mut Vec<OutputEvent>) {
    let stream = StreamKind::Stderr;

    let mut occurrences: HashMap<&str, usize> = HashMap::new();
    for line in lines {
        if parse_structured(line).is_none() {
            *occurrences.entry(line.as_str()).or_default() += 1;
        }
    }

    for line in lines {
        if let Some(payload) = parse_structured(line) {
            sink.structured(&payload);
            events.push(OutputEvent::Structured { stream, payload });
            continue;
        }

        // Later members of an already reported group have no entry left
        let Some(count) = occurrences.remove(line.as_str()) else {
            continue;
        };

        sink.error(line);
        events.push(OutputEvent::Plain {
            stream,
            text: line.clone(),
        });

        let suppressed = count - 1;
        if suppressed > 0 {
            sink.error(&suppression_notice(suppressed));
            events.push(OutputEvent::Suppressed {
                stream,
                count: suppressed,
            });
        }
    }
}
