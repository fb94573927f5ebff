//! Output Multiplexer: turns the child's raw output into sink reports.
//!
//! Each supervision tick drains whatever bytes the child produced, splits them
//! into lines (carrying a trailing partial line to the next tick), classifies
//! every line as structured or plain and reports it. Identical plain stderr
//! lines within one tick are collapsed into one report plus a count.

mod classify;
mod lines;
mod multiplexer;
mod sink;

pub use classify::{OutputEvent, parse_structured, suppression_notice};
pub use lines::LineBuffer;
pub use multiplexer::OutputMultiplexer;
pub use sink::{CollectingSink, SinkMessage};
