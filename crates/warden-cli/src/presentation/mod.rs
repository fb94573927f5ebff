//! Terminal presentation of supervisor output.

mod console;
mod events;

pub use console::ConsoleSink;
pub use events::format_event;
