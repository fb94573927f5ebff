//! Stopping server processes.
//!
//! - `send_signal`: forwards a single termination signal to a live child
//! - `kill_pid`: stops a server known only by its PID (from the pid file),
//!   escalating to SIGKILL when it ignores SIGTERM

mod pid;
mod signal;

pub use pid::kill_pid;
pub use signal::{ChildSignal, send_signal};
