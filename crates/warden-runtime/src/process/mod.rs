//! Child process management.
//!
//! # Structure
//!
//! - `Launcher` - builds the child's command line, working directory and environment, then spawns it
//! - `ProcessHandle` - owns the spawned child and the receiving end of its output
//! - stream readers - background tasks forwarding raw stdout/stderr bytes to the handle
//! - `shutdown` - signal forwarding and PID-only termination

mod handle;
mod launcher;
pub mod shutdown;
mod stream;

pub use handle::{OutputChunk, ProcessHandle, StreamKind, exit_code_of};
pub use launcher::{Launcher, SUPERVISED_ENV};
pub use shutdown::{ChildSignal, kill_pid};
