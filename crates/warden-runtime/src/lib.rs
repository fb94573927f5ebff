//! Process runtime for warden.
//!
//! Implements the OS-facing side of a supervised launch on top of the ports
//! in `warden-core`:
//!
//! - [`backend`] - server backends (`swoole`)
//! - [`handshake`] - atomic state handshake file writes
//! - [`coordination`] - pid file, liveness probe and stop collaborator
//! - [`process`] - launcher, process handle and termination helpers
//! - [`output`] - the output multiplexer
//! - [`lifecycle`] - stop signals and the lifecycle controller
//! - [`Supervisor`] - composes all of the above

#![deny(unsafe_code)]

pub mod backend;
pub mod coordination;
pub mod handshake;
pub mod lifecycle;
pub mod output;
pub mod process;
mod supervisor;

pub use backend::SwooleBackend;
pub use coordination::{PidFileProbe, StateFileStopper};
pub use handshake::{read_handshake, write_handshake};
pub use lifecycle::{ControllerOutcome, LifecycleState, StopReason, StopSlot, stop_channel};
pub use output::{CollectingSink, OutputMultiplexer, SinkMessage};
pub use process::{Launcher, ProcessHandle};
pub use supervisor::{Supervisor, SupervisorSettings};
