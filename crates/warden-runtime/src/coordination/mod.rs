//! Coordination state for a supervised server.
//!
//! Provides the pid file, the liveness probe built on it, and the idempotent
//! stop collaborator that clears everything once a server is gone.
//!
//! # Safety guarantees
//! - Atomic pid file writes via temp file + rename
//! - Deletes are idempotent (missing files are not errors)
//! - Signals are only sent to pids that still exist

mod pidfile;
mod probe;
mod stopper;
mod verify;

pub use pidfile::{delete_pidfile, pid_exists, read_pidfile, write_pidfile};
pub use probe::PidFileProbe;
pub use stopper::StateFileStopper;
pub use verify::is_supervised_server;
