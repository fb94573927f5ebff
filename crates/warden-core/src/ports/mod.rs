//! Port definitions (trait abstractions) for external collaborators.
//!
//! Ports define the interfaces that the supervisor expects from its
//! surroundings. Implementations live in `warden-runtime` (or in tests).
//!
//! # Design Rules
//!
//! - No process or filesystem implementation details in signatures
//! - Lifecycle control and output multiplexing depend only on these traits
//! - Every collaborator must be replaceable by a fake in tests

mod backend;
mod instance;
mod report_sink;

pub use backend::ServerBackend;
#[cfg(test)]
pub use backend::MockServerBackend;
pub use instance::{InstanceProbe, ServerStopper};
pub use report_sink::ReportSink;
