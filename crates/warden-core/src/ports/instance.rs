//! Ports for instance coordination: liveness query and stop collaborator.

use async_trait::async_trait;

use crate::error::SupervisorResult;

/// Answers whether a server of this kind is already running.
///
/// Consulted before launch; a positive answer refuses the launch before any
/// handshake file is written.
pub trait InstanceProbe: Send + Sync {
    /// Check whether an instance is currently running.
    fn is_running(&self) -> bool;
}

/// Finalizes coordination state once a server has stopped.
///
/// # Design Rules
///
/// - Must be idempotent: calling it for a server that already exited, or
///   twice in a row, succeeds without repeating side effects
/// - Takes the backend name identifying which kind of server to finalize
#[async_trait]
pub trait ServerStopper: Send + Sync {
    /// Stop the named server (if still alive) and clear its coordination state.
    async fn stop(&self, server: &str) -> SupervisorResult<()>;
}
