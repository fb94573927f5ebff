//! Lifecycle states.

use std::fmt;

use super::signals::StopReason;

/// Where a supervised launch is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Configuration resolved, handshake written, process launched.
    Starting,
    /// Output is drained and the child polled once per tick.
    Running,
    /// A stop was requested; the child has been signalled.
    Stopping(StopReason),
    /// Terminal.
    Stopped,
}

impl LifecycleState {
    /// Whether moving to `next` follows the state machine.
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Starting, Self::Running)
                | (Self::Running, Self::Stopping(_) | Self::Stopped)
                | (Self::Stopping(_), Self::Stopped)
        )
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Starting => f.write_str("starting"),
            Self::Running => f.write_str("running"),
            Self::Stopping(reason) => write!(f, "stopping ({reason})"),
            Self::Stopped => f.write_str("stopped"),
        }
    }
}
