//! Lifecycle Controller and the signals that drive it.
//!
//! ```text
//! Starting ──► Running ──► Stopping ──► Stopped
//!                 │                        ▲
//!                 └──── child exited ──────┘
//! ```

mod controller;
mod signals;
mod state;

pub use controller::{ControllerOutcome, LifecycleController};
pub use signals::{StopReason, StopRequests, StopSlot, spawn_signal_worker, stop_channel};
pub use state::LifecycleState;
