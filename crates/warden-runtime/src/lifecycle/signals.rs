//! Stop requests: the single pending-stop slot and the signal worker feeding it.
//!
//! Signal handlers only record a reason in the slot. All stop logic runs in
//! the controller's loop, which checks the slot once per tick and is woken
//! early when it fills.

use std::fmt;
use std::io;
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::process::ChildSignal;

/// Conventional SIGHUP number; a reload is never forwarded as-is.
const SIGHUP: i32 = 1;

/// Why the supervisor was asked to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// SIGINT / Ctrl+C
    Interrupt,
    /// SIGTERM / Ctrl+Break
    Terminate,
    /// SIGHUP. A reload stops the server; restarting it is left to whatever
    /// process manager runs the supervisor.
    Reload,
}

impl StopReason {
    /// Signal forwarded to the child for this request
    pub const fn child_signal(self) -> ChildSignal {
        match self {
            Self::Interrupt => ChildSignal::Interrupt,
            Self::Terminate | Self::Reload => ChildSignal::Terminate,
        }
    }

    /// Exit code when this request cancels startup before a child exists:
    /// `128 +` the number of the signal that was received.
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::Interrupt | Self::Terminate => 128 + self.child_signal().number(),
            Self::Reload => 128 + SIGHUP,
        }
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Interrupt => f.write_str("interrupt"),
            Self::Terminate => f.write_str("terminate"),
            Self::Reload => f.write_str("reload"),
        }
    }
}

/// Create a connected pending-stop slot and its reader.
pub fn stop_channel() -> (StopSlot, StopRequests) {
    let (tx, rx) = watch::channel(None);
    (StopSlot { tx: Arc::new(tx) }, StopRequests { rx })
}

/// Write side of the pending-stop slot. Cheap to clone.
#[derive(Debug, Clone)]
pub struct StopSlot {
    tx: Arc<watch::Sender<Option<StopReason>>>,
}

impl StopSlot {
    /// Record a stop request. The first reason wins; later requests are
    /// ignored. Returns whether this call filled the slot.
    pub fn request(&self, reason: StopReason) -> bool {
        self.tx.send_if_modified(|slot| {
            if slot.is_some() {
                return false;
            }
            *slot = Some(reason);
            true
        })
    }
}

/// Read side of the pending-stop slot.
#[derive(Debug)]
pub struct StopRequests {
    rx: watch::Receiver<Option<StopReason>>,
}

impl StopRequests {
    /// The pending reason, if a stop was requested. Never blocks.
    pub fn pending(&self) -> Option<StopReason> {
        *self.rx.borrow()
    }

    /// Wait until a stop is requested.
    ///
    /// Pends forever once every `StopSlot` is gone without a request, so it
    /// is safe to race against other futures.
    pub async fn wait(&mut self) -> StopReason {
        loop {
            let current = *self.rx.borrow_and_update();
            if let Some(reason) = current {
                return reason;
            }
            if self.rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

/// Listen for OS termination signals and post them into `slot`.
///
/// Unix: SIGINT → `Interrupt`, SIGTERM → `Terminate`, SIGHUP → `Reload`.
/// Windows: Ctrl+C → `Interrupt`, Ctrl+Break → `Terminate`.
///
/// Listeners are installed before this returns, so a signal arriving right
/// after the call is not lost. Must be called from within a Tokio runtime.
pub fn spawn_signal_worker(slot: StopSlot) -> io::Result<JoinHandle<()>> {
    imp_spawn(slot)
}

#[cfg(unix)]
fn imp_spawn(slot: StopSlot) -> io::Result<JoinHandle<()>> {
    use tokio::select;
    use tokio::signal::unix::{SignalKind, signal};

    debug!("launching unix signal worker");

    let mut hangup = signal(SignalKind::hangup())?;
    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;

    Ok(tokio::spawn(async move {
        loop {
            let reason = select! {
                _ = hangup.recv() => StopReason::Reload,
                _ = interrupt.recv() => StopReason::Interrupt,
                _ = terminate.recv() => StopReason::Terminate,
            };

            debug!(%reason, "received unix signal");
            if !slot.request(reason) {
                debug!(%reason, "stop already pending; ignoring signal");
            }
        }
    }))
}

#[cfg(windows)]
fn imp_spawn(slot: StopSlot) -> io::Result<JoinHandle<()>> {
    use tokio::select;
    use tokio::signal::windows::{ctrl_break, ctrl_c};

    debug!("launching windows signal worker");

    let mut interrupt = ctrl_c()?;
    let mut terminate = ctrl_break()?;

    Ok(tokio::spawn(async move {
        loop {
            let reason = select! {
                _ = interrupt.recv() => StopReason::Interrupt,
                _ = terminate.recv() => StopReason::Terminate,
            };

            debug!(%reason, "received windows process notification");
            slot.request(reason);
        }
    }))
}
