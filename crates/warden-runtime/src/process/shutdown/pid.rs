//! Stop a server by PID (no Child handle, no reaping).

use std::io;

#[cfg(unix)]
use std::time::Duration;
#[cfg(unix)]
use tokio::time::sleep;

#[cfg(unix)]
use nix::errno::Errno;
#[cfg(unix)]
use nix::sys::signal::{self, Signal};
#[cfg(unix)]
use nix::unistd::Pid;

#[cfg(unix)]
const POLL_INTERVAL: Duration = Duration::from_millis(100);
#[cfg(unix)]
const POLL_ATTEMPTS: u32 = 20;

/// Stop a server recorded in a pid file with SIGTERM → SIGKILL escalation.
///
/// # Strategy
/// 1. Send SIGTERM
/// 2. Poll for up to 2 seconds for the process to disappear
/// 3. If still alive, send SIGKILL and poll again
///
/// The caller must verify that `pid` really is the server; PIDs get reused.
///
/// # Returns
/// - `Ok(())` if the process is gone
/// - `Err` if signalling fails for any reason other than ESRCH
pub async fn kill_pid(pid: u32) -> io::Result<()> {
    #[cfg(unix)]
    {
        let raw = i32::try_from(pid)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "PID out of range"))?;
        let target = Pid::from_raw(raw);

        for phase in [Signal::SIGTERM, Signal::SIGKILL] {
            match signal::kill(target, phase) {
                Ok(()) => {}
                Err(Errno::ESRCH) => return Ok(()),
                Err(e) => return Err(io::Error::other(e)),
            }

            if exited_within(target).await {
                return Ok(());
            }
            tracing::debug!(%pid, signal = %phase, "server still alive after signal");
        }

        Err(io::Error::new(
            io::ErrorKind::TimedOut,
            format!("process {pid} did not exit after SIGKILL"),
        ))
    }

    #[cfg(not(unix))]
    {
        let _ = pid;
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "stopping a server by PID is not supported on this platform",
        ))
    }
}

/// Poll with the null signal until the process is gone or attempts run out.
#[cfg(unix)]
async fn exited_within(target: Pid) -> bool {
    for _ in 0..POLL_ATTEMPTS {
        sleep(POLL_INTERVAL).await;

        if let Err(Errno::ESRCH) = signal::kill(target, None) {
            return true;
        }
    }
    false
}
