//! Termination signals forwarded to the child.

use std::io;

/// A termination request forwarded to the server process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildSignal {
    Interrupt,
    Terminate,
}

impl ChildSignal {
    /// Conventional signal number, used for `128 + n` exit codes
    pub const fn number(self) -> i32 {
        match self {
            Self::Interrupt => 2,
            Self::Terminate => 15,
        }
    }

    #[cfg(unix)]
    const fn as_nix(self) -> nix::sys::signal::Signal {
        use nix::sys::signal::Signal;
        match self {
            Self::Interrupt => Signal::SIGINT,
            Self::Terminate => Signal::SIGTERM,
        }
    }
}

/// Deliver `signal` to `pid`. A process that is already gone is not an error.
#[cfg(unix)]
pub fn send_signal(pid: u32, signal: ChildSignal) -> io::Result<()> {
    use nix::errno::Errno;
    use nix::unistd::Pid;

    let raw = i32::try_from(pid)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "PID out of range"))?;

    match nix::sys::signal::kill(Pid::from_raw(raw), signal.as_nix()) {
        Ok(()) | Err(Errno::ESRCH) => Ok(()),
        Err(e) => Err(io::Error::other(e)),
    }
}

/// Signals do not exist here; callers terminate the child directly instead.
#[cfg(not(unix))]
pub fn send_signal(_pid: u32, _signal: ChildSignal) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "signal delivery is not supported on this platform",
    ))
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn signal_numbers_match_posix() {
        assert_eq!(ChildSignal::Interrupt.number(), 2);
        assert_eq!(ChildSignal::Terminate.number(), 15);
    }

    #[tokio::test]
    async fn terminate_stops_a_default_child() {
        let mut child = tokio::process::Command::new("sleep")
            .arg("30")
            .spawn()
            .expect("failed to spawn sleep");
        let pid = child.id().expect("no PID");

        send_signal(pid, ChildSignal::Terminate).unwrap();
        let status = child.wait().await.unwrap();

        assert!(!status.success());
    }

    #[test]
    fn missing_process_is_ignored() {
        // PIDs near the kernel maximum are effectively never allocated
        assert!(send_signal(4_194_000, ChildSignal::Interrupt).is_ok());
    }
}
