//! Handle to a spawned server process.

use std::fmt;
use std::io;
use std::process::ExitStatus;
use std::time::Duration;

use tokio::process::Child;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::debug;

use super::shutdown::ChildSignal;
#[cfg(unix)]
use super::shutdown::send_signal;
use super::stream::spawn_stream_reader;

/// Which of the child's output streams a chunk came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    Stdout,
    Stderr,
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdout => f.write_str("stdout"),
            Self::Stderr => f.write_str("stderr"),
        }
    }
}

/// Raw bytes read from one of the child's streams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputChunk {
    pub stream: StreamKind,
    pub bytes: Vec<u8>,
}

impl OutputChunk {
    /// Create a chunk for `stream`
    pub fn new(stream: StreamKind, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            stream,
            bytes: bytes.into(),
        }
    }
}

/// A spawned child process and its captured output.
///
/// Owned by the lifecycle controller for its whole lifetime. Output is read
/// by background tasks and buffered in a channel, so draining never blocks.
#[derive(Debug)]
pub struct ProcessHandle {
    pid: u32,
    child: Child,
    output: mpsc::UnboundedReceiver<OutputChunk>,
    readers: Vec<JoinHandle<()>>,
    exit_status: Option<ExitStatus>,
}

impl ProcessHandle {
    /// Take ownership of a freshly spawned child with piped stdout/stderr.
    pub(crate) fn new(mut child: Child) -> io::Result<Self> {
        let pid = child
            .id()
            .ok_or_else(|| io::Error::other("child exited before its PID was read"))?;

        let (tx, output) = mpsc::unbounded_channel();
        let mut readers = Vec::with_capacity(2);

        if let Some(stdout) = child.stdout.take() {
            readers.push(spawn_stream_reader(stdout, StreamKind::Stdout, tx.clone()));
        }
        if let Some(stderr) = child.stderr.take() {
            readers.push(spawn_stream_reader(stderr, StreamKind::Stderr, tx));
        }

        Ok(Self {
            pid,
            child,
            output,
            readers,
            exit_status: None,
        })
    }

    /// Process ID of the child
    pub const fn pid(&self) -> u32 {
        self.pid
    }

    /// Exit status, once the child has been reaped
    pub const fn exit_status(&self) -> Option<ExitStatus> {
        self.exit_status
    }

    /// Whether the child is still running as far as this handle knows
    pub const fn is_running(&self) -> bool {
        self.exit_status.is_none()
    }

    /// Non-blocking liveness check; reaps the child if it has exited.
    pub fn try_wait(&mut self) -> io::Result<Option<ExitStatus>> {
        if self.exit_status.is_none() {
            self.exit_status = self.child.try_wait()?;
        }
        Ok(self.exit_status)
    }

    /// Everything the child has written since the previous call.
    ///
    /// Never blocks; returns an empty vector when nothing is ready.
    pub fn read_available(&mut self) -> Vec<OutputChunk> {
        let mut chunks = Vec::new();
        while let Ok(chunk) = self.output.try_recv() {
            chunks.push(chunk);
        }
        chunks
    }

    /// Send a termination signal to the child (not to its process group).
    ///
    /// On platforms without signals this terminates the child immediately.
    pub fn signal(&mut self, signal: ChildSignal) -> io::Result<()> {
        if !self.is_running() {
            return Ok(());
        }

        #[cfg(unix)]
        {
            send_signal(self.pid, signal)
        }

        #[cfg(not(unix))]
        {
            let _ = signal;
            self.child.start_kill()
        }
    }

    /// Forcibly terminate the child and reap it.
    pub async fn kill(&mut self) -> io::Result<ExitStatus> {
        if let Some(status) = self.exit_status {
            return Ok(status);
        }

        // Child::kill sends SIGKILL on Unix and waits for the process
        self.child.kill().await?;
        let status = self.child.wait().await?;
        self.exit_status = Some(status);
        Ok(status)
    }

    /// Wait for the output readers to reach EOF, up to `limit`.
    ///
    /// Grandchildren holding the pipes open would otherwise keep the readers
    /// alive forever.
    pub async fn wait_for_readers(&mut self, limit: Duration) {
        for reader in self.readers.drain(..) {
            match timeout(limit, reader).await {
                Ok(_) => {}
                Err(_) => debug!(pid = %self.pid, "output reader still open after child exit"),
            }
        }
    }
}

/// Convert an exit status into the supervisor's exit code.
///
/// A child killed by a signal maps to `128 + signal`, as shells report it.
pub fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        status.signal().map_or(1, |signal| 128 + signal)
    }

    #[cfg(not(unix))]
    {
        1
    }
}
