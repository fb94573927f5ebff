//! Async stream readers (non-UTF8-safe).
//!
//! The child can emit arbitrary bytes on stdout/stderr, and may write partial
//! lines. Readers therefore forward raw chunks as they arrive; line splitting
//! and lossy decoding happen in the output multiplexer.

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use super::handle::{OutputChunk, StreamKind};

const READ_BUFFER_SIZE: usize = 8 * 1024;

/// Spawn a task copying everything from `stream` into `tx` until EOF.
pub fn spawn_stream_reader(
    mut stream: impl AsyncRead + Unpin + Send + 'static,
    kind: StreamKind,
    tx: mpsc::UnboundedSender<OutputChunk>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut buf = vec![0_u8; READ_BUFFER_SIZE];

        loop {
            match stream.read(&mut buf).await {
                Ok(0) => break, // EOF
                Ok(n) => {
                    let chunk = OutputChunk::new(kind, buf[..n].to_vec());
                    if tx.send(chunk).is_err() {
                        debug!(stream = %kind, "output receiver dropped");
                        break;
                    }
                }
                Err(e) => {
                    debug!(stream = %kind, error = %e, "output reader exiting due to read error");
                    break;
                }
            }
        }

        debug!(stream = %kind, "output reader task exiting");
    })
}
