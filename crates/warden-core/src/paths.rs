//! Coordination-state path conventions.
//!
//! Provides the canonical locations of the files shared between the
//! supervisor, the child process, and later `stop` / `status` invocations.

use std::path::{Path, PathBuf};

/// Locations of a server's coordination files.
///
/// Location: `<storage>/logs/<server>-server-state.json` and
/// `<storage>/logs/<server>-server.pid`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerStatePaths {
    /// Handshake file read by the child at startup.
    pub state_file: PathBuf,
    /// Pid file recording the supervised child.
    pub pid_file: PathBuf,
}

impl ServerStatePaths {
    /// Derive the coordination paths for `server` under `storage_path`.
    pub fn new(storage_path: impl AsRef<Path>, server: &str) -> Self {
        let dir = storage_path.as_ref().join("logs");
        Self {
            state_file: dir.join(format!("{server}-server-state.json")),
            pid_file: dir.join(format!("{server}-server.pid")),
        }
    }

    /// Directory holding both files.
    pub fn dir(&self) -> &Path {
        self.state_file.parent().unwrap_or_else(|| Path::new("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn files_live_under_storage_logs() {
        let paths = ServerStatePaths::new("/srv/app/storage", "swoole");
        assert_eq!(
            paths.state_file,
            PathBuf::from("/srv/app/storage/logs/swoole-server-state.json")
        );
        assert_eq!(
            paths.pid_file,
            PathBuf::from("/srv/app/storage/logs/swoole-server.pid")
        );
        assert_eq!(paths.dir(), Path::new("/srv/app/storage/logs"));
    }
}
