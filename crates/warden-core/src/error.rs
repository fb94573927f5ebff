//! Supervisor error taxonomy and exit-code mapping.
//!
//! Every failure the supervisor can hit is detected locally and turned into a
//! single user-facing message plus a process exit code.

use std::io;
use thiserror::Error;

/// Errors that abort or end a supervised launch.
#[derive(Debug, Error)]
pub enum SupervisorError {
    /// A launch option had an invalid value. No process was spawned.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A filesystem operation on coordination state failed.
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    /// The child process could not be created.
    #[error("Failed to start server process: {0}")]
    Spawn(String),

    /// The liveness check reported an instance already running.
    #[error("{server} server is already running")]
    AlreadyRunning { server: String },

    /// The native runtime extension required by the backend is missing.
    #[error("The {backend} extension is missing. Install it before starting the server.")]
    RuntimeMissing { backend: String },

    /// The child terminated on its own with a non-zero status.
    #[error("Server process exited with status {code}")]
    ChildExited { code: i32 },
}

impl SupervisorError {
    /// Create a `Configuration` error with a message
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Wrap an IO error with a short description of what was being done
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Map error to the supervisor's process exit code.
    ///
    /// Exit codes follow Unix conventions (see sysexits.h), except that a
    /// child exit status is propagated unchanged:
    /// - 1: General error (already running, runtime missing)
    /// - 71: `EX_OSERR` (spawn failure)
    /// - 74: `EX_IOERR` (handshake or pid file failure)
    /// - 78: `EX_CONFIG` (bad option values)
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Configuration(_) => 78,
            Self::Io { .. } => 74,
            Self::Spawn(_) => 71,
            Self::AlreadyRunning { .. } | Self::RuntimeMissing { .. } => 1,
            Self::ChildExited { code } => *code,
        }
    }
}

/// Result type alias for supervisor operations
pub type SupervisorResult<T> = Result<T, SupervisorError>;
