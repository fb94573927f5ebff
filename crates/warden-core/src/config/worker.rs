//! Worker count option values.

use std::fmt;
use std::str::FromStr;

use crate::error::SupervisorError;

/// A worker count as supplied by the operator.
///
/// Only ever carried as far as [`resolve`](super::resolve); the handshake file
/// always receives a concrete number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkerCount {
    /// Use one worker per logical CPU.
    #[default]
    Auto,
    /// An explicit count. Range checks happen during resolution.
    Fixed(i64),
}

impl FromStr for WorkerCount {
    type Err = SupervisorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("auto") {
            return Ok(Self::Auto);
        }

        trimmed.parse::<i64>().map(Self::Fixed).map_err(|_| {
            SupervisorError::configuration(format!(
                "expected a worker count or \"auto\", got {s:?}"
            ))
        })
    }
}

impl fmt::Display for WorkerCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("auto"),
            Self::Fixed(n) => write!(f, "{n}"),
        }
    }
}
