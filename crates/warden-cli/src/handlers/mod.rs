//! Command handlers.
//!
//! Handlers follow the canonical pattern:
//! - Signature: `pub async fn execute(config: &CliConfig, ...) -> SupervisorResult<i32>`
//! - The returned integer is the process exit code
//! - Failures are returned as `SupervisorError` and mapped to exit codes by `main`

pub mod start;
pub mod status;
pub mod stop;
