//! Launch options and their resolution into a concrete configuration.
//!
//! - `WorkerCount` - `auto` sentinel or an explicit count, parsed from the CLI
//! - `LaunchOptions` - raw option set as the operator supplied it
//! - `LaunchConfiguration` - resolved, immutable, serialized into the handshake file
//! - `resolve` - the only place the `auto` sentinel is turned into a number

mod launch;
mod options;
mod resolve;
mod worker;

pub use launch::LaunchConfiguration;
pub use options::{DEFAULT_HOST, DEFAULT_MAX_REQUESTS, DEFAULT_PORT, LaunchOptions};
pub use resolve::resolve;
pub use worker::WorkerCount;
