//! The `warden` command-line interface.
//!
//! Parses arguments, composes the runtime in [`bootstrap`] and dispatches to
//! the command [`handlers`].

#![deny(unsafe_code)]

pub mod bootstrap;
pub mod commands;
pub mod handlers;
pub mod parser;
pub mod presentation;

pub use bootstrap::CliConfig;
pub use commands::{Commands, StartArgs};
pub use parser::Cli;
