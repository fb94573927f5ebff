//! Core domain types and port definitions for warden.
//!
//! This crate holds everything about a supervised launch that does not touch
//! the operating system directly: raw launch options, the resolved
//! [`LaunchConfiguration`] handed to the child through the handshake file,
//! the error taxonomy with its exit codes, and the port traits that the
//! runtime crate implements.

#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod paths;
pub mod ports;

// Re-export commonly used types for convenience
pub use config::{LaunchConfiguration, LaunchOptions, WorkerCount, resolve};
pub use error::{SupervisorError, SupervisorResult};
pub use paths::ServerStatePaths;
pub use ports::{InstanceProbe, ReportSink, ServerBackend, ServerStopper};
