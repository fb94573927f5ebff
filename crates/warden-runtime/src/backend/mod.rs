//! Worker-server backend implementations.

mod swoole;

pub use swoole::SwooleBackend;
