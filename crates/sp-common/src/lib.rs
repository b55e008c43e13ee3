//! Shared building blocks for SaaS Platform binaries.

pub mod logging;

pub use logging::{init_logging, LogFormat};
