//! Shared utilities

pub mod tsid;

pub use tsid::{prefixes, IdGenerator};
