//! Process-wide logging setup for sync hosts.
//!
//! Library crates only emit `tracing` events; binaries call [`init`] or
//! [`init_with`] once at startup.

pub mod tracing;

pub use crate::tracing::{LogConfig, LogFormat, init, init_with};
