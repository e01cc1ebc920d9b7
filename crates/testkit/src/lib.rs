//! Test harness for the sync crates.
//!
//! - [`MockRemote`]: an in-process stand-in for the remote inventory API
//! - [`LogCapture`]: collects formatted `tracing` output for assertions
//!
//! Only for `[dev-dependencies]`.

pub mod logs;
pub mod mock_remote;

pub use logs::LogCapture;
pub use mock_remote::{MockRemote, RecordedRequest};
