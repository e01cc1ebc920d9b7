//! Fault-tolerant client for the remote shop's legacy single-stock inventory API.
//!
//! Three operations are exposed: fetch a stock record by SKU, update it, and a
//! connectivity probe. Transient failures are retried at the transport level;
//! "SKU unknown remotely" is an ordinary result, not an error.

pub mod client;
pub mod config;
pub mod error;
pub mod record;
pub mod retry;

pub use client::RemoteInventoryClient;
pub use config::{ClientConfig, ClientOptions, ConfigError};
pub use error::RemoteClientError;
pub use record::{RemoteStockRecord, StockItemUpdate};
pub use retry::RetryPolicy;
