//! `stocksync-core`: domain primitives shared by the sync crates.
//!
//! This crate contains **pure domain** types (no IO, no HTTP, no settings).

pub mod error;
pub mod id;
pub mod quantity;
pub mod sku;
pub mod subject;

pub use error::DomainError;
pub use id::{PartId, StockItemId};
pub use quantity::{ABSOLUTE_TOLERANCE, RELATIVE_TOLERANCE, quantities_match};
pub use sku::Sku;
pub use subject::SyncSubject;
