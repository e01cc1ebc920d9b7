//! Reconciliation engine: keeps the remote stock quantity of each SKU equal to
//! the locally authoritative total.
//!
//! Per notification: filter by kind, read settings fresh, resolve the subject,
//! fetch the remote record, compare with tolerance, and (unless in log-only
//! mode) write the local quantity back. Every outcome is logged; nothing is
//! raised to the host.

pub mod catalog;
pub mod client_slot;
pub mod engine;
pub mod resolver;
pub mod settings;

pub use catalog::InMemoryCatalog;
pub use client_slot::ClientSlot;
pub use engine::{ReconcileOutcome, ReconciliationEngine};
pub use resolver::{ResolveError, SubjectResolver};
pub use settings::{
    EnvSettings, InMemorySettings, SETTINGS, SettingDefinition, SettingsProvider, SyncPolicy,
    SyncSettings,
};
