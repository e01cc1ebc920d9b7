//! Stock-change notifications and their delivery mechanics.
//!
//! The host inventory system emits one notification per stock change. This
//! crate names the notification kinds the sync cares about, models the payload,
//! and provides the handler seam plus an in-memory bus/worker pair for hosts
//! that want processing off the delivering thread.

pub mod bus;
pub mod handler;
pub mod in_memory_bus;
pub mod kind;
pub mod notification;
pub mod worker;

pub use bus::{BusError, NotificationBus, Subscription};
pub use handler::NotificationHandler;
pub use in_memory_bus::InMemoryNotificationBus;
pub use kind::StockEventKind;
pub use notification::{Notification, NotificationPayload};
pub use worker::{NotificationWorker, WorkerHandle};
