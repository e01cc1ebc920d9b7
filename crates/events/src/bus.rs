//! Notification publishing/subscription abstraction (mechanics only).
//!
//! Delivery is **at-least-once** and carries no ordering guarantee between
//! publishers. Consumers must be idempotent, which reconciliation is: it
//! always converges the remote side on the current local quantity.

use std::sync::Arc;
use std::sync::mpsc::Receiver;
use std::time::Duration;

use thiserror::Error;

use crate::Notification;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BusError {
    /// Publish failed due to internal lock poisoning.
    #[error("notification bus lock poisoned")]
    Poisoned,
}

/// A subscription to the notification stream.
///
/// Each subscription receives a copy of every published notification.
/// Intended for consumption by a single thread.
#[derive(Debug)]
pub struct Subscription {
    receiver: Receiver<Notification>,
}

impl Subscription {
    pub fn new(receiver: Receiver<Notification>) -> Self {
        Self { receiver }
    }

    /// Block until the next notification is available.
    pub fn recv(&self) -> Result<Notification, std::sync::mpsc::RecvError> {
        self.receiver.recv()
    }

    pub fn try_recv(&self) -> Result<Notification, std::sync::mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Block for up to `timeout` waiting for a notification.
    pub fn recv_timeout(
        &self,
        timeout: Duration,
    ) -> Result<Notification, std::sync::mpsc::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }
}

/// Broadcast channel between the host event system and sync workers.
pub trait NotificationBus: Send + Sync {
    fn publish(&self, notification: Notification) -> Result<(), BusError>;

    fn subscribe(&self) -> Subscription;
}

impl<B> NotificationBus for Arc<B>
where
    B: NotificationBus + ?Sized,
{
    fn publish(&self, notification: Notification) -> Result<(), BusError> {
        (**self).publish(notification)
    }

    fn subscribe(&self) -> Subscription {
        (**self).subscribe()
    }
}
