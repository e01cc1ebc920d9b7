use async_trait::async_trait;

use crate::Notification;

/// Consumer of host notifications.
///
/// The host calls [`wants_notification`](Self::wants_notification) for every
/// event it emits, so implementations must answer without IO. Only accepted
/// notifications are passed to [`handle`](Self::handle), which may block on
/// network calls and must never fail: outcomes are reported, not raised.
///
/// Delivery is at-least-once, so handlers must tolerate duplicates.
#[async_trait]
pub trait NotificationHandler: Send + Sync {
    type Outcome: Send;

    fn wants_notification(&self, kind: &str) -> bool;

    async fn handle(&self, notification: &Notification) -> Self::Outcome;
}
