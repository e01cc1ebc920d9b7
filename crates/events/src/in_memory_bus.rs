//! In-memory notification bus for embedded hosts and tests.

use std::sync::{Mutex, mpsc};

use crate::Notification;
use crate::bus::{BusError, NotificationBus, Subscription};

/// In-memory pub/sub bus.
///
/// - No IO
/// - Best-effort fan-out; dropped subscribers are pruned on publish
#[derive(Debug, Default)]
pub struct InMemoryNotificationBus {
    subscribers: Mutex<Vec<mpsc::Sender<Notification>>>,
}

impl InMemoryNotificationBus {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NotificationBus for InMemoryNotificationBus {
    fn publish(&self, notification: Notification) -> Result<(), BusError> {
        let mut subs = self.subscribers.lock().map_err(|_| BusError::Poisoned)?;

        subs.retain(|tx| tx.send(notification.clone()).is_ok());

        Ok(())
    }

    fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::channel();

        // A poisoned lock still yields a subscription; it just never receives.
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.push(tx);
        }

        Subscription::new(rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NotificationPayload;

    fn subscriber_count(bus: &InMemoryNotificationBus) -> usize {
        bus.subscribers.lock().unwrap().len()
    }

    #[test]
    fn every_subscriber_gets_a_copy() {
        let bus = InMemoryNotificationBus::new();
        let a = bus.subscribe();
        let b = bus.subscribe();

        bus.publish(Notification::new(
            "stockitem.moved",
            NotificationPayload::new().with("id", 1),
        ))
        .unwrap();

        assert_eq!(a.try_recv().unwrap().kind(), "stockitem.moved");
        assert_eq!(b.try_recv().unwrap().kind(), "stockitem.moved");
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let bus = InMemoryNotificationBus::new();
        let kept = bus.subscribe();
        drop(bus.subscribe());
        assert_eq!(subscriber_count(&bus), 2);

        bus.publish(Notification::new("stockitem.split", NotificationPayload::new()))
            .unwrap();

        assert_eq!(subscriber_count(&bus), 1);
        assert!(kept.try_recv().is_ok());
    }
}
