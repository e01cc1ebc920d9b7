use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use uuid::Uuid;

use stocksync_core::{PartId, StockItemId};

/// Key of the stock item reference in a host payload.
pub const STOCK_ITEM_KEY: &str = "id";

/// Key of the owning part reference, present on deletions.
pub const PART_KEY: &str = "part_id";

/// Free-form key/value payload delivered with a notification.
///
/// Host systems are loose about id types, so numeric references may arrive
/// either as JSON numbers or as decimal strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationPayload(Map<String, JsonValue>);

impl NotificationPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.0.get(key)
    }

    /// The stock item this notification is about, if the payload names one.
    pub fn stock_item_id(&self) -> Option<StockItemId> {
        self.numeric(STOCK_ITEM_KEY).map(StockItemId::new)
    }

    /// The owning part, supplied explicitly for deletions.
    pub fn part_id(&self) -> Option<PartId> {
        self.numeric(PART_KEY).map(PartId::new)
    }

    // Zero is treated as "no reference", like a falsy primary key.
    fn numeric(&self, key: &str) -> Option<u64> {
        let raw = match self.0.get(key)? {
            JsonValue::Number(n) => n.as_u64()?,
            JsonValue::String(s) => s.trim().parse::<u64>().ok()?,
            _ => return None,
        };
        (raw != 0).then_some(raw)
    }
}

/// One inventory-change notification as delivered by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    notification_id: Uuid,
    kind: String,
    payload: NotificationPayload,
    received_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(kind: impl Into<String>, payload: NotificationPayload) -> Self {
        Self {
            notification_id: Uuid::now_v7(),
            kind: kind.into(),
            payload,
            received_at: Utc::now(),
        }
    }

    pub fn notification_id(&self) -> Uuid {
        self.notification_id
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn payload(&self) -> &NotificationPayload {
        &self.payload
    }

    pub fn received_at(&self) -> DateTime<Utc> {
        self.received_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_references_accept_numbers_and_strings() {
        let payload = NotificationPayload::new().with("id", 12).with("part_id", "7");
        assert_eq!(payload.stock_item_id(), Some(StockItemId::new(12)));
        assert_eq!(payload.part_id(), Some(PartId::new(7)));
    }

    #[test]
    fn missing_or_falsy_references_are_none() {
        let payload = NotificationPayload::new()
            .with("id", 0)
            .with("part_id", json!(null));
        assert_eq!(payload.stock_item_id(), None);
        assert_eq!(payload.part_id(), None);
        assert_eq!(NotificationPayload::new().stock_item_id(), None);
        assert_eq!(NotificationPayload::new().with("id", "x1").stock_item_id(), None);
    }

    #[test]
    fn payload_deserializes_from_plain_object() {
        let payload: NotificationPayload =
            serde_json::from_value(json!({"id": 3, "model": "StockItem"})).unwrap();
        assert_eq!(payload.stock_item_id(), Some(StockItemId::new(3)));
        assert_eq!(payload.get("model"), Some(&json!("StockItem")));
    }
}
