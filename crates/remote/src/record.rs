//! Wire shapes of the legacy stock-item endpoints.

use serde::{Deserialize, Deserializer, Serialize};

/// Remote view of one SKU's inventory. A snapshot; never cached.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RemoteStockRecord {
    #[serde(default, deserialize_with = "lenient_item_id")]
    item_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_quantity")]
    qty: f64,
    #[serde(default)]
    is_in_stock: bool,
}

impl RemoteStockRecord {
    /// Remote item identifier required for updates; `0` counts as missing.
    pub fn item_id(&self) -> Option<i64> {
        self.item_id.filter(|id| *id != 0)
    }

    pub fn quantity(&self) -> f64 {
        self.qty
    }

    /// The remote's own availability flag. May disagree with `quantity > 0`.
    pub fn is_in_stock(&self) -> bool {
        self.is_in_stock
    }
}

// The API is known to send numbers as JSON numbers, numeric strings, or null.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Integer(i64),
    Number(f64),
    Text(String),
}

fn lenient_quantity<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    use RawNumber as Raw;

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(0.0),
        Some(Raw::Integer(n)) => Ok(n as f64),
        Some(Raw::Number(n)) => Ok(n),
        Some(Raw::Text(s)) if s.trim().is_empty() => Ok(0.0),
        Some(Raw::Text(s)) => s.trim().parse::<f64>().map_err(serde::de::Error::custom),
    }
}

// An id that is not a whole number cannot address the update endpoint.
fn lenient_item_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RawNumber>::deserialize(deserializer)? {
        Some(RawNumber::Integer(n)) => Some(n),
        Some(RawNumber::Text(s)) => s.trim().parse::<i64>().ok(),
        Some(RawNumber::Number(_)) | None => None,
    })
}

/// Body of `PUT /products/{sku}/stockItems/{item_id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockItemUpdate {
    #[serde(rename = "stockItem")]
    pub stock_item: StockItemFields,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockItemFields {
    pub qty: f64,
    pub is_in_stock: bool,
}

impl StockItemUpdate {
    /// Without an override the flag follows the quantity.
    pub fn new(qty: f64, in_stock_override: Option<bool>) -> Self {
        Self {
            stock_item: StockItemFields {
                qty,
                is_in_stock: in_stock_override.unwrap_or(qty > 0.0),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_full_record_and_ignores_extra_fields() {
        let record: RemoteStockRecord = serde_json::from_value(json!({
            "item_id": 123, "qty": 75.5, "is_in_stock": true, "min_qty": 0, "stock_id": 1
        }))
        .unwrap();
        assert_eq!(record.item_id(), Some(123));
        assert_eq!(record.quantity(), 75.5);
        assert!(record.is_in_stock());
    }

    #[test]
    fn missing_quantity_defaults_to_zero() {
        let record: RemoteStockRecord = serde_json::from_value(json!({"item_id": 5})).unwrap();
        assert_eq!(record.quantity(), 0.0);
        assert!(!record.is_in_stock());

        let record: RemoteStockRecord =
            serde_json::from_value(json!({"item_id": 5, "qty": null})).unwrap();
        assert_eq!(record.quantity(), 0.0);
    }

    #[test]
    fn string_quantities_are_accepted() {
        let record: RemoteStockRecord =
            serde_json::from_value(json!({"item_id": 5, "qty": "12.25"})).unwrap();
        assert_eq!(record.quantity(), 12.25);
        assert!(serde_json::from_value::<RemoteStockRecord>(json!({"qty": "lots"})).is_err());
    }

    #[test]
    fn zero_item_id_counts_as_missing() {
        let record: RemoteStockRecord =
            serde_json::from_value(json!({"item_id": 0, "qty": 1})).unwrap();
        assert_eq!(record.item_id(), None);
    }

    #[test]
    fn string_item_ids_are_accepted() {
        let record: RemoteStockRecord =
            serde_json::from_value(json!({"item_id": "9", "qty": 40})).unwrap();
        assert_eq!(record.item_id(), Some(9));

        let record: RemoteStockRecord =
            serde_json::from_value(json!({"item_id": "n/a", "qty": 40})).unwrap();
        assert_eq!(record.item_id(), None);
        assert_eq!(record.quantity(), 40.0);
    }

    #[test]
    fn update_body_shape() {
        let body = serde_json::to_value(StockItemUpdate::new(100.0, None)).unwrap();
        assert_eq!(body, json!({"stockItem": {"qty": 100.0, "is_in_stock": true}}));

        let body = serde_json::to_value(StockItemUpdate::new(0.0, None)).unwrap();
        assert_eq!(body["stockItem"]["is_in_stock"], json!(false));

        let body = serde_json::to_value(StockItemUpdate::new(0.0, Some(true))).unwrap();
        assert_eq!(body["stockItem"]["is_in_stock"], json!(true));
    }
}
