//! In-memory parts/stock catalog implementing [`SubjectResolver`].
//!
//! Mirrors the host's domain model closely enough for embedded use and tests:
//! a part is identified by its name (the SKU), and its authoritative
//! quantity is the sum over all of its stock items at lookup time.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use tracing::debug;

use stocksync_core::{PartId, Sku, StockItemId, SyncSubject};
use stocksync_events::NotificationPayload;

use crate::resolver::{ResolveError, SubjectResolver};

/// One quantity of a part at one location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StockItemRecord {
    pub part_id: PartId,
    pub quantity: f64,
}

/// Tables recover from a poisoned lock: every write is a single insert or
/// remove, so the maps are never left half-updated.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    parts: RwLock<HashMap<PartId, String>>,
    stock: RwLock<HashMap<StockItemId, StockItemRecord>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert_part(&self, id: PartId, name: impl Into<String>) {
        let name = name.into();
        self.parts
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, name);
    }

    pub fn upsert_stock_item(&self, id: StockItemId, part_id: PartId, quantity: f64) {
        self.stock
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, StockItemRecord { part_id, quantity });
    }

    pub fn remove_stock_item(&self, id: StockItemId) -> Option<StockItemRecord> {
        self.stock
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
    }

    pub fn stock_item(&self, id: StockItemId) -> Option<StockItemRecord> {
        self.stock
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .copied()
    }

    /// Sum of the part's quantity across every location.
    pub fn total_stock(&self, part_id: PartId) -> f64 {
        self.stock
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|item| item.part_id == part_id)
            .map(|item| item.quantity)
            .sum()
    }

    fn subject_for_part(&self, part_id: PartId) -> Result<Option<SyncSubject>, ResolveError> {
        let name = self
            .parts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&part_id)
            .cloned();

        let Some(name) = name else {
            debug!(part_id = %part_id, "part not found");
            return Ok(None);
        };

        let Ok(sku) = Sku::new(name) else {
            debug!(part_id = %part_id, "part has no name, skipping sync");
            return Ok(None);
        };

        let total = self.total_stock(part_id);
        Ok(Some(SyncSubject::new(sku, total)?))
    }
}

#[async_trait]
impl SubjectResolver for InMemoryCatalog {
    async fn resolve_from_stock_change(
        &self,
        payload: &NotificationPayload,
    ) -> Result<Option<SyncSubject>, ResolveError> {
        let Some(stock_item_id) = payload.stock_item_id() else {
            return Ok(None);
        };

        let Some(item) = self.stock_item(stock_item_id) else {
            debug!(stock_item = %stock_item_id, "stock item not found (may have been deleted)");
            return Ok(None);
        };

        self.subject_for_part(item.part_id)
    }

    async fn resolve_by_id(&self, part_id: PartId) -> Result<Option<SyncSubject>, ResolveError> {
        self.subject_for_part(part_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> InMemoryCatalog {
        let catalog = InMemoryCatalog::new();
        catalog.upsert_part(PartId::new(1), "WIDGET-1");
        catalog.upsert_stock_item(StockItemId::new(10), PartId::new(1), 30.0);
        catalog.upsert_stock_item(StockItemId::new(11), PartId::new(1), 12.0);
        catalog.upsert_part(PartId::new(2), "GADGET");
        catalog.upsert_stock_item(StockItemId::new(20), PartId::new(2), 7.5);
        catalog
    }

    #[tokio::test]
    async fn stock_change_resolves_to_part_total() {
        let catalog = catalog();
        let payload = NotificationPayload::new().with("id", 11);

        let subject = catalog.resolve_from_stock_change(&payload).await.unwrap().unwrap();

        assert_eq!(subject.sku().as_str(), "WIDGET-1");
        assert_eq!(subject.authoritative_quantity(), 42.0);
    }

    #[tokio::test]
    async fn totals_are_read_fresh() {
        let catalog = catalog();
        catalog.remove_stock_item(StockItemId::new(10));

        let subject = catalog.resolve_by_id(PartId::new(1)).await.unwrap().unwrap();
        assert_eq!(subject.authoritative_quantity(), 12.0);
    }

    #[tokio::test]
    async fn unknown_references_resolve_to_none() {
        let catalog = catalog();
        let payload = NotificationPayload::new().with("id", 999);

        assert!(catalog.resolve_from_stock_change(&payload).await.unwrap().is_none());
        assert!(catalog.resolve_from_stock_change(&NotificationPayload::new()).await.unwrap().is_none());
        assert!(catalog.resolve_by_id(PartId::new(404)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unnamed_part_is_not_syncable() {
        let catalog = catalog();
        catalog.upsert_part(PartId::new(3), "  ");
        catalog.upsert_stock_item(StockItemId::new(30), PartId::new(3), 1.0);

        assert!(catalog.resolve_by_id(PartId::new(3)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn poisoned_stock_table_still_yields_the_real_total() {
        let catalog = catalog();
        let poisoned = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = catalog.stock.write().unwrap();
            panic!("writer died holding the lock");
        }));
        assert!(poisoned.is_err());
        assert!(catalog.stock.is_poisoned());

        let subject = catalog.resolve_by_id(PartId::new(1)).await.unwrap().unwrap();
        assert_eq!(subject.authoritative_quantity(), 42.0);

        catalog.upsert_stock_item(StockItemId::new(12), PartId::new(1), 8.0);
        assert_eq!(catalog.total_stock(PartId::new(1)), 50.0);
    }

    #[tokio::test]
    async fn negative_totals_are_invalid() {
        let catalog = catalog();
        catalog.upsert_stock_item(StockItemId::new(21), PartId::new(2), -10.0);

        let err = catalog.resolve_by_id(PartId::new(2)).await.unwrap_err();
        assert!(matches!(err, ResolveError::Invalid(_)));
    }
}
