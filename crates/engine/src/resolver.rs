use async_trait::async_trait;
use thiserror::Error;

use stocksync_core::{DomainError, PartId, SyncSubject};
use stocksync_events::NotificationPayload;

#[derive(Debug, Error)]
pub enum ResolveError {
    /// The backing store failed unexpectedly.
    #[error("subject lookup failed: {0}")]
    Lookup(String),

    /// The stored data cannot form a valid subject.
    #[error("invalid subject: {0}")]
    Invalid(#[from] DomainError),
}

/// Host-side lookup from notifications to sync subjects.
///
/// Both methods recompute the authoritative quantity at call time.
/// `Ok(None)` means "nothing to sync" (record gone, no usable SKU) and is
/// routine; `Err` is reserved for unexpected lookup failures.
#[async_trait]
pub trait SubjectResolver: Send + Sync {
    /// Resolve the stock item referenced by `payload` to its owning subject.
    async fn resolve_from_stock_change(
        &self,
        payload: &NotificationPayload,
    ) -> Result<Option<SyncSubject>, ResolveError>;

    /// Resolve a part directly; used for deletions, where the stock item is gone.
    async fn resolve_by_id(&self, part_id: PartId) -> Result<Option<SyncSubject>, ResolveError>;
}

#[async_trait]
impl<R> SubjectResolver for std::sync::Arc<R>
where
    R: SubjectResolver + ?Sized,
{
    async fn resolve_from_stock_change(
        &self,
        payload: &NotificationPayload,
    ) -> Result<Option<SyncSubject>, ResolveError> {
        (**self).resolve_from_stock_change(payload).await
    }

    async fn resolve_by_id(&self, part_id: PartId) -> Result<Option<SyncSubject>, ResolveError> {
        (**self).resolve_by_id(part_id).await
    }
}
