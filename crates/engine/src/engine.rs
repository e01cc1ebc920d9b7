use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use stocksync_core::{SyncSubject, quantities_match};
use stocksync_events::{Notification, NotificationHandler, NotificationPayload, StockEventKind};
use stocksync_remote::{ClientConfig, ClientOptions, ConfigError, RemoteInventoryClient};

use crate::client_slot::ClientSlot;
use crate::resolver::SubjectResolver;
use crate::settings::{SettingsProvider, SyncPolicy, SyncSettings};

/// Terminal state of one reconciliation attempt.
///
/// Informational only: every state is already logged, and none is an error
/// from the host's point of view.
#[derive(Debug, Clone, PartialEq)]
pub enum ReconcileOutcome {
    /// Notification kind is not stock-related.
    FilteredOut,
    /// `SYNC_ENABLED` is off.
    PolicyDisabled,
    /// URL or token missing (or unusable).
    Unconfigured,
    /// No subject could be derived from the notification.
    Unresolvable,
    /// The SKU does not exist remotely.
    RemoteAbsent,
    InSync,
    /// Log-only mode: the write that would have happened.
    WouldUpdate { remote: f64, local: f64 },
    Updated { remote: f64, local: f64 },
    /// The remote record vanished or lost its item id between fetch and write.
    UpdateFailed,
    /// A `RemoteClientError` was caught and logged.
    RemoteError,
}

impl core::fmt::Display for ReconcileOutcome {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ReconcileOutcome::FilteredOut => f.write_str("filtered out"),
            ReconcileOutcome::PolicyDisabled => f.write_str("sync disabled"),
            ReconcileOutcome::Unconfigured => f.write_str("remote not configured"),
            ReconcileOutcome::Unresolvable => f.write_str("subject unresolvable"),
            ReconcileOutcome::RemoteAbsent => f.write_str("SKU absent remotely"),
            ReconcileOutcome::InSync => f.write_str("already in sync"),
            ReconcileOutcome::WouldUpdate { remote, local } => {
                write!(f, "would update remote {remote} -> {local} (log only)")
            }
            ReconcileOutcome::Updated { remote, local } => {
                write!(f, "updated remote {remote} -> {local}")
            }
            ReconcileOutcome::UpdateFailed => f.write_str("update failed"),
            ReconcileOutcome::RemoteError => f.write_str("remote error"),
        }
    }
}

/// Drives the remote inventory towards local authoritative quantities.
///
/// Safe to share across tasks: the only mutable state is the settings-keyed
/// client slot.
#[derive(Debug)]
pub struct ReconciliationEngine<S, R> {
    settings: S,
    resolver: R,
    clients: ClientSlot,
    client_options: ClientOptions,
}

impl<S, R> ReconciliationEngine<S, R>
where
    S: SettingsProvider,
    R: SubjectResolver,
{
    pub fn new(settings: S, resolver: R) -> Self {
        Self::with_client_options(settings, resolver, ClientOptions::default())
    }

    pub fn with_client_options(settings: S, resolver: R, client_options: ClientOptions) -> Self {
        Self {
            settings,
            resolver,
            clients: ClientSlot::new(),
            client_options,
        }
    }

    /// Cheap synchronous relevance check; no IO.
    pub fn wants_notification(&self, kind: &str) -> bool {
        StockEventKind::is_relevant(kind)
    }

    /// Configuration of the client currently in use, if one has been built.
    pub fn active_client_config(&self) -> Option<ClientConfig> {
        self.clients.current_config()
    }

    /// Connectivity probe with the current settings. `false` when unconfigured.
    pub async fn probe(&self) -> bool {
        let settings = SyncSettings::load(&self.settings);
        match self.client(settings.client) {
            Some(client) => client.test_connection().await,
            None => false,
        }
    }

    /// Reconcile the subject behind one notification.
    pub async fn handle(&self, kind: &str, payload: &NotificationPayload) -> ReconcileOutcome {
        let Some(event) = StockEventKind::parse(kind) else {
            debug!(kind, "not a stock notification, ignoring");
            return ReconcileOutcome::FilteredOut;
        };

        let settings = SyncSettings::load(&self.settings);
        if !settings.policy.enabled {
            debug!(event = %event, "sync disabled, ignoring notification");
            return ReconcileOutcome::PolicyDisabled;
        }

        let Some(client) = self.client(settings.client) else {
            return ReconcileOutcome::Unconfigured;
        };

        let Some(stock_item_id) = payload.stock_item_id() else {
            debug!(event = %event, "notification has no stock item reference");
            return ReconcileOutcome::Unresolvable;
        };

        let resolved = if event.is_deletion() {
            // The stock item row is gone; only the payload knows its part.
            let Some(part_id) = payload.part_id() else {
                debug!(
                    event = %event,
                    stock_item = %stock_item_id,
                    "deleted stock item has no part reference, skipping"
                );
                return ReconcileOutcome::Unresolvable;
            };
            self.resolver.resolve_by_id(part_id).await
        } else {
            self.resolver.resolve_from_stock_change(payload).await
        };

        let subject = match resolved {
            Ok(Some(subject)) => subject,
            Ok(None) => {
                debug!(event = %event, stock_item = %stock_item_id, "no syncable subject for notification");
                return ReconcileOutcome::Unresolvable;
            }
            Err(e) => {
                error!(event = %event, stock_item = %stock_item_id, error = %e, "subject lookup failed");
                return ReconcileOutcome::Unresolvable;
            }
        };

        self.reconcile(&client, &subject, event, settings.policy).await
    }

    /// Read-compare-write for one resolved subject.
    async fn reconcile(
        &self,
        client: &RemoteInventoryClient,
        subject: &SyncSubject,
        event: StockEventKind,
        policy: SyncPolicy,
    ) -> ReconcileOutcome {
        let sku = subject.sku();
        let local = subject.authoritative_quantity();

        let remote = match client.fetch_quantity(sku).await {
            Ok(Some(remote)) => remote,
            Ok(None) => {
                warn!(event = %event, sku = %sku, "SKU not found in remote inventory, skipping sync");
                return ReconcileOutcome::RemoteAbsent;
            }
            Err(e) => {
                error!(event = %event, sku = %sku, error = %e, "remote API error");
                return ReconcileOutcome::RemoteError;
            }
        };

        if quantities_match(local, remote) {
            debug!(event = %event, sku = %sku, qty = local, "already in sync");
            return ReconcileOutcome::InSync;
        }

        if policy.log_only {
            info!(
                event = %event,
                sku = %sku,
                remote,
                local,
                "[log only] would sync remote quantity"
            );
            return ReconcileOutcome::WouldUpdate { remote, local };
        }

        // No in-stock override: the client derives the flag from the quantity.
        match client.update_stock_record(sku, local, None).await {
            Ok(true) => {
                info!(
                    event = %event,
                    sku = %sku,
                    remote,
                    local,
                    "synced remote quantity"
                );
                ReconcileOutcome::Updated { remote, local }
            }
            Ok(false) => {
                error!(event = %event, sku = %sku, "failed to sync remote quantity");
                ReconcileOutcome::UpdateFailed
            }
            Err(e) => {
                error!(event = %event, sku = %sku, error = %e, "remote API error");
                ReconcileOutcome::RemoteError
            }
        }
    }

    fn client(
        &self,
        config: Result<ClientConfig, ConfigError>,
    ) -> Option<Arc<RemoteInventoryClient>> {
        let config = match config {
            Ok(config) => config,
            Err(e @ (ConfigError::MissingBaseUrl | ConfigError::MissingToken)) => {
                warn!(reason = %e, "remote URL or token not configured");
                return None;
            }
            Err(e) => {
                error!(error = %e, "remote settings are invalid");
                return None;
            }
        };

        match self.clients.get_or_build(config, &self.client_options) {
            Ok(client) => Some(client),
            Err(e) => {
                error!(error = %e, "failed to build remote inventory client");
                None
            }
        }
    }
}

#[async_trait]
impl<S, R> NotificationHandler for ReconciliationEngine<S, R>
where
    S: SettingsProvider,
    R: SubjectResolver,
{
    type Outcome = ReconcileOutcome;

    fn wants_notification(&self, kind: &str) -> bool {
        ReconciliationEngine::wants_notification(self, kind)
    }

    async fn handle(&self, notification: &Notification) -> ReconcileOutcome {
        ReconciliationEngine::handle(self, notification.kind(), notification.payload()).await
    }
}
