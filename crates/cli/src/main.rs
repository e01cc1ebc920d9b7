use std::sync::Arc;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};

use stocksync_core::{PartId, StockItemId};
use stocksync_engine::settings::LOG_ONLY;
use stocksync_engine::{
    EnvSettings, InMemoryCatalog, InMemorySettings, ReconcileOutcome, ReconciliationEngine,
    SETTINGS, SettingsProvider, SyncSettings,
};
use stocksync_events::{Notification, NotificationPayload, StockEventKind};
use stocksync_observability::{LogConfig, LogFormat};

#[derive(Parser)]
#[command(name = "stocksync")]
#[command(about = "Push local stock quantities to the remote store", long_about = None)]
struct Cli {
    /// Debug-level, human-readable logs instead of JSON at info
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the configured remote accepts our credentials
    Probe,

    /// Reconcile one SKU against a given local quantity
    Reconcile {
        #[arg(long)]
        sku: String,

        /// Authoritative local quantity
        #[arg(long)]
        quantity: f64,

        /// Notification kind to simulate
        #[arg(long, default_value = "stockitem.quantityupdated")]
        kind: String,

        /// Compare and log, but never write to the remote
        #[arg(long, default_value_t = false)]
        log_only: bool,
    },

    /// Print effective settings (secrets masked)
    Settings,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    stocksync_observability::init_with(&if cli.verbose {
        LogConfig {
            default_directive: "debug".to_string(),
            format: LogFormat::Pretty,
        }
    } else {
        LogConfig::default()
    });

    let env = EnvSettings::from_process();

    match cli.cmd {
        Commands::Probe => {
            let engine = ReconciliationEngine::new(env, InMemoryCatalog::new());
            if !engine.probe().await {
                bail!("remote inventory is unreachable or rejected the credentials");
            }
            println!("remote_ok=true");
        }

        Commands::Reconcile {
            sku,
            quantity,
            kind,
            log_only,
        } => {
            if !StockEventKind::is_relevant(&kind) {
                bail!("'{kind}' is not a stock notification kind");
            }

            let settings = snapshot(&env);
            if log_only {
                settings.set(LOG_ONLY, "true");
            }

            // One part holding the whole quantity in one stock item.
            let catalog = InMemoryCatalog::new();
            catalog.upsert_part(PartId::new(1), sku.as_str());
            catalog.upsert_stock_item(StockItemId::new(1), PartId::new(1), quantity);

            let engine = ReconciliationEngine::new(settings, Arc::new(catalog));
            let payload = NotificationPayload::new().with("id", 1).with("part_id", 1);
            let notification = Notification::new(kind, payload);

            let outcome = engine
                .handle(notification.kind(), notification.payload())
                .await;
            println!("sku={sku} outcome={outcome}");

            if matches!(
                outcome,
                ReconcileOutcome::RemoteError | ReconcileOutcome::UpdateFailed
            ) {
                bail!("reconciliation of '{sku}' failed");
            }
        }

        Commands::Settings => {
            for (def, value) in SyncSettings::describe(&env) {
                let required = if def.required { ", required" } else { "" };
                println!(
                    "{}={value}\t# {}{required}: {}",
                    EnvSettings::variable_name(def.key),
                    def.name,
                    def.description
                );
            }
        }
    }

    Ok(())
}

/// Copy the environment into mutable settings so flags can override it.
fn snapshot(env: &EnvSettings) -> InMemorySettings {
    let settings = InMemorySettings::new();
    for def in &SETTINGS {
        if let Some(value) = env.get_setting(def.key) {
            settings.set(def.key, value);
        }
    }
    settings
}
