//! Sync settings: keys, defaults, providers, and typed loading.
//!
//! Settings are read fresh on every reconciliation attempt; nothing here is
//! cached, so operators can flip `SYNC_ENABLED`/`LOG_ONLY` or rotate the token
//! without restarting the host.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::warn;

use stocksync_remote::{ClientConfig, ConfigError};

pub const REMOTE_URL: &str = "REMOTE_URL";
pub const REMOTE_TOKEN: &str = "REMOTE_TOKEN";
pub const SYNC_ENABLED: &str = "SYNC_ENABLED";
pub const LOG_ONLY: &str = "LOG_ONLY";

/// Prefix used by [`EnvSettings`] for process environment variables.
pub const ENV_PREFIX: &str = "STOCKSYNC_";

/// Declaration of one setting as presented to operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingDefinition {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub default: &'static str,
    pub required: bool,
    /// Value must never be displayed or logged.
    pub protected: bool,
}

pub const SETTINGS: [SettingDefinition; 4] = [
    SettingDefinition {
        key: REMOTE_URL,
        name: "Remote URL",
        description: "Base URL of the remote store (e.g. https://shop.example.com)",
        default: "",
        required: true,
        protected: false,
    },
    SettingDefinition {
        key: REMOTE_TOKEN,
        name: "Access Token",
        description: "Integration access token sent as a Bearer token",
        default: "",
        required: true,
        protected: true,
    },
    SettingDefinition {
        key: SYNC_ENABLED,
        name: "Enable Sync",
        description: "Enable automatic stock synchronisation to the remote store",
        default: "true",
        required: false,
        protected: false,
    },
    SettingDefinition {
        key: LOG_ONLY,
        name: "Log Only Mode",
        description: "Log sync actions without updating the remote store",
        default: "false",
        required: false,
        protected: false,
    },
];

/// Read access to the host's settings storage.
pub trait SettingsProvider: Send + Sync {
    /// Raw value of `key`, or `None` when unset.
    fn get_setting(&self, key: &str) -> Option<String>;
}

impl<P> SettingsProvider for Arc<P>
where
    P: SettingsProvider + ?Sized,
{
    fn get_setting(&self, key: &str) -> Option<String> {
        (**self).get_setting(key)
    }
}

/// Mutable in-process settings for embedded hosts and tests.
#[derive(Debug, Default)]
pub struct InMemorySettings {
    values: RwLock<HashMap<String, String>>,
}

impl InMemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, key: &str, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&self, key: &str, value: impl Into<String>) {
        let value = value.into();
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value);
    }

    pub fn remove(&self, key: &str) {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }
}

impl SettingsProvider for InMemorySettings {
    fn get_setting(&self, key: &str) -> Option<String> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }
}

/// Settings taken from `STOCKSYNC_<KEY>` environment variables.
#[derive(Debug, Clone, Default)]
pub struct EnvSettings {
    fixed: Option<HashMap<String, String>>,
}

impl EnvSettings {
    /// Read the live process environment on every lookup.
    pub fn from_process() -> Self {
        Self { fixed: None }
    }

    /// Use an explicit variable list instead of the process environment.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fixed: Some(vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect()),
        }
    }

    pub fn variable_name(key: &str) -> String {
        format!("{ENV_PREFIX}{key}")
    }
}

impl SettingsProvider for EnvSettings {
    fn get_setting(&self, key: &str) -> Option<String> {
        let name = Self::variable_name(key);
        match &self.fixed {
            Some(vars) => vars.get(&name).cloned(),
            None => std::env::var(&name).ok(),
        }
    }
}

/// Enable/disable and dry-run switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncPolicy {
    pub enabled: bool,
    pub log_only: bool,
}

impl Default for SyncPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            log_only: false,
        }
    }
}

/// One fresh read of every setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSettings {
    pub client: Result<ClientConfig, ConfigError>,
    pub policy: SyncPolicy,
}

impl SyncSettings {
    pub fn load(provider: &dyn SettingsProvider) -> Self {
        let url = provider.get_setting(REMOTE_URL).unwrap_or_default();
        let token = provider.get_setting(REMOTE_TOKEN).unwrap_or_default();

        let defaults = SyncPolicy::default();
        let policy = SyncPolicy {
            enabled: read_flag(provider, SYNC_ENABLED, defaults.enabled),
            log_only: read_flag(provider, LOG_ONLY, defaults.log_only),
        };

        Self {
            client: ClientConfig::new(url, token),
            policy,
        }
    }

    /// Every declared setting with its effective value, protected ones masked.
    pub fn describe(provider: &dyn SettingsProvider) -> Vec<(&'static SettingDefinition, String)> {
        SETTINGS
            .iter()
            .map(|def| {
                let value = provider
                    .get_setting(def.key)
                    .unwrap_or_else(|| def.default.to_string());
                let shown = if def.protected && !value.is_empty() {
                    "********".to_string()
                } else {
                    value
                };
                (def, shown)
            })
            .collect()
    }
}

/// Parse a boolean setting. Accepts true/false, 1/0, yes/no, on/off.
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn read_flag(provider: &dyn SettingsProvider, key: &str, default: bool) -> bool {
    match provider.get_setting(key) {
        None => default,
        Some(raw) if raw.trim().is_empty() => default,
        Some(raw) => parse_flag(&raw).unwrap_or_else(|| {
            warn!(setting = key, value = %raw, default, "unparseable boolean setting, using default");
            default
        }),
    }
}
