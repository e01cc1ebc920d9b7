//! Settings-keyed cache of the remote client.

use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use stocksync_remote::{ClientConfig, ClientOptions, ConfigError, RemoteInventoryClient};

/// Holds at most one client, keyed by the configuration it was built from.
///
/// Readers share the current client; a configuration change swaps in a new
/// one under the write lock. In-flight calls keep their `Arc` to the old
/// client until they finish.
#[derive(Debug, Default)]
pub struct ClientSlot {
    current: RwLock<Option<Arc<RemoteInventoryClient>>>,
}

impl ClientSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached client if it matches `config`, else build and cache one.
    pub fn get_or_build(
        &self,
        config: ClientConfig,
        options: &ClientOptions,
    ) -> Result<Arc<RemoteInventoryClient>, ConfigError> {
        {
            let current = self.current.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(client) = current.as_ref().filter(|c| c.config() == &config) {
                return Ok(Arc::clone(client));
            }
        }

        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);

        // Another caller may have rebuilt it while we waited for the lock.
        if let Some(client) = current.as_ref().filter(|c| c.config() == &config) {
            return Ok(Arc::clone(client));
        }

        debug!(base_url = config.base_url(), "building remote inventory client");
        let client = Arc::new(RemoteInventoryClient::with_options(config, options.clone())?);
        *current = Some(Arc::clone(&client));
        Ok(client)
    }

    /// Configuration of the cached client, if any.
    pub fn current_config(&self) -> Option<ClientConfig> {
        let current = self.current.read().unwrap_or_else(PoisonError::into_inner);
        current.as_ref().map(|client| client.config().clone())
    }
}
