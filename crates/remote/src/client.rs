use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, Response, StatusCode};
use tracing::{debug, error, info, warn};

use stocksync_core::Sku;

use crate::config::{ClientConfig, ClientOptions, ConfigError};
use crate::error::RemoteClientError;
use crate::record::{RemoteStockRecord, StockItemUpdate};
use crate::retry::{is_retryable_method, is_retryable_status};

/// Path prefix of the REST API under the base URL.
pub const API_PREFIX: &str = "/rest/V1";

/// HTTP client for the remote legacy single-stock inventory API.
///
/// Holds one pooled `reqwest::Client` with the bearer token baked into its
/// default headers. Cheap to share behind an `Arc`.
#[derive(Debug, Clone)]
pub struct RemoteInventoryClient {
    config: ClientConfig,
    options: ClientOptions,
    http: reqwest::Client,
}

impl RemoteInventoryClient {
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        Self::with_options(config, ClientOptions::default())
    }

    pub fn with_options(config: ClientConfig, options: ClientOptions) -> Result<Self, ConfigError> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.token()))
            .map_err(|_| ConfigError::InvalidToken)?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(options.timeout)
            .build()
            .map_err(|e| ConfigError::Http(e.to_string()))?;

        Ok(Self {
            config,
            options,
            http,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Full URL for an API path such as `/stockItems/ABC`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}{}", self.config.base_url(), API_PREFIX, path)
    }

    /// Fetch the remote stock record for `sku`.
    ///
    /// Returns `Ok(None)` when the remote answers 404.
    pub async fn fetch_stock_record(
        &self,
        sku: &Sku,
    ) -> Result<Option<RemoteStockRecord>, RemoteClientError> {
        let url = self.url(&format!("/stockItems/{}", sku.to_path_segment()));

        let resp = self
            .send_with_retry(Method::GET, &url, None)
            .await
            .map_err(|e| {
                error!(sku = %sku, error = %e, "error fetching remote stock");
                RemoteClientError::from_transport(sku.as_str(), e)
            })?;

        if resp.status() == StatusCode::NOT_FOUND {
            debug!(sku = %sku, "SKU not found in remote inventory");
            return Ok(None);
        }

        let resp = ensure_success(sku, resp).await?;

        let body = resp
            .bytes()
            .await
            .map_err(|e| RemoteClientError::from_transport(sku.as_str(), e))?;

        let record = serde_json::from_slice::<RemoteStockRecord>(&body).map_err(|e| {
            RemoteClientError::Decode {
                sku: sku.to_string(),
                message: e.to_string(),
            }
        })?;

        Ok(Some(record))
    }

    /// Remote quantity for `sku`, or `None` when the SKU is unknown remotely.
    pub async fn fetch_quantity(&self, sku: &Sku) -> Result<Option<f64>, RemoteClientError> {
        Ok(self
            .fetch_stock_record(sku)
            .await?
            .map(|record| record.quantity()))
    }

    /// Overwrite the remote quantity for `sku`.
    ///
    /// The update endpoint is keyed by the remote item id, which is only
    /// discoverable through a prior fetch; the two calls are not atomic.
    /// Returns `Ok(false)` when the SKU is unknown or its record has no item id.
    /// Without `in_stock_override` the availability flag follows `quantity > 0`.
    pub async fn update_stock_record(
        &self,
        sku: &Sku,
        quantity: f64,
        in_stock_override: Option<bool>,
    ) -> Result<bool, RemoteClientError> {
        let Some(record) = self.fetch_stock_record(sku).await? else {
            warn!(sku = %sku, "cannot update stock: SKU not found in remote inventory");
            return Ok(false);
        };

        let Some(item_id) = record.item_id() else {
            error!(sku = %sku, "remote stock record has no item_id");
            return Ok(false);
        };

        let update = StockItemUpdate::new(quantity, in_stock_override);
        let body = serde_json::to_value(&update).map_err(|e| RemoteClientError::Decode {
            sku: sku.to_string(),
            message: e.to_string(),
        })?;

        let url = self.url(&format!(
            "/products/{}/stockItems/{}",
            sku.to_path_segment(),
            item_id
        ));

        let resp = self
            .send_with_retry(Method::PUT, &url, Some(&body))
            .await
            .map_err(|e| {
                error!(sku = %sku, error = %e, "error updating remote stock");
                RemoteClientError::from_transport(sku.as_str(), e)
            })?;

        ensure_success(sku, resp).await?;

        info!(
            sku = %sku,
            qty = quantity,
            in_stock = update.stock_item.is_in_stock,
            "updated remote stock"
        );
        Ok(true)
    }

    /// Liveness probe against the store configuration endpoint. Never fails.
    pub async fn test_connection(&self) -> bool {
        let url = self.url("/store/storeConfigs");

        match self.send_with_retry(Method::GET, &url, None).await {
            Ok(resp) if resp.status().is_success() => {
                info!("remote inventory API connection test successful");
                true
            }
            Ok(resp) => {
                error!(status = resp.status().as_u16(), "remote inventory API connection test failed");
                false
            }
            Err(e) => {
                error!(error = %e, "remote inventory API connection test failed");
                false
            }
        }
    }

    /// Send a request, re-sending on transient statuses and transport errors.
    ///
    /// Once the budget is spent the last response (or error) is returned as-is.
    async fn send_with_retry(
        &self,
        method: Method,
        url: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<Response, reqwest::Error> {
        let policy = &self.options.retry;
        let retryable_method = is_retryable_method(&method);
        let mut retries = 0;

        loop {
            let mut req = self.http.request(method.clone(), url);
            if let Some(body) = body {
                req = req.json(body);
            }

            let can_retry = retryable_method && policy.should_retry(retries);

            match req.send().await {
                Ok(resp) if can_retry && is_retryable_status(resp.status()) => {
                    warn!(
                        method = %method,
                        url,
                        status = resp.status().as_u16(),
                        attempt = retries + 1,
                        max_attempts = policy.max_attempts(),
                        "transient remote status, retrying"
                    );
                }
                Ok(resp) => return Ok(resp),
                Err(e) if can_retry => {
                    warn!(
                        method = %method,
                        url,
                        error = %e,
                        attempt = retries + 1,
                        max_attempts = policy.max_attempts(),
                        "remote request failed, retrying"
                    );
                }
                Err(e) => return Err(e),
            }

            retries += 1;
            tokio::time::sleep(policy.delay).await;
        }
    }
}

async fn ensure_success(sku: &Sku, resp: Response) -> Result<Response, RemoteClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    error!(sku = %sku, status = status.as_u16(), "remote inventory API error");
    Err(RemoteClientError::Status {
        sku: sku.to_string(),
        status: status.as_u16(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> RemoteInventoryClient {
        let config = ClientConfig::new("https://shop.example.com/", "test_token_123").unwrap();
        RemoteInventoryClient::new(config).unwrap()
    }

    #[test]
    fn builds_api_urls_under_prefix() {
        assert_eq!(
            client().url("/stockItems/ABC"),
            "https://shop.example.com/rest/V1/stockItems/ABC"
        );
    }

    #[test]
    fn default_options_apply() {
        let client = client();
        assert_eq!(client.options().timeout, std::time::Duration::from_secs(30));
        assert_eq!(client.options().retry.max_attempts(), 4);
    }

    #[test]
    fn token_with_control_characters_is_rejected() {
        let config = ClientConfig::new("https://shop.example.com", "bad\ntoken").unwrap();
        assert_eq!(
            RemoteInventoryClient::new(config).unwrap_err(),
            ConfigError::InvalidToken
        );
    }
}
