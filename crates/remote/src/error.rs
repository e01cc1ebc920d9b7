use thiserror::Error;

/// Failure talking to the remote inventory API.
///
/// "SKU not found" is deliberately absent: it is an expected outcome and is
/// reported as `Ok(None)` / `Ok(false)` by the client.
#[derive(Debug, Error)]
pub enum RemoteClientError {
    #[error("timeout talking to remote inventory for SKU '{sku}'")]
    Timeout { sku: String },

    #[error("transport error for SKU '{sku}': {message}")]
    Transport { sku: String, message: String },

    #[error("remote inventory returned HTTP {status} for SKU '{sku}'")]
    Status { sku: String, status: u16, body: String },

    #[error("malformed stock record for SKU '{sku}': {message}")]
    Decode { sku: String, message: String },
}

impl RemoteClientError {
    pub(crate) fn from_transport(sku: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                sku: sku.to_string(),
            }
        } else {
            Self::Transport {
                sku: sku.to_string(),
                message: err.to_string(),
            }
        }
    }

    /// SKU of the request that failed.
    pub fn sku(&self) -> &str {
        match self {
            Self::Timeout { sku }
            | Self::Transport { sku, .. }
            | Self::Status { sku, .. }
            | Self::Decode { sku, .. } => sku,
        }
    }

    /// HTTP status, when the failure was a non-success response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
