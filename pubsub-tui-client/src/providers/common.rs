//! Shared helpers for client implementations

use std::time::Duration;

use reqwest::Client;

use crate::error::{PubSubError, Result};

/// Connect timeout (seconds)
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// Request timeout (seconds). Pull requests may be held open by the service.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 90;

/// Creates an HTTP client with timeouts configured.
pub fn create_http_client() -> Result<Client> {
    Client::builder()
        .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
        .build()
        .map_err(|e| PubSubError::transport(format!("failed to create HTTP client: {e}")))
}
