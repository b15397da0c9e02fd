//! Shared HTTP plumbing for explorer clients.

use std::time::Duration;

use crate::chains::types::{ChainError, ChainResult};

/// Build a reqwest client with the configured per-request timeout.
pub(crate) fn build_client(timeout_secs: u64) -> ChainResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| ChainError::Http(e.to_string()))
}

/// Map a reqwest failure to the chain error taxonomy.
pub(crate) fn request_error(err: reqwest::Error, timeout_secs: u64) -> ChainError {
    if err.is_timeout() {
        ChainError::Timeout(timeout_secs)
    } else if err.is_decode() {
        ChainError::Api(format!("malformed response: {}", err))
    } else {
        ChainError::Http(err.to_string())
    }
}

/// Issue a GET request with query parameters.
pub(crate) async fn get(
    client: &reqwest::Client,
    url: &str,
    query: &[(&str, &str)],
    timeout_secs: u64,
) -> ChainResult<reqwest::Response> {
    tracing::debug!(url = %url, "Explorer request");
    client
        .get(url)
        .query(query)
        .send()
        .await
        .map_err(|e| request_error(e, timeout_secs))
}
