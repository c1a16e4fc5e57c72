// Shared transport configuration for building the reqwest::Client.
//
// Timeout, retry budget, and user agent live here so the Dashboard client
// only deals with URLs, verbs, and response decoding.

use std::time::Duration;

use reqwest::header::HeaderMap;

use crate::error::Error;

/// Default request timeout when the caller does not override it.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Per-request timeout.
    pub timeout: Duration,
    /// Extra attempts for idempotent reads after a transient failure.
    /// Writes are never retried.
    pub read_retries: u32,
    /// Pause between read attempts when the service gives no `Retry-After`.
    pub retry_backoff: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            read_retries: 1,
            retry_backoff: Duration::from_secs(1),
        }
    }
}

impl TransportConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_read_retries(mut self, read_retries: u32) -> Self {
        self.read_retries = read_retries;
        self
    }

    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    /// Build a `reqwest::Client` with additional default headers.
    ///
    /// Used by the Dashboard client to inject the `Authorization` header.
    pub fn build_client_with_headers(&self, headers: HeaderMap) -> Result<reqwest::Client, Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("msmigrate/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}
