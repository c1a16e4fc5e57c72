// Dashboard API HTTP client
//
// Wraps `reqwest::Client` with bearer-token auth, path-segment URL
// construction, error-body decoding, and the read-only retry policy.
// Endpoint groups (devices, switch, organizations) are implemented as
// inherent methods in separate files to keep this module focused on
// transport mechanics.

use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue, RETRY_AFTER};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Public Dashboard API v1 endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.meraki.com/api/v1";

/// Error body shape returned by the Dashboard: `{"errors": ["..."]}`.
#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    errors: Vec<String>,
}

/// Async client for the Meraki Dashboard API.
///
/// Every request carries `Authorization: Bearer <key>`. GET requests are
/// retried on transient failures up to [`TransportConfig::read_retries`]
/// times; PUT and POST requests are sent exactly once.
pub struct DashboardClient {
    http: reqwest::Client,
    base_url: Url,
    transport: TransportConfig,
}

impl DashboardClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from an API key and transport config.
    ///
    /// The key is injected as a sensitive default header so it never shows
    /// up in `Debug` output or request logs.
    pub fn from_api_key(
        base_url: &str,
        api_key: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        let mut value = HeaderValue::from_str(&format!("Bearer {}", api_key.expose_secret()))
            .map_err(|e| Error::Authentication {
                message: format!("invalid API key header value: {e}"),
            })?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);

        let http = transport.build_client_with_headers(headers)?;
        Self::from_reqwest(base_url, http, transport.clone())
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth headers).
    pub fn from_reqwest(
        base_url: &str,
        http: reqwest::Client,
        transport: TransportConfig,
    ) -> Result<Self, Error> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase));
        }
        Ok(Self {
            http,
            base_url,
            transport,
        })
    }

    /// The API base URL (e.g. `https://api.meraki.com/api/v1`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Append path segments to the base URL, percent-encoding each one.
    pub(crate) fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Checked in the constructor: the base URL can always take segments.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    /// Send a GET request, retrying transient failures within the read budget.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        let mut attempt: u32 = 0;
        loop {
            debug!("GET {url}");
            let result = match self.http.get(url.clone()).send().await {
                Ok(resp) => self.handle_response(resp).await,
                Err(e) => Err(Error::Transport(e)),
            };

            match result {
                Err(err) if err.is_transient() && attempt < self.transport.read_retries => {
                    attempt += 1;
                    let wait = match &err {
                        Error::RateLimited { retry_after_secs } => {
                            std::time::Duration::from_secs(*retry_after_secs)
                        }
                        _ => self.transport.retry_backoff,
                    };
                    warn!(%url, attempt, error = %err, "transient read failure, retrying");
                    tokio::time::sleep(wait).await;
                }
                other => return other,
            }
        }
    }

    /// Send a PUT request with a JSON body. Never retried.
    ///
    /// `None` when the service acknowledges the write with an empty body.
    pub(crate) async fn put<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<Option<T>, Error> {
        debug!("PUT {url}");
        let resp = self.http.put(url).json(body).send().await?;
        self.handle_optional_response(resp).await
    }

    /// Send a POST request with a JSON body. Never retried.
    ///
    /// `None` when the service acknowledges the write with an empty body.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<Option<T>, Error> {
        debug!("POST {url}");
        let resp = self.http.post(url).json(body).send().await?;
        self.handle_optional_response(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        self.handle_optional_response(resp)
            .await?
            .ok_or_else(|| Error::Deserialization {
                message: "expected a JSON body, got an empty response".into(),
                body: String::new(),
            })
    }

    /// Decode a response whose body may legitimately be empty (e.g. 204).
    async fn handle_optional_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<Option<T>, Error> {
        let status = resp.status();
        if !status.is_success() {
            return Err(Self::parse_error(status, resp).await);
        }

        let body = resp.text().await?;
        if body.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&body).map(Some).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body,
            }
        })
    }

    async fn parse_error(status: StatusCode, resp: reqwest::Response) -> Error {
        match status {
            StatusCode::UNAUTHORIZED => return Error::InvalidApiKey,
            StatusCode::NOT_FOUND => {
                return Error::NotFound {
                    path: resp.url().path().to_owned(),
                };
            }
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after_secs = resp
                    .headers()
                    .get(RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.trim().parse().ok())
                    .unwrap_or(1);
                return Error::RateLimited { retry_after_secs };
            }
            _ => {}
        }

        let raw = resp.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ErrorResponse>(&raw) {
            Ok(err) if !err.errors.is_empty() => err.errors.join("; "),
            _ if raw.trim().is_empty() => status.to_string(),
            _ => raw.chars().take(200).collect(),
        };

        Error::Api {
            status: status.as_u16(),
            message,
        }
    }
}
