// ── Core error types ──
//
// Domain errors for msmigrate-core. The `From<msmigrate_api::Error>` impl
// translates transport-layer errors into domain variants; the HTTP status is
// kept where the user needs it to diagnose a failed call.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach the Dashboard API at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Request timed out")]
    Timeout,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Device not found: {serial}")]
    DeviceNotFound { serial: String },

    #[error("Entity not found: {entity_type} '{identifier}'")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    #[error("No port configurations returned for switch {serial}")]
    NoPorts { serial: String },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("Target switch {serial} is not safe to overwrite: {reason}")]
    TargetInUse { serial: String, reason: String },

    #[error("Step '{step}' failed after {completed} of {total} writes: {message}")]
    StepFailed {
        step: String,
        completed: usize,
        total: usize,
        status: Option<u16>,
        message: String,
    },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Attach a device serial to a lookup failure so "not found" names
    /// the device rather than the request path.
    pub(crate) fn for_device(serial: &str) -> impl FnOnce(msmigrate_api::Error) -> Self + '_ {
        move |err| {
            if err.is_not_found() {
                Self::DeviceNotFound {
                    serial: serial.to_owned(),
                }
            } else {
                Self::from(err)
            }
        }
    }

    /// HTTP status behind this error, when one exists.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::AuthenticationFailed { .. } => Some(401),
            Self::DeviceNotFound { .. } | Self::NotFound { .. } => Some(404),
            Self::StepFailed { status, .. } | Self::Api { status, .. } => *status,
            _ => None,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<msmigrate_api::Error> for CoreError {
    fn from(err: msmigrate_api::Error) -> Self {
        match err {
            msmigrate_api::Error::InvalidApiKey => CoreError::AuthenticationFailed {
                message: "Invalid API key".into(),
            },
            msmigrate_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            msmigrate_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            msmigrate_api::Error::InvalidUrl(e) => CoreError::ValidationFailed {
                message: format!("Invalid URL: {e}"),
            },
            msmigrate_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            msmigrate_api::Error::NotFound { path } => CoreError::NotFound {
                entity_type: "resource".into(),
                identifier: path,
            },
            msmigrate_api::Error::RateLimited { retry_after_secs } => CoreError::Api {
                message: format!("Rate limited -- retry after {retry_after_secs}s"),
                status: Some(429),
            },
            msmigrate_api::Error::Api { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            msmigrate_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
