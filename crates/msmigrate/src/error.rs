//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text and a process exit code.

use miette::Diagnostic;
use thiserror::Error;

use msmigrate_config::ConfigError;
use msmigrate_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to the Dashboard API at {url}")]
    #[diagnostic(
        code(msmigrate::connection_failed),
        help("Check network access to the API host, or the --base-url override.")
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Request timed out")]
    #[diagnostic(
        code(msmigrate::timeout),
        help("Increase the timeout with --timeout or MSMIGRATE_TIMEOUT.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("No Dashboard API key provided")]
    #[diagnostic(
        code(msmigrate::no_api_key),
        help("Pass --api-key (-a) or set the {env} environment variable.")
    )]
    MissingApiKey { env: &'static str },

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(msmigrate::auth_failed),
        help("Verify the API key and that API access is enabled for its organization.")
    )]
    AuthFailed { message: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(msmigrate::not_found),
        help("Check the {resource_type} identifier and that the API key can see it.")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
    },

    #[error("Switch {serial} returned no port configuration")]
    #[diagnostic(
        code(msmigrate::no_ports),
        help("Only switches can be migrated. Confirm {serial} is a switch.")
    )]
    NoPorts { serial: String },

    // ── Migration ────────────────────────────────────────────────────
    #[error("Target switch {serial} is not safe to overwrite: {reason}")]
    #[diagnostic(
        code(msmigrate::target_in_use),
        help(
            "If the switch really is spare, run: msmigrate tag {serial}\n\
             Or drop --strict to migrate anyway."
        )
    )]
    TargetInUse { serial: String, reason: String },

    #[error("Step '{step}' failed ({completed} of {total} writes completed): {message}")]
    #[diagnostic(
        code(msmigrate::step_failed),
        help("Writes before this step were applied and have not been rolled back.")
    )]
    StepFailed {
        step: String,
        completed: usize,
        total: usize,
        message: String,
    },

    #[error("Migration aborted; no changes were made")]
    #[diagnostic(code(msmigrate::aborted))]
    Aborted,

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error: {message}")]
    #[diagnostic(code(msmigrate::api_error))]
    ApiError {
        status: Option<u16>,
        message: String,
    },

    #[error("Internal error: {0}")]
    #[diagnostic(code(msmigrate::internal))]
    Internal(String),

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(msmigrate::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(code(msmigrate::config))]
    Config(Box<figment::Error>),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("'{action}' requires confirmation")]
    #[diagnostic(
        code(msmigrate::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(msmigrate::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    #[diagnostic(code(msmigrate::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::MissingApiKey { .. }
            | Self::AuthFailed { .. }
            | Self::ApiError {
                status: Some(401), ..
            } => exit_code::AUTH,
            Self::NotFound { .. }
            | Self::ApiError {
                status: Some(404), ..
            } => exit_code::NOT_FOUND,
            Self::TargetInUse { .. } => exit_code::CONFLICT,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },

            CoreError::Timeout => CliError::Timeout,

            CoreError::DeviceNotFound { serial } => CliError::NotFound {
                resource_type: "device".into(),
                identifier: serial,
            },

            CoreError::NotFound {
                entity_type,
                identifier,
            } => CliError::NotFound {
                resource_type: entity_type,
                identifier,
            },

            CoreError::NoPorts { serial } => CliError::NoPorts { serial },

            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::TargetInUse { serial, reason } => CliError::TargetInUse { serial, reason },

            CoreError::StepFailed {
                step,
                completed,
                total,
                status: _,
                message,
            } => CliError::StepFailed {
                step,
                completed,
                total,
                message,
            },

            CoreError::Api { message, status } => CliError::ApiError { status, message },

            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

impl From<msmigrate_api::Error> for CliError {
    fn from(err: msmigrate_api::Error) -> Self {
        CoreError::from(err).into()
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::MissingApiKey { env } => CliError::MissingApiKey { env },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::Figment(err) => CliError::Config(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_error_class() {
        let missing = CliError::from(ConfigError::MissingApiKey { env: "X" });
        assert_eq!(missing.exit_code(), exit_code::AUTH);

        let not_found = CliError::from(CoreError::DeviceNotFound {
            serial: "Q2AA".into(),
        });
        assert_eq!(not_found.exit_code(), exit_code::NOT_FOUND);

        let guard = CliError::from(CoreError::TargetInUse {
            serial: "Q2BB".into(),
            reason: "no tag".into(),
        });
        assert_eq!(guard.exit_code(), exit_code::CONFLICT);

        let same = CliError::from(CoreError::ValidationFailed {
            message: "same switch".into(),
        });
        assert_eq!(same.exit_code(), exit_code::USAGE);

        assert_eq!(CliError::Aborted.exit_code(), exit_code::GENERAL);
    }

    #[test]
    fn step_failure_message_names_the_step() {
        let err = CliError::from(CoreError::StepFailed {
            step: "update port 7 on Q2BB".into(),
            completed: 6,
            total: 9,
            status: Some(400),
            message: "Dashboard API error (HTTP 400): bad vlan".into(),
        });
        let text = err.to_string();
        assert!(text.contains("update port 7 on Q2BB"), "{text}");
        assert!(text.contains("6 of 9"), "{text}");
        assert_eq!(err.exit_code(), exit_code::GENERAL);
    }
}
