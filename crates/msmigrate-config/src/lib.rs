//! Configuration for msmigrate.
//!
//! Two concerns live here: resolving the Dashboard API key (flag, then
//! environment, then failure) and loading non-secret connection settings
//! from defaults, an optional TOML file, and `MSMIGRATE_*` environment
//! variables. The CLI layers its own flag overrides on top.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use msmigrate_api::TransportConfig;

/// Environment variable consulted when no `--api-key` flag is given.
pub const API_KEY_ENV: &str = "MERAKI_DASHBOARD_API_KEY";

/// Prefix for environment overrides of [`Config`] fields.
pub const ENV_PREFIX: &str = "MSMIGRATE_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no API key provided (pass --api-key or set {env})")]
    MissingApiKey { env: &'static str },

    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve the API key: explicit value first, then [`API_KEY_ENV`].
///
/// The key is not checked against the service here; the Dashboard rejects
/// bad keys on first use.
pub fn resolve_api_key(explicit: Option<&str>) -> Result<SecretString, ConfigError> {
    resolve_api_key_with(explicit, |name| std::env::var(name).ok())
}

/// [`resolve_api_key`] with an injectable environment lookup.
///
/// Blank values are treated as absent at both steps.
pub fn resolve_api_key_with(
    explicit: Option<&str>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<SecretString, ConfigError> {
    if let Some(key) = explicit.map(str::trim).filter(|k| !k.is_empty()) {
        return Ok(SecretString::from(key.to_owned()));
    }

    lookup(API_KEY_ENV)
        .map(|k| k.trim().to_owned())
        .filter(|k| !k.is_empty())
        .map(SecretString::from)
        .ok_or(ConfigError::MissingApiKey { env: API_KEY_ENV })
}

// ── Settings ────────────────────────────────────────────────────────

/// Non-secret connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Dashboard API base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Extra attempts for reads after a transient failure.
    #[serde(default = "default_read_retries")]
    pub read_retries: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout: default_timeout(),
            read_retries: default_read_retries(),
        }
    }
}

fn default_base_url() -> String {
    msmigrate_api::DEFAULT_BASE_URL.into()
}
fn default_timeout() -> u64 {
    msmigrate_api::DEFAULT_TIMEOUT.as_secs()
}
fn default_read_retries() -> u32 {
    1
}

impl Config {
    /// Check the settings that can be checked without a network call.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = url::Url::parse(&self.base_url).map_err(|e| ConfigError::Validation {
            field: "base_url".into(),
            reason: format!("{e}: {}", self.base_url),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Validation {
                field: "base_url".into(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }
        if self.timeout == 0 {
            return Err(ConfigError::Validation {
                field: "timeout".into(),
                reason: "must be at least 1 second".into(),
            });
        }
        Ok(())
    }

    /// Translate the settings into the API crate's transport config.
    pub fn transport(&self) -> TransportConfig {
        TransportConfig::default()
            .with_timeout(Duration::from_secs(self.timeout))
            .with_read_retries(self.read_retries)
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "msmigrate", "msmigrate").map_or_else(
        || {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("msmigrate");
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// Load settings from the canonical config path + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load settings from `path` (missing file is fine) + environment.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let config: Config = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX))
        .extract()?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    fn env_with(value: Option<&'static str>) -> impl Fn(&str) -> Option<String> {
        move |name| {
            assert_eq!(name, API_KEY_ENV);
            value.map(String::from)
        }
    }

    #[test]
    fn explicit_key_wins_over_environment() {
        let key = resolve_api_key_with(Some("from-flag"), env_with(Some("from-env"))).unwrap();
        assert_eq!(key.expose_secret(), "from-flag");
    }

    #[test]
    fn environment_used_when_flag_absent() {
        let key = resolve_api_key_with(None, env_with(Some("from-env"))).unwrap();
        assert_eq!(key.expose_secret(), "from-env");
    }

    #[test]
    fn blank_values_count_as_missing() {
        let key = resolve_api_key_with(Some("  "), env_with(Some("from-env"))).unwrap();
        assert_eq!(key.expose_secret(), "from-env");

        let err = resolve_api_key_with(None, env_with(Some(""))).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey { .. }));
    }

    #[test]
    fn missing_everywhere_names_the_variable() {
        let err = resolve_api_key_with(None, env_with(None)).unwrap_err();
        assert!(err.to_string().contains(API_KEY_ENV), "got: {err}");
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.base_url, msmigrate_api::DEFAULT_BASE_URL);
        assert_eq!(config.timeout, 30);
        assert_eq!(config.read_retries, 1);
    }

    #[test]
    fn file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "base_url = \"https://api.meraki.ca/api/v1\"\ntimeout = 60\nread_retries = 0\n",
        )
        .unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(
            config,
            Config {
                base_url: "https://api.meraki.ca/api/v1".into(),
                timeout: 60,
                read_retries: 0,
            }
        );
        assert_eq!(config.transport().timeout, Duration::from_secs(60));
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let config = Config {
            base_url: "ftp://example.com".into(),
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation { ref field, .. }) if field == "base_url"
        ));
    }
}
