//! Client construction from the API key, the settings file, environment
//! variables, and CLI flag overrides.

use tracing::debug;

use msmigrate_api::DashboardClient;
use msmigrate_config::Config;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Build a Dashboard client for a command that talks to the API.
///
/// The API key is resolved before anything else, so a missing key fails
/// without reading settings or opening a connection.
pub fn build_client(global: &GlobalOpts) -> Result<DashboardClient, CliError> {
    let api_key = msmigrate_config::resolve_api_key(global.api_key.as_deref())?;

    let mut config = msmigrate_config::load_config()?;
    apply_overrides(&mut config, global);
    config.validate()?;

    debug!(
        base_url = %config.base_url,
        timeout = config.timeout,
        read_retries = config.read_retries,
        "building dashboard client"
    );
    Ok(DashboardClient::from_api_key(
        &config.base_url,
        &api_key,
        &config.transport(),
    )?)
}

/// CLI flags win over the file and environment layers.
fn apply_overrides(config: &mut Config, global: &GlobalOpts) {
    if let Some(url) = &global.base_url {
        config.base_url.clone_from(url);
    }
    if let Some(timeout) = global.timeout {
        config.timeout = timeout;
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    #[test]
    fn flags_override_loaded_settings() {
        let cli = Cli::try_parse_from([
            "msmigrate",
            "--base-url",
            "http://127.0.0.1:9/api/v1",
            "--timeout",
            "5",
            "tag",
            "Q2AA-AAAA-AAAA",
        ])
        .unwrap();

        let mut config = Config::default();
        apply_overrides(&mut config, &cli.global);

        assert_eq!(config.base_url, "http://127.0.0.1:9/api/v1");
        assert_eq!(config.timeout, 5);
        assert_eq!(config.read_retries, 1);
    }
}
