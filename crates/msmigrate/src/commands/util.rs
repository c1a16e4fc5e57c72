//! Shared helpers for command handlers.

use std::io::{self, IsTerminal};

use serde_json::Value;

use msmigrate_core::{CoreError, Serial};

use crate::error::CliError;

/// Parse a serial argument, naming the argument on failure.
pub fn parse_serial(value: &str, field: &str) -> Result<Serial, CliError> {
    value.parse().map_err(|err| CliError::Validation {
        field: field.into(),
        reason: match err {
            CoreError::ValidationFailed { message } => message,
            other => other.to_string(),
        },
    })
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Refuses outright when stdin is not a terminal, since nobody can answer.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(io::Error::other(e)))?;
    Ok(confirmed)
}

/// Render a JSON attribute value for a table cell.
pub fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "-".into(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|v| cell(Some(v)))
            .collect::<Vec<_>>()
            .join(", "),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn cells_flatten_strings_and_lists() {
        assert_eq!(cell(None), "-");
        assert_eq!(cell(Some(&json!("trunk"))), "trunk");
        assert_eq!(cell(Some(&json!(10))), "10");
        assert_eq!(cell(Some(&json!(["a", "b"]))), "a, b");
        assert_eq!(cell(Some(&json!(true))), "true");
    }

    #[test]
    fn bad_serial_names_the_argument() {
        let err = parse_serial("Q2AA/../x", "SOURCE_SERIAL").unwrap_err();
        assert!(err.to_string().contains("SOURCE_SERIAL"), "{err}");
    }
}
