// ── Device serial ──

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A vendor-assigned device serial (e.g. `Q2HP-ABCD-1234`).
///
/// Opaque to this tool; the only checks are the ones that keep it usable as
/// a single URL path segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Serial(String);

impl Serial {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Serial {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(CoreError::ValidationFailed {
                message: "device serial must not be empty".into(),
            });
        }
        if s.chars().any(|c| c.is_whitespace() || c == '/' || c.is_control()) {
            return Err(CoreError::ValidationFailed {
                message: format!("device serial '{s}' contains invalid characters"),
            });
        }
        Ok(Self(s.to_owned()))
    }
}

impl fmt::Display for Serial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Serial {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
