use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The tri-state validity recorded by `backup.info`'s `VALID` key.
///
/// Only [`ValidState::True`] backups participate in neighbor selection during delete (§4.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidState {
    True,
    False,
    Unknown,
}

impl ValidState {
    pub fn is_valid(self) -> bool {
        self == ValidState::True
    }
}

impl fmt::Display for ValidState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ValidState::True => "1",
            ValidState::False => "0",
            ValidState::Unknown => "unknown",
        })
    }
}

impl FromStr for ValidState {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" | "true" | "TRUE" => Ok(ValidState::True),
            "0" | "false" | "FALSE" => Ok(ValidState::False),
            "unknown" | "UNKNOWN" => Ok(ValidState::Unknown),
            other => anyhow::bail!("invalid VALID value: {other:?}"),
        }
    }
}
