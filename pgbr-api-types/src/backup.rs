use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::valid::ValidState;

/// A backup label. Labels are lexicographically sortable by time (§3), the way pgBackRest
/// names backups `<type>-<start-timestamp>` so string order already matches chronological
/// order; we carry that invariant as a newtype rather than re-deriving it from a timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Label(String);

impl Label {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialOrd for Label {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Label {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl From<String> for Label {
    fn from(s: String) -> Self {
        Label(s)
    }
}

impl From<&str> for Label {
    fn from(s: &str) -> Self {
        Label(s.to_string())
    }
}

/// The essential attributes of one backup, as read from `backup.info` (§3, §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupRecord {
    pub label: Label,
    pub valid: ValidState,
    pub keep: bool,
    pub size: u64,
}

impl BackupRecord {
    pub fn is_valid(&self) -> bool {
        self.valid.is_valid()
    }
}
