//! Minimal line-oriented `KEY=VALUE` reader/writer for `backup.info`.
//!
//! The distilled spec names only the write path (`update_info`, §4.5); a full INI/JSON parser
//! is explicitly an external collaborator (§1). This still has to round-trip the four keys
//! the core consumes (`LABEL`, `VALID`, `KEEP`, `BACKUP`, §6), so the minimal reader lives here.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use pgbr_api_types::{BackupRecord, Label, ValidState};

pub const KEY_LABEL: &str = "LABEL";
pub const KEY_VALID: &str = "VALID";
pub const KEY_KEEP: &str = "KEEP";
pub const KEY_BACKUP: &str = "BACKUP";

/// Reads every `key=value` line into an ordered map. Blank lines and `#`-comments are
/// ignored; a duplicate key keeps its last occurrence.
pub fn read_fields(path: &Path) -> Result<BTreeMap<String, String>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let mut fields = BTreeMap::new();
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            fields.insert(key.trim().to_string(), value.trim().to_string());
        }
    }
    Ok(fields)
}

/// Parses the four consumed keys into a [`BackupRecord`]. `fallback_label` is used when the
/// file carries no explicit `LABEL` line, so the directory name remains the source of truth.
pub fn read_record(path: &Path, fallback_label: &str) -> Result<BackupRecord> {
    let fields = read_fields(path)?;

    let label = fields
        .get(KEY_LABEL)
        .map(|s| s.as_str())
        .unwrap_or(fallback_label);

    let valid = fields
        .get(KEY_VALID)
        .map(|s| s.parse::<ValidState>())
        .transpose()?
        .unwrap_or(ValidState::Unknown);

    let keep = fields
        .get(KEY_KEEP)
        .map(|s| matches!(s.as_str(), "1" | "true" | "TRUE"))
        .unwrap_or(false);

    let size = fields
        .get(KEY_BACKUP)
        .map(|s| s.parse::<u64>())
        .transpose()
        .context("BACKUP field is not a valid byte count")?
        .unwrap_or(0);

    Ok(BackupRecord {
        label: Label::new(label),
        valid,
        keep,
        size,
    })
}

/// Upserts a single `key=value` pair, leaving every other key untouched (§4.5). Creates the
/// file, and any missing parent, if it does not yet exist.
pub fn update_info(path: &Path, key: &str, value: &str) -> Result<()> {
    let mut fields = read_fields(path).unwrap_or_default();
    fields.insert(key.to_string(), value.to_string());

    let mut out = String::new();
    for (k, v) in &fields {
        out.push_str(k);
        out.push('=');
        out.push_str(v);
        out.push('\n');
    }
    fs::write(path, out).with_context(|| format!("writing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn round_trips_all_four_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("backup.info");
        fs::write(&path, "LABEL=20260101-full\nVALID=1\nKEEP=0\nBACKUP=4096\n").unwrap();

        let record = read_record(&path, "fallback").unwrap();
        assert_eq!(record.label.as_str(), "20260101-full");
        assert!(record.valid.is_valid());
        assert!(!record.keep);
        assert_eq!(record.size, 4096);
    }

    #[test]
    fn missing_fields_use_documented_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("backup.info");
        fs::write(&path, "").unwrap();

        let record = read_record(&path, "20260101-full").unwrap();
        assert_eq!(record.label.as_str(), "20260101-full");
        assert_eq!(record.valid, ValidState::Unknown);
        assert!(!record.keep);
        assert_eq!(record.size, 0);
    }

    #[test]
    fn update_info_creates_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("backup.info");
        update_info(&path, KEY_BACKUP, "1024").unwrap();
        let fields = read_fields(&path).unwrap();
        assert_eq!(fields.get(KEY_BACKUP), Some(&"1024".to_string()));
    }

    #[test]
    fn update_info_preserves_other_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("backup.info");
        fs::write(&path, "LABEL=x\nVALID=1\n").unwrap();

        update_info(&path, KEY_BACKUP, "2048").unwrap();

        let fields = read_fields(&path).unwrap();
        assert_eq!(fields.get(KEY_LABEL), Some(&"x".to_string()));
        assert_eq!(fields.get(KEY_VALID), Some(&"1".to_string()));
        assert_eq!(fields.get(KEY_BACKUP), Some(&"2048".to_string()));
    }
}
