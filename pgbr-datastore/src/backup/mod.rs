//! Backup directory model (C6): enumerates `<label>` subdirectories of a server's `backup/`
//! root, parses each one's `valid`/`keep` flags, and persists size updates back into
//! `backup.info`. Grounded on `pbs-datastore::datastore::list_images`'s directory-enumeration
//! style of skipping unparseable entries rather than failing the whole listing.

pub mod tablespaces;

use std::fs;
use std::path::Path;

use anyhow::Context;

use pgbr_api_types::{BackupRecord, CoreError, CoreResult};

use crate::info;

/// Lists every backup under `server_backup_dir` (`<root>/<server>/backup/`), sorted ascending
/// by label (§4.5). A label whose `backup.info` is missing or unparseable is skipped silently,
/// never surfaced as an error — the invariant in §4.5.
pub fn list(server_backup_dir: &Path) -> CoreResult<Vec<BackupRecord>> {
    let read_dir = fs::read_dir(server_backup_dir).map_err(|err| {
        CoreError::FsEnum(server_backup_dir.display().to_string(), anyhow::Error::new(err))
    })?;

    let mut records = Vec::new();
    for entry in read_dir {
        let Ok(entry) = entry else { continue };
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if !file_type.is_dir() {
            continue;
        }
        let Some(label) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        let info_path = entry.path().join("backup.info");
        if let Ok(record) = info::read_record(&info_path, &label) {
            records.push(record);
        }
    }
    records.sort_by(|a, b| a.label.cmp(&b.label));
    Ok(records)
}

/// Total bytes of the subtree rooted at `path`, following symlinks to their content (§4.5).
pub fn size(path: &Path) -> u64 {
    crate::size::size(path)
}

/// Persists a key/value pair into `path`'s `backup.info` (§4.5). Failure is the `INFO_WRITE`
/// error kind (§7): callers are expected to log and continue rather than abort the workflow.
pub fn update_info(path: &Path, key: &str, value: &str) -> CoreResult<()> {
    info::update_info(path, key, value)
        .with_context(|| format!("updating backup.info at {}", path.display()))
        .map_err(|err| CoreError::InfoWrite(path.display().to_string(), err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_info(dir: &Path, label: &str, valid: &str, keep: &str, size: &str) {
        let backup_dir = dir.join(label);
        fs::create_dir_all(&backup_dir).unwrap();
        fs::write(
            backup_dir.join("backup.info"),
            format!("LABEL={label}\nVALID={valid}\nKEEP={keep}\nBACKUP={size}\n"),
        )
        .unwrap();
    }

    #[test]
    fn list_sorts_ascending_by_label() {
        let dir = tempdir().unwrap();
        write_info(dir.path(), "20260103-full", "1", "0", "10");
        write_info(dir.path(), "20260101-full", "1", "0", "10");
        write_info(dir.path(), "20260102-incr", "1", "0", "10");

        let records = list(dir.path()).unwrap();
        let labels: Vec<&str> = records.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["20260101-full", "20260102-incr", "20260103-full"]);
    }

    #[test]
    fn list_skips_labels_with_missing_or_unparseable_info() {
        let dir = tempdir().unwrap();
        write_info(dir.path(), "20260101-full", "1", "0", "10");
        fs::create_dir_all(dir.path().join("20260102-broken")).unwrap();
        // No backup.info at all under 20260102-broken.

        let records = list(dir.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].label.as_str(), "20260101-full");
    }

    #[test]
    fn update_info_round_trips_through_backup_module() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("backup.info");
        update_info(&path, "BACKUP", "512").unwrap();
        let record = info::read_record(&path, "fallback").unwrap();
        assert_eq!(record.size, 512);
    }
}
