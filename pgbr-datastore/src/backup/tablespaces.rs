//! Enumerates tablespace sibling directories of `data/` within a backup root.
//!
//! Supplements Mode COMPARE-LINK (§4.2.4), which is described as walking "only tablespace
//! siblings" but the distilled spec does not say how those siblings are discovered.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Lists the non-`data` subdirectories directly under `backup_root` — the tablespace siblings
/// Mode COMPARE-LINK walks one at a time. Non-directory entries (`backup.info`) are ignored.
pub fn list(backup_root: &Path) -> Result<Vec<PathBuf>> {
    let read_dir = fs::read_dir(backup_root)
        .with_context(|| format!("unable to enumerate {}", backup_root.display()))?;

    let mut tablespaces = Vec::new();
    for entry in read_dir {
        let entry = entry?;
        if entry.file_name() == "data" {
            continue;
        }
        if entry.file_type()?.is_dir() {
            tablespaces.push(entry.path());
        }
    }
    tablespaces.sort();
    Ok(tablespaces)
}
