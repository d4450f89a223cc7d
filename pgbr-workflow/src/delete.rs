//! The delete workflow's `execute` state machine (C7, §4.6). `setup`/`teardown` are the
//! logging-only bookends wired up in [`crate::runner`]; this module is the state machine those
//! bookends wrap.

use std::fs;
use std::path::Path;

use pgbr_api_types::{data_dir, CoreError, CoreResult, ServerConfig};
use pgbr_datastore::info::KEY_BACKUP;
use pgbr_tools::TaskLog;

use crate::exclusion::ExclusionRegistry;

/// Routes through [`pgbr_tools::task_warn!`] when a task context is supplied, the `log` facade
/// otherwise — the fallback the ambient-stack logging design calls for.
macro_rules! log_warn {
    ($task:expr, $($fmt:tt)+) => {
        match $task {
            Some(task) => pgbr_tools::task_warn!(task, $($fmt)+),
            None => log::warn!($($fmt)+),
        }
    };
}

fn remove_victim(victim_dir: &Path) -> CoreResult<()> {
    fs::remove_dir_all(victim_dir).map_err(|err| CoreError::Other(anyhow::Error::new(err)))?;
    Ok(())
}

/// Runs the S0-S6 state machine in §4.6 for `label` on the server described by `config`.
///
/// S0/S1/S6 (the exclusion dance) live here rather than in the guard itself, because S1 needs
/// to distinguish `BUSY` (delete already running) from `BACKUP_RUNNING` (backup in progress) —
/// two different error kinds the guard alone can't tell apart.
pub fn execute(
    config: &ServerConfig,
    registry: &ExclusionRegistry,
    label: &str,
    task: Option<&dyn TaskLog>,
) -> CoreResult<()> {
    let flags = registry.flags_for(&config.server);

    // S0
    let _guard = flags.try_start_delete().ok_or(CoreError::Busy)?;

    // S1
    if flags.backup_active() {
        return Err(CoreError::BackupRunning);
    }

    // S2
    let server_backup_dir = config.server_backup_dir();
    let chain = pgbr_datastore::backup::list(&server_backup_dir)?;
    let victim_index = chain
        .iter()
        .position(|record| record.label.as_str() == label)
        .ok_or_else(|| CoreError::UnknownLabel(label.to_string()))?;
    let victim = chain[victim_index].clone();
    if victim.keep {
        return Err(CoreError::Retained(label.to_string()));
    }

    // S3: scan backward for the nearest valid predecessor, forward for the nearest valid
    // successor. Relinking only ever targets the successor (§4.6's note: "forward links are
    // the direction of space-sharing in this system").
    let prev_valid = chain[..victim_index].iter().rev().find(|r| r.is_valid());
    let next_valid = chain[victim_index + 1..].iter().find(|r| r.is_valid());

    let victim_dir = server_backup_dir.join(victim.label.as_str());

    // S4
    if victim.is_valid() {
        match (prev_valid, next_valid) {
            // (·, N) and (P, N): both absorb into N — the spec collapses the two cases.
            (_, Some(next)) => {
                let neighbor_dir = server_backup_dir.join(next.label.as_str());
                let victim_data = data_dir(&victim_dir);
                let neighbor_data = data_dir(&neighbor_dir);

                pgbr_datastore::run_relink(&victim_data, &neighbor_data, config.worker_threads, task)
                    .map_err(CoreError::Other)?;

                remove_victim(&victim_dir)?;

                let recomputed = pgbr_datastore::backup::size(&neighbor_dir);
                let info_path = neighbor_dir.join("backup.info");
                if let Err(err) =
                    pgbr_datastore::backup::update_info(&info_path, KEY_BACKUP, &recomputed.to_string())
                {
                    // INFO_WRITE (§7): log and continue, do not abort a delete that otherwise
                    // already succeeded on disk.
                    log_warn!(task, "failed to persist recomputed size for {}: {err}", next.label);
                }
            }
            // (P, ·) and (·, ·): no successor to absorb into, nothing to relink.
            (Some(_), None) | (None, None) => {
                remove_victim(&victim_dir)?;
            }
        }
    } else {
        remove_victim(&victim_dir)?;
    }

    // S5
    if let Some(hot_standby) = &config.hot_standby {
        let remaining = pgbr_datastore::backup::list(&server_backup_dir).unwrap_or_default();
        if remaining.is_empty() {
            if let Err(err) = fs::remove_dir_all(hot_standby) {
                log_warn!(task, "failed to remove hot standby at {}: {err}", hot_standby.display());
            }
        }
    }

    // S6: `_guard`'s Drop stores `delete_active = false` on every exit path, including the
    // early returns above.
    Ok(())
}
