//! Per-server exclusion state (C8): atomic `backup_active`/`delete_active` flags.
//!
//! Modeled on the design note in §9: "wrap them in an owned server registry passed by
//! reference; use atomic primitives with acquire/release semantics. Do not use re-entrant
//! locks — the CAS-and-report-BUSY discipline is intentional." The registry is a value owned
//! by whoever drives the workflow (the CLI binary, a test), not process-global `static` state.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// The pair of atomic booleans for one server (§3, §4.7). At most one of the two is ever true.
#[derive(Default)]
pub struct ServerFlags {
    backup_active: AtomicBool,
    delete_active: AtomicBool,
}

impl ServerFlags {
    pub fn backup_active(&self) -> bool {
        self.backup_active.load(Ordering::Acquire)
    }

    pub fn delete_active(&self) -> bool {
        self.delete_active.load(Ordering::Acquire)
    }

    /// CAS `backup_active` false→true. The backup pipeline is assumed to hold its own flag
    /// elsewhere in the product (§4.7); this core only exposes the primitive.
    pub fn try_start_backup(self: &Arc<Self>) -> Option<BackupGuard> {
        self.backup_active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BackupGuard {
                flags: Arc::clone(self),
            })
    }

    /// CAS `delete_active` false→true; `None` if a delete already holds it. Does not itself
    /// inspect `backup_active` — that stays the caller's separate S1 check (§4.6), so `BUSY`
    /// and `BACKUP_RUNNING` remain distinguishable error kinds.
    pub fn try_start_delete(self: &Arc<Self>) -> Option<DeleteGuard> {
        self.delete_active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| DeleteGuard {
                flags: Arc::clone(self),
            })
    }
}

/// Released on drop: every exit path from the delete workflow, including error returns,
/// restores `delete_active` to `false` (§4.6 S6, §9's scoped-guard design note).
pub struct DeleteGuard {
    flags: Arc<ServerFlags>,
}

impl Drop for DeleteGuard {
    fn drop(&mut self) {
        self.flags.delete_active.store(false, Ordering::Release);
    }
}

/// Mirror guard for the backup side of the pair, exposed for completeness even though this
/// core does not itself start backups.
pub struct BackupGuard {
    flags: Arc<ServerFlags>,
}

impl Drop for BackupGuard {
    fn drop(&mut self) {
        self.flags.backup_active.store(false, Ordering::Release);
    }
}

/// Owned registry of per-server flags, keyed by server name.
#[derive(Default)]
pub struct ExclusionRegistry {
    servers: Mutex<HashMap<String, Arc<ServerFlags>>>,
}

impl ExclusionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flags_for(&self, server: &str) -> Arc<ServerFlags> {
        let mut servers = self.servers.lock().unwrap();
        Arc::clone(
            servers
                .entry(server.to_string())
                .or_insert_with(|| Arc::new(ServerFlags::default())),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_delete_on_same_server_is_refused_while_first_holds_the_flag() {
        let registry = ExclusionRegistry::new();
        let flags = registry.flags_for("pg1");

        let guard = flags.try_start_delete().unwrap();
        assert!(flags.try_start_delete().is_none());
        drop(guard);
        assert!(flags.try_start_delete().is_some());
    }

    #[test]
    fn registry_hands_out_the_same_flags_for_the_same_server() {
        let registry = ExclusionRegistry::new();
        let a = registry.flags_for("pg1");
        let b = registry.flags_for("pg1");
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn different_servers_have_independent_flags() {
        let registry = ExclusionRegistry::new();
        let pg1 = registry.flags_for("pg1");
        let pg2 = registry.flags_for("pg2");

        let _guard = pg1.try_start_delete().unwrap();
        assert!(pg2.try_start_delete().is_some());
    }

    #[test]
    fn guard_drop_releases_the_flag_for_reacquisition() {
        let registry = ExclusionRegistry::new();
        let flags = registry.flags_for("pg1");
        assert!(!flags.delete_active());
        {
            let _guard = flags.try_start_delete().unwrap();
            assert!(flags.delete_active());
        }
        assert!(!flags.delete_active());
    }
}
