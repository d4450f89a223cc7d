use std::fs;
use std::os::unix::fs::symlink;
use std::sync::Arc;

use anyhow::Result;
use tempfile::tempdir;

use pgbr_api_types::{CoreError, ServerConfig};
use pgbr_workflow::{delete, ExclusionRegistry};

fn write_backup(root: &std::path::Path, server: &str, label: &str, valid: &str, keep: &str) -> std::path::PathBuf {
    let dir = root.join(server).join("backup").join(label);
    fs::create_dir_all(dir.join("data")).unwrap();
    fs::write(
        dir.join("backup.info"),
        format!("LABEL={label}\nVALID={valid}\nKEEP={keep}\nBACKUP=0\n"),
    )
    .unwrap();
    dir
}

/// §8 end-to-end scenario 6: delete middle backup, no danglers survive, size recomputed.
#[test]
fn delete_middle_backup_leaves_no_dangling_reference_to_the_victim() -> Result<()> {
    let root = tempdir()?;
    write_backup(root.path(), "pg1", "b1", "1", "0");
    let b2 = write_backup(root.path(), "pg1", "b2", "1", "0");
    let b3 = write_backup(root.path(), "pg1", "b3", "1", "0");

    fs::write(b2.join("data/a.dat"), b"payload")?;
    symlink(b2.join("data/a.dat"), b3.join("data/a.dat"))?;

    let config = ServerConfig::new("pg1", root.path());
    let registry = ExclusionRegistry::new();

    delete::execute(&config, &registry, "b2", None)?;

    assert!(!b2.exists());
    let b3_file = b3.join("data/a.dat");
    assert!(!fs::symlink_metadata(&b3_file)?.file_type().is_symlink());
    assert_eq!(fs::read(&b3_file)?, b"payload");

    let b3_info = fs::read_to_string(b3.join("backup.info"))?;
    assert!(b3_info.contains(&format!("BACKUP={}", "payload".len())));
    Ok(())
}

/// §8 invariant 6: at most one of two concurrent deletes on the same server proceeds past S0;
/// the loser observes `BUSY`.
#[test]
fn concurrent_deletes_on_the_same_server_are_mutually_exclusive() -> Result<()> {
    let root = tempdir()?;
    write_backup(root.path(), "pg1", "b1", "1", "0");
    write_backup(root.path(), "pg1", "b2", "1", "0");

    let config = Arc::new(ServerConfig::new("pg1", root.path()));
    let registry = Arc::new(ExclusionRegistry::new());

    let flags = registry.flags_for("pg1");
    let _held = flags.try_start_delete().unwrap();

    let err = delete::execute(&config, &registry, "b1", None).unwrap_err();
    assert!(matches!(err, CoreError::Busy));

    drop(_held);
    // Once released, a fresh attempt proceeds normally.
    delete::execute(&config, &registry, "b1", None)?;
    Ok(())
}
