//! Thin CLI wrapper around the incremental-link and backup-retention core (§6: "No CLI surface
//! is owned by this core"). Owns argument parsing and stanza lookup only; all linking/deletion
//! logic lives in `pgbr-datastore`/`pgbr-workflow`.

use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use pgbr_datastore::Manifest;
use pgbr_workflow::{delete, ExclusionRegistry};

#[derive(Parser)]
#[command(name = "pgbr-manager", about = "incremental-link and backup-retention operations")]
struct Cli {
    /// Path to the INI-stanza configuration file.
    #[arg(long, default_value = "/etc/pgbr/pgbr.conf")]
    config: PathBuf,

    /// Name of the `[server]` stanza to operate on.
    #[arg(long)]
    server: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Backup-tree linking and deletion operations.
    Backup {
        #[command(subcommand)]
        action: BackupAction,
    },
}

#[derive(Subcommand)]
enum BackupAction {
    /// Deduplicates a freshly taken backup against its immediate predecessor: Mode LINK over
    /// `data/`, then Mode COMPARE-LINK over every tablespace sibling (§4.2.1, §4.2.4).
    Link { label: String, prev_label: String },

    /// Mode LINK on raw paths, bypassing backup-root/tablespace discovery.
    LinkRaw { from: PathBuf, to: PathBuf },

    /// Mode LINK-MANIFEST: post-incremental-backup deduplication trusting the manifest
    /// (§4.2.2). `--added`/`--changed` may be repeated for each relative path in that set.
    LinkManifest {
        base_from: PathBuf,
        base_to: PathBuf,
        #[arg(long = "added")]
        added: Vec<String>,
        #[arg(long = "changed")]
        changed: Vec<String>,
    },

    /// Runs the delete workflow (§4.6) for a backup label.
    Delete { label: String },

    /// Lists dangling symlinks under the server's backup tree (§7's documented manual-repair
    /// step). Read-only: reports, does not fix.
    ScanDangling,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let servers = pgbr_config::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    let config = servers
        .into_iter()
        .find(|s| s.server == cli.server)
        .with_context(|| format!("no stanza named {:?} in {}", cli.server, cli.config.display()))?;

    match cli.command {
        Command::Backup { action } => match action {
            BackupAction::Link { label, prev_label } => {
                let from_root = config.backup_dir(&label);
                let to_root = config.backup_dir(&prev_label);
                pgbr_datastore::link_backup(&from_root, &to_root, config.worker_threads, None)?;
            }
            BackupAction::LinkRaw { from, to } => {
                pgbr_datastore::run_link(&from, &to, config.worker_threads, None)?;
            }
            BackupAction::LinkManifest {
                base_from,
                base_to,
                added,
                changed,
            } => {
                let added: HashSet<String> = added.into_iter().collect();
                let changed: HashSet<String> = changed.into_iter().collect();
                let manifest = Manifest {
                    added: &added,
                    changed: &changed,
                };
                pgbr_datastore::run_link_manifest(
                    &base_from,
                    &base_to,
                    &manifest,
                    config.suffix_config(),
                    config.worker_threads,
                    None,
                )?;
            }
            BackupAction::Delete { label } => {
                let registry = ExclusionRegistry::new();
                delete::execute(&config, &registry, &label, None)?;
            }
            BackupAction::ScanDangling => {
                let dangling = pgbr_datastore::repair::scan_dangling(&config.server_backup_dir())?;
                for path in &dangling {
                    println!("{}", path.display());
                }
                if dangling.is_empty() {
                    log::info!("no dangling symlinks found under {}", config.server_backup_dir().display());
                }
            }
        },
    }

    Ok(())
}
