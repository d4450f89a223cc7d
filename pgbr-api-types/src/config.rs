use std::path::{Path, PathBuf};

use crate::compression::{CompressionType, SuffixConfig};

/// The knobs a single PostgreSQL server (stanza) needs that don't belong to one invocation:
/// repository root, worker count (feeds C1), compression/encryption (feed C5), and an optional
/// hot-standby mirror path (feeds §4.6 S5).
///
/// Intentionally a plain struct the caller constructs and passes in, not something this crate
/// reads from a config file itself — config-file parsing is an explicit external collaborator
/// (§1); `pgbr-config` is the thin crate that produces these from an on-disk stanza file.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub server: String,
    pub root: PathBuf,
    pub worker_threads: usize,
    pub compression: CompressionType,
    pub encryption: bool,
    pub hot_standby: Option<PathBuf>,
}

impl ServerConfig {
    pub fn new(server: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            server: server.into(),
            root: root.into(),
            worker_threads: 0,
            compression: CompressionType::None,
            encryption: false,
            hot_standby: None,
        }
    }

    /// `<root>/<server>/backup/`, the directory [`crate::keys`]-style callers enumerate (§6).
    pub fn server_backup_dir(&self) -> PathBuf {
        self.root.join(&self.server).join("backup")
    }

    /// `<root>/<server>/backup/<label>/`.
    pub fn backup_dir(&self, label: &str) -> PathBuf {
        self.server_backup_dir().join(label)
    }

    pub fn suffix_config(&self) -> SuffixConfig {
        SuffixConfig::new(self.compression, self.encryption)
    }
}

/// `<backup_dir>/data`, the per-file-action root for Mode LINK/RELINK (§4.2.1, §4.2.3). Takes
/// a `&Path` rather than a label, for callers ([`crate::config`]'s own crate excluded) that
/// already have a backup or neighbor directory in hand rather than a label to look one up by.
pub fn data_dir(backup_dir: &Path) -> PathBuf {
    backup_dir.join("data")
}
