use thiserror::Error;

/// The error kinds the core exposes to callers, per the delete workflow's state machine.
///
/// Everything that is not one of these kinds (a stat() failing for an unexpected reason, a
/// malformed path) is wrapped in [`CoreError::Other`] instead of growing the enum further.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The per-server delete flag was already held by another caller.
    #[error("delete already in progress for this server")]
    Busy,

    /// A backup is currently being taken for this server.
    #[error("backup in progress for this server")]
    BackupRunning,

    /// No backup in the chain matches the requested label.
    #[error("no such backup: {0}")]
    UnknownLabel(String),

    /// The victim backup has `keep = true` and may not be deleted.
    #[error("backup {0} is retained and cannot be deleted")]
    Retained(String),

    /// The server's `backup/` directory could not be enumerated.
    #[error("unable to enumerate backups for server {0}: {1}")]
    FsEnum(String, #[source] anyhow::Error),

    /// A size update to `backup.info` failed. Callers log this and continue.
    #[error("failed to update backup.info for {0}: {1}")]
    InfoWrite(String, #[source] anyhow::Error),

    /// Anything else, propagated from filesystem or I/O operations. This also covers §7's
    /// `WORKER_INPUT` kind: constructing a [`crate::ServerConfig`]-derived `(from, to)` pair is
    /// infallible in this crate (plain `PathBuf` joins, never parsed or allocated in a way that
    /// can fail), so there is no call site that could ever produce it as a distinct variant.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type CoreResult<T> = Result<T, CoreError>;
