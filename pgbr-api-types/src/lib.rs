//! Shared value types for the pgbr incremental-link and backup-retention core.
//!
//! Kept deliberately small and schema-free: this core owns no HTTP API and no CLI surface
//! (§6), so unlike the teacher's `pbs-api-types` these types carry plain `serde` derives
//! instead of `proxmox-schema` API macros.

mod backup;
mod compression;
mod config;
mod error;
mod node_key;
mod valid;

pub use backup::{BackupRecord, Label};
pub use compression::{CompressionType, SuffixConfig, ENCRYPTION_SUFFIX_LEN};
pub use config::{data_dir, ServerConfig};
pub use error::{CoreError, CoreResult};
pub use node_key::keys as node_key;
pub use valid::ValidState;
