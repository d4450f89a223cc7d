//! Path walker, file comparator, link engine, and backup directory model (C2-C6).
//!
//! This crate owns everything that touches the PostgreSQL data-directory tree on disk. The
//! delete workflow's state machine and the per-server exclusion flags (C7, C8) live one layer
//! up, in `pgbr-workflow`, which is the only caller expected to chain these pieces together.

pub mod backup;
pub mod comparator;
pub mod info;
pub mod link;
pub mod repair;
pub mod size;
pub mod suffix;
pub mod walker;

pub use comparator::compare_files;
pub use link::{
    link_backup, run_compare_link, run_link, run_link_manifest, run_relink, LinkItem, Manifest,
    ManifestKeys,
};
pub use suffix::trim_suffix;
pub use walker::{walk, LinkResolution, WalkEntry};
