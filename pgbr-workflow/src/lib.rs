//! Delete workflow state machine and per-server exclusion state (C7, C8).
//!
//! This crate is the only caller expected to chain `pgbr-datastore`'s path walker, link engine,
//! and backup directory model together into the product-level delete operation; the two crates
//! below it never reference each other's delete-specific concerns.

pub mod delete;
pub mod exclusion;
pub mod runner;
pub mod workflow;

pub use exclusion::{BackupGuard, DeleteGuard, ExclusionRegistry, ServerFlags};
pub use runner::{run_chain, NodeDeque, NodeValue, WorkflowStage};
pub use workflow::DeleteWorkflow;
