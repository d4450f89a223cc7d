//! The workflow runner contract (§6, exposed): three stages — `setup`, `execute`, `teardown`
//! — run against a node-deque-style keyed map, with each workflow able to chain into a `next`
//! one. The distilled spec describes `next` as a raw function-pointer field on a C struct; here
//! it is `WorkflowStage::next`, a trait method returning the next stage as a trait object —
//! the same chaining shape, expressed without raw pointers.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Result;

/// One value a node-deque slot can hold. The distilled spec's map is untyped (string keys into
/// a heterogeneous container); this narrows it to the two shapes every documented key actually
/// needs (§6: `IDENTIFIER`, `LABEL` are strings, the `*_BASE`/`*_DATA`/`DESTINATION`/`TARFILE`
/// keys are paths).
#[derive(Debug, Clone)]
pub enum NodeValue {
    Str(String),
    Path(PathBuf),
}

/// The heterogeneous keyed map a workflow runner threads through `setup`/`execute`/`teardown`
/// (§6's "node deque"). Built by the external collaborator driving the workflow (the delete CLI
/// command); this crate only reads from it.
#[derive(Debug, Default, Clone)]
pub struct NodeDeque {
    fields: HashMap<String, NodeValue>,
}

impl NodeDeque {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_str(&mut self, key: &str, value: impl Into<String>) -> &mut Self {
        self.fields.insert(key.to_string(), NodeValue::Str(value.into()));
        self
    }

    pub fn insert_path(&mut self, key: &str, value: impl Into<PathBuf>) -> &mut Self {
        self.fields.insert(key.to_string(), NodeValue::Path(value.into()));
        self
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.fields.get(key) {
            Some(NodeValue::Str(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn get_path(&self, key: &str) -> Option<&Path> {
        match self.fields.get(key) {
            Some(NodeValue::Path(p)) => Some(p.as_path()),
            _ => None,
        }
    }
}

/// A workflow runnable by [`run_chain`]. Only `execute` is expected to carry real contract;
/// `setup`/`teardown` are free to just log (§4.6).
pub trait WorkflowStage {
    fn setup(&self, server_id: &str, identifier: &str, node: &mut NodeDeque) -> Result<()>;
    fn execute(&self, server_id: &str, identifier: &str, node: &mut NodeDeque) -> Result<()>;
    fn teardown(&self, server_id: &str, identifier: &str, node: &mut NodeDeque) -> Result<()>;

    /// The next workflow in the chain, if any (§6's `next` pointer).
    fn next(&self) -> Option<&dyn WorkflowStage> {
        None
    }
}

/// Runs `stage`, then its `next()` chain, in order. Any stage returning `Err` aborts the whole
/// chain immediately — the distilled spec's "non-zero aborts the chain" (§6) — but `teardown`
/// still runs for the stage that failed, so partial setup is always unwound.
pub fn run_chain(
    stage: &dyn WorkflowStage,
    server_id: &str,
    identifier: &str,
    node: &mut NodeDeque,
) -> Result<()> {
    stage.setup(server_id, identifier, node)?;
    let result = stage.execute(server_id, identifier, node);
    stage.teardown(server_id, identifier, node)?;
    result?;

    if let Some(next) = stage.next() {
        run_chain(next, server_id, identifier, node)?;
    }
    Ok(())
}
