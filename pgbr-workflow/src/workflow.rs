//! Wires the delete state machine ([`crate::delete::execute`]) up as a [`WorkflowStage`]
//! (§4.6: "a three-stage workflow ... consumed by a generic workflow runner. Only `execute`
//! carries contract; `setup` and `teardown` log.").

use anyhow::Result;

use pgbr_api_types::{node_key, ServerConfig};

use crate::exclusion::ExclusionRegistry;
use crate::runner::{NodeDeque, WorkflowStage};

pub struct DeleteWorkflow<'a> {
    pub config: &'a ServerConfig,
    pub registry: &'a ExclusionRegistry,
}

impl WorkflowStage for DeleteWorkflow<'_> {
    fn setup(&self, server_id: &str, identifier: &str, _node: &mut NodeDeque) -> Result<()> {
        log::info!("server {server_id}: starting delete workflow for backup {identifier}");
        Ok(())
    }

    fn execute(&self, _server_id: &str, identifier: &str, node: &mut NodeDeque) -> Result<()> {
        let label = node.get_str(node_key::LABEL).unwrap_or(identifier);
        crate::delete::execute(self.config, self.registry, label, None)?;
        Ok(())
    }

    fn teardown(&self, server_id: &str, identifier: &str, _node: &mut NodeDeque) -> Result<()> {
        log::info!("server {server_id}: delete workflow finished for backup {identifier}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::run_chain;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn delete_workflow_stage_runs_the_state_machine_through_the_generic_runner() {
        let root = tempdir().unwrap();
        let dir = root.path().join("pg1/backup/20260101-full");
        fs::create_dir_all(dir.join("data")).unwrap();
        fs::write(dir.join("backup.info"), "LABEL=20260101-full\nVALID=1\nKEEP=0\nBACKUP=0\n").unwrap();

        let config = ServerConfig::new("pg1", root.path());
        let registry = ExclusionRegistry::new();
        let stage = DeleteWorkflow {
            config: &config,
            registry: &registry,
        };

        let mut node = NodeDeque::new();
        node.insert_str(node_key::LABEL, "20260101-full");

        run_chain(&stage, "pg1", "20260101-full", &mut node).unwrap();
        assert!(!dir.exists());
    }
}
