/// String handles into the workflow runner's heterogeneous keyed map (§6).
///
/// The external collaborator that drives a workflow (the delete CLI command) builds one of
/// these maps and hands it to [`crate::NodeKey`]-indexed lookups inside `execute`; this core
/// never constructs the map itself, only reads from it.
pub mod keys {
    pub const IDENTIFIER: &str = "IDENTIFIER";
    pub const LABEL: &str = "LABEL";
    pub const BACKUP: &str = "BACKUP";
    pub const SERVER_BASE: &str = "SERVER_BASE";
    pub const SERVER_BACKUP: &str = "SERVER_BACKUP";
    pub const BACKUP_BASE: &str = "BACKUP_BASE";
    pub const BACKUP_DATA: &str = "BACKUP_DATA";
    pub const DESTINATION: &str = "DESTINATION";
    pub const TARFILE: &str = "TARFILE";
}
