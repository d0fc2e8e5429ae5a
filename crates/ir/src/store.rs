//! The schema store
//!
//! [`reduce`] is the pure form of every operation: it takes a snapshot and a
//! [`SchemaCommand`] and builds the next snapshot without touching the input.
//! [`SchemaStore`] wraps it in a versioned container that publishes each new
//! snapshot as an `Arc<Schema>` and writes it through a [`StoragePort`].

use crate::attribute::{AttributePatch, AttributeSpec};
use crate::ordering::Direction;
use crate::schema::Schema;
use crate::serialization::{self, default_file_name};
use crate::table::{TablePatch, TableSpec, table_id_from_name};
use schemaforge_core::{EngineError, EngineResult, Position, StoragePort};
use std::sync::Arc;

/// Storage key used when none is configured
pub const DEFAULT_STORAGE_KEY: &str = "schemaforge-diagram";

// ============================================================================
// SchemaCommand
// ============================================================================

/// One mutation of the schema
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaCommand {
    SetName(String),
    AddNode(TableSpec),
    UpdateNode {
        id: String,
        patch: TablePatch,
    },
    DeleteNode(String),
    UpdateNodePosition {
        id: String,
        position: Position,
    },
    AddAttribute {
        table_id: String,
        spec: AttributeSpec,
    },
    UpdateAttribute {
        table_id: String,
        attribute_id: String,
        patch: AttributePatch,
    },
    DeleteAttribute {
        table_id: String,
        attribute_id: String,
    },
    ReorderAttribute {
        table_id: String,
        attribute_id: String,
        direction: Direction,
    },
    /// Replace the whole diagram with an imported payload
    LoadDiagram(serde_json::Value),
}

impl SchemaCommand {
    /// Operation name used in log events
    pub fn name(&self) -> &'static str {
        match self {
            SchemaCommand::SetName(_) => "setName",
            SchemaCommand::AddNode(_) => "addNode",
            SchemaCommand::UpdateNode { .. } => "updateNode",
            SchemaCommand::DeleteNode(_) => "deleteNode",
            SchemaCommand::UpdateNodePosition { .. } => "updateNodePosition",
            SchemaCommand::AddAttribute { .. } => "addAttribute",
            SchemaCommand::UpdateAttribute { .. } => "updateAttribute",
            SchemaCommand::DeleteAttribute { .. } => "deleteAttribute",
            SchemaCommand::ReorderAttribute { .. } => "reorderAttribute",
            SchemaCommand::LoadDiagram(_) => "loadDiagram",
        }
    }

    /// Table the command targets, if any
    pub fn table_id(&self) -> Option<&str> {
        match self {
            SchemaCommand::UpdateNode { id, .. }
            | SchemaCommand::DeleteNode(id)
            | SchemaCommand::UpdateNodePosition { id, .. } => Some(id),
            SchemaCommand::AddAttribute { table_id, .. }
            | SchemaCommand::UpdateAttribute { table_id, .. }
            | SchemaCommand::DeleteAttribute { table_id, .. }
            | SchemaCommand::ReorderAttribute { table_id, .. } => Some(table_id),
            SchemaCommand::SetName(_)
            | SchemaCommand::AddNode(_)
            | SchemaCommand::LoadDiagram(_) => None,
        }
    }
}

/// Apply `command` to a copy of `schema` and return the copy.
///
/// On error the input is untouched and no partial state escapes.
pub fn reduce(schema: &Schema, command: SchemaCommand) -> EngineResult<Schema> {
    let mut next = schema.clone();
    apply(&mut next, command)?;
    Ok(next)
}

fn apply(schema: &mut Schema, command: SchemaCommand) -> EngineResult<()> {
    match command {
        SchemaCommand::SetName(name) => schema.set_name(name),
        SchemaCommand::AddNode(spec) => {
            schema.add_node(spec)?;
        }
        SchemaCommand::UpdateNode { id, patch } => schema.update_node(&id, &patch),
        SchemaCommand::DeleteNode(id) => schema.delete_node(&id),
        SchemaCommand::UpdateNodePosition { id, position } => {
            schema.update_node_position(&id, position)?;
        }
        SchemaCommand::AddAttribute { table_id, spec } => {
            schema.add_attribute(&table_id, spec)?;
        }
        SchemaCommand::UpdateAttribute {
            table_id,
            attribute_id,
            patch,
        } => schema.update_attribute(&table_id, &attribute_id, &patch),
        SchemaCommand::DeleteAttribute {
            table_id,
            attribute_id,
        } => schema.delete_attribute(&table_id, &attribute_id),
        SchemaCommand::ReorderAttribute {
            table_id,
            attribute_id,
            direction,
        } => {
            schema.reorder_attribute(&table_id, &attribute_id, direction);
        }
        SchemaCommand::LoadDiagram(raw) => {
            *schema = serialization::load_diagram_value(raw)?;
        }
    }
    Ok(())
}

// ============================================================================
// StoreConfig
// ============================================================================

/// How a store talks to its persistence port
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Key the snapshot is stored under
    pub key: String,

    /// Write the snapshot after every mutation
    pub autosave: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            key: DEFAULT_STORAGE_KEY.to_string(),
            autosave: true,
        }
    }
}

impl StoreConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Only write on an explicit [`SchemaStore::flush`]
    pub fn without_autosave(mut self) -> Self {
        self.autosave = false;
        self
    }
}

// ============================================================================
// SchemaStore
// ============================================================================

/// Versioned owner of the authoritative schema snapshot
#[derive(Debug)]
pub struct SchemaStore<S: StoragePort> {
    current: Arc<Schema>,
    version: u64,
    dirty: bool,
    storage: S,
    config: StoreConfig,
}

impl<S: StoragePort> SchemaStore<S> {
    /// Open a store with the default configuration
    pub fn open(storage: S) -> Self {
        Self::with_config(storage, StoreConfig::default())
    }

    /// Open a store and restore its snapshot from `storage`.
    ///
    /// A read failure or unreadable payload starts from the default diagram.
    pub fn with_config(storage: S, config: StoreConfig) -> Self {
        let stored = match storage.get(&config.key) {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!(key = %config.key, error = %e, "failed to read stored diagram");
                None
            }
        };
        let schema = serialization::restore_schema(stored.as_deref());
        Self {
            current: Arc::new(schema),
            version: 0,
            dirty: false,
            storage,
            config,
        }
    }

    /// The current snapshot
    pub fn snapshot(&self) -> Arc<Schema> {
        Arc::clone(&self.current)
    }

    /// Borrow the current snapshot
    pub fn schema(&self) -> &Schema {
        &self.current
    }

    /// Number of snapshots published since the store was opened
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Whether the last published snapshot has not reached storage
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Apply a command and publish the resulting snapshot.
    ///
    /// A command that changes nothing publishes nothing and writes nothing.
    pub fn dispatch(&mut self, command: SchemaCommand) -> EngineResult<Arc<Schema>> {
        tracing::debug!(
            command = command.name(),
            table = command.table_id().unwrap_or("-"),
            version = self.version,
            "dispatch"
        );
        let next = reduce(&self.current, command)?;
        if next != *self.current {
            self.publish(next);
        }
        Ok(self.snapshot())
    }

    fn publish(&mut self, next: Schema) {
        self.current = Arc::new(next);
        self.version += 1;
        self.dirty = true;
        if self.config.autosave {
            if let Err(e) = self.write() {
                tracing::error!(key = %self.config.key, error = %e, "failed to persist diagram");
            }
        }
    }

    fn write(&mut self) -> EngineResult<()> {
        let json = serialization::export_diagram_compact(&self.current)?;
        self.storage.set(&self.config.key, &json)?;
        self.dirty = false;
        Ok(())
    }

    /// Write the current snapshot if it has not been persisted yet
    pub fn flush(&mut self) -> EngineResult<()> {
        if self.dirty { self.write() } else { Ok(()) }
    }

    // ========================================================================
    // Operations
    // ========================================================================

    pub fn set_name(&mut self, name: impl Into<String>) -> EngineResult<()> {
        self.dispatch(SchemaCommand::SetName(name.into()))?;
        Ok(())
    }

    /// Add a table and return its id
    pub fn add_node(&mut self, spec: TableSpec) -> EngineResult<String> {
        let id = table_id_from_name(&spec.name);
        self.dispatch(SchemaCommand::AddNode(spec))?;
        Ok(id)
    }

    pub fn update_node(&mut self, id: &str, patch: TablePatch) -> EngineResult<()> {
        self.dispatch(SchemaCommand::UpdateNode {
            id: id.to_string(),
            patch,
        })?;
        Ok(())
    }

    pub fn delete_node(&mut self, id: &str) -> EngineResult<()> {
        self.dispatch(SchemaCommand::DeleteNode(id.to_string()))?;
        Ok(())
    }

    pub fn update_node_position(&mut self, id: &str, position: Position) -> EngineResult<()> {
        self.dispatch(SchemaCommand::UpdateNodePosition {
            id: id.to_string(),
            position,
        })?;
        Ok(())
    }

    /// Add an attribute and return its id, `None` if the table is unknown
    pub fn add_attribute(
        &mut self,
        table_id: &str,
        spec: impl Into<AttributeSpec>,
    ) -> EngineResult<Option<String>> {
        let spec = spec.into();
        let id = self
            .current
            .table(table_id)
            .map(|t| t.attribute_id_for(&spec.template.name));
        self.dispatch(SchemaCommand::AddAttribute {
            table_id: table_id.to_string(),
            spec,
        })?;
        Ok(id)
    }

    pub fn update_attribute(
        &mut self,
        table_id: &str,
        attribute_id: &str,
        patch: AttributePatch,
    ) -> EngineResult<()> {
        self.dispatch(SchemaCommand::UpdateAttribute {
            table_id: table_id.to_string(),
            attribute_id: attribute_id.to_string(),
            patch,
        })?;
        Ok(())
    }

    pub fn delete_attribute(&mut self, table_id: &str, attribute_id: &str) -> EngineResult<()> {
        self.dispatch(SchemaCommand::DeleteAttribute {
            table_id: table_id.to_string(),
            attribute_id: attribute_id.to_string(),
        })?;
        Ok(())
    }

    /// Move an attribute one step; `false` when it was already at the boundary
    pub fn reorder_attribute(
        &mut self,
        table_id: &str,
        attribute_id: &str,
        direction: Direction,
    ) -> EngineResult<bool> {
        let before = self.version;
        self.dispatch(SchemaCommand::ReorderAttribute {
            table_id: table_id.to_string(),
            attribute_id: attribute_id.to_string(),
            direction,
        })?;
        Ok(self.version != before)
    }

    /// Replace the diagram with an imported payload
    pub fn load_diagram(&mut self, raw: serde_json::Value) -> EngineResult<()> {
        self.dispatch(SchemaCommand::LoadDiagram(raw))?;
        Ok(())
    }

    /// Replace the diagram with imported JSON text
    pub fn load_diagram_str(&mut self, json: &str) -> EngineResult<()> {
        let raw = serde_json::from_str(json)
            .map_err(|e| EngineError::InvalidDiagramFormat(format!("Invalid JSON: {}", e)))?;
        self.load_diagram(raw)
    }

    /// Start over with an empty diagram
    pub fn reset(&mut self, name: impl Into<String>) {
        let next = Schema::new(name);
        if next != *self.current {
            self.publish(next);
        }
    }

    // ========================================================================
    // Export
    // ========================================================================

    /// Pretty printed export of the current snapshot
    pub fn export_json(&self) -> EngineResult<String> {
        serialization::export_diagram(&self.current)
    }

    /// File name offered for the export
    pub fn export_file_name(&self) -> String {
        default_file_name(&self.current.name)
    }
}

// ============================================================================
// Tests
// ============================================================================
