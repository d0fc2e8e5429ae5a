//! The schema graph
//!
//! `Schema` is the whole-state snapshot: tables keyed by id, plus a flat edge
//! list referring to tables and attributes by id. It is the only value that
//! is persisted or exported.
//!
//! Every mutating method leaves the graph consistent: after it returns, each
//! foreign-key attribute with a resolvable target has exactly one edge whose
//! `source_handle` is the attribute id, and no edge refers to a missing table
//! or attribute.

use crate::attribute::{Attribute, AttributePatch, AttributeSpec};
use crate::edge::{Edge, derive_edge};
use crate::ordering::{self, Direction};
use crate::table::{BLAMEABLE_COLUMNS, TIMESTAMP_COLUMNS, Table, TablePatch, TableSpec};
use schemaforge_core::{EngineError, EngineResult, Position};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Name given to a fresh diagram
pub const DEFAULT_DIAGRAM_NAME: &str = "Untitled Diagram";

// ============================================================================
// Schema
// ============================================================================

/// Tables, attributes and derived edges of one diagram
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Diagram name
    pub name: String,

    /// Tables in creation order
    #[serde(rename = "nodes")]
    pub tables: Vec<Table>,

    /// Derived foreign-key edges
    pub edges: Vec<Edge>,
}

impl Default for Schema {
    fn default() -> Self {
        Self::new(DEFAULT_DIAGRAM_NAME)
    }
}

impl Schema {
    /// Create an empty diagram
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tables: Vec::new(),
            edges: Vec::new(),
        }
    }

    // ========================================================================
    // Lookups
    // ========================================================================

    /// Get a table by id
    pub fn table(&self, id: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.id == id)
    }

    fn table_mut(&mut self, id: &str) -> Option<&mut Table> {
        self.tables.iter_mut().find(|t| t.id == id)
    }

    /// Get an attribute of a table
    pub fn attribute(&self, table_id: &str, attribute_id: &str) -> Option<&Attribute> {
        self.table(table_id).and_then(|t| t.attribute(attribute_id))
    }

    /// The edge derived from an attribute, if any
    pub fn edge_for_attribute(&self, table_id: &str, attribute_id: &str) -> Option<&Edge> {
        self.edges
            .iter()
            .find(|e| e.source == table_id && e.source_handle == attribute_id)
    }

    /// Edges starting or ending at a table
    pub fn edges_for_table(&self, table_id: &str) -> Vec<&Edge> {
        self.edges
            .iter()
            .filter(|e| e.touches_table(table_id))
            .collect()
    }

    /// Counts shown in the diagram stats panel
    pub fn stats(&self) -> SchemaStats {
        SchemaStats {
            tables: self.tables.len(),
            attributes: self.tables.iter().map(|t| t.attributes.len()).sum(),
            relationships: self.edges.len(),
        }
    }

    /// Check if the diagram has no tables
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    // ========================================================================
    // Diagram operations
    // ========================================================================

    /// Replace the diagram name
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Add a table and seed its attributes.
    ///
    /// Regular tables get an `id` primary key. Junction tables with two
    /// existing, distinct partners get one foreign key per partner instead.
    /// Behavior flags append their standard columns. Returns the new id.
    pub fn add_node(&mut self, spec: TableSpec) -> EngineResult<String> {
        check_position(spec.position)?;
        let mut table = spec.into_table();
        if self.table(&table.id).is_some() {
            return Err(EngineError::DuplicateTable(table.id));
        }

        if !table.is_junction {
            table.push_attribute(Attribute::primary_key_id(), None);
        } else if let Some(partners) = self.junction_partners(&table) {
            for partner in partners {
                let references_field = partner
                    .primary_key()
                    .map_or_else(|| "id".to_string(), |pk| pk.name.clone());
                let column = Attribute::behavior_column(format!("{}_id", partner.id))
                    .references(partner.id.clone())
                    .references_field(references_field);
                table.push_attribute(column, None);
            }
        }
        if table.with_timestamps {
            table.ensure_columns(&TIMESTAMP_COLUMNS);
        }
        if table.with_blameable {
            table.ensure_columns(&BLAMEABLE_COLUMNS);
        }

        let id = table.id.clone();
        tracing::debug!(table = %id, attributes = table.attributes.len(), "table added");
        self.tables.push(table);
        self.sync_edges();
        Ok(id)
    }

    fn junction_partners(&self, table: &Table) -> Option<[&Table; 2]> {
        let first = self.table(table.junction_table1.as_deref()?)?;
        let second = self.table(table.junction_table2.as_deref()?)?;
        (first.id != second.id).then_some([first, second])
    }

    /// Merge scalar fields into a table. Unknown ids are ignored.
    pub fn update_node(&mut self, id: &str, patch: &TablePatch) {
        let Some(table) = self.table_mut(id) else {
            tracing::debug!(table = %id, "update of unknown table ignored");
            return;
        };
        patch.apply_to(table);
        self.sync_edges();
    }

    /// Remove a table and every edge starting or ending at it
    pub fn delete_node(&mut self, id: &str) {
        let before = self.tables.len();
        self.tables.retain(|t| t.id != id);
        if self.tables.len() == before {
            return;
        }
        self.edges.retain(|e| !e.touches_table(id));
        self.sync_edges();
    }

    /// Move a table on the canvas. Non-finite coordinates are rejected.
    pub fn update_node_position(&mut self, id: &str, position: Position) -> EngineResult<()> {
        check_position(position)?;
        if let Some(table) = self.table_mut(id) {
            table.position = position;
        }
        Ok(())
    }

    // ========================================================================
    // Attribute operations
    // ========================================================================

    /// Add an attribute to a table.
    ///
    /// The id becomes `{tableId}-{name}` and the sort index the current
    /// maximum plus one unless the spec pins it. Returns the new attribute id,
    /// or `None` when the table does not exist.
    pub fn add_attribute(
        &mut self,
        table_id: &str,
        spec: AttributeSpec,
    ) -> EngineResult<Option<String>> {
        let Some(table) = self.table_mut(table_id) else {
            return Ok(None);
        };
        let name = spec.template.name.clone();
        if !table.push_attribute(spec.template, spec.sort) {
            return Err(EngineError::DuplicateAttribute {
                table: table_id.to_string(),
                attribute: name,
            });
        }
        let id = table.attribute_id_for(&name);
        self.sync_edges();
        Ok(Some(id))
    }

    /// Merge fields into an attribute.
    ///
    /// When the patch touches the foreign-key flag or target, the attribute's
    /// edge is dropped and re-derived from the merged state.
    pub fn update_attribute(
        &mut self,
        table_id: &str,
        attribute_id: &str,
        patch: &AttributePatch,
    ) {
        let Some(attribute) = self
            .table_mut(table_id)
            .and_then(|t| t.attribute_mut(attribute_id))
        else {
            return;
        };
        patch.apply_to(attribute);
        if patch.touches_foreign_key() {
            self.edges
                .retain(|e| !(e.source == table_id && e.source_handle == attribute_id));
        }
        self.sync_edges();
    }

    /// Remove an attribute and every edge referring to it by handle
    pub fn delete_attribute(&mut self, table_id: &str, attribute_id: &str) {
        let Some(table) = self.table_mut(table_id) else {
            return;
        };
        let before = table.attributes.len();
        table.attributes.retain(|a| a.id != attribute_id);
        if table.attributes.len() == before {
            return;
        }
        self.edges.retain(|e| !e.touches_attribute(attribute_id));
        self.sync_edges();
    }

    /// Swap an attribute's sort index with its neighbor in `direction`.
    ///
    /// Returns `false` when nothing moved.
    pub fn reorder_attribute(
        &mut self,
        table_id: &str,
        attribute_id: &str,
        direction: Direction,
    ) -> bool {
        self.table_mut(table_id)
            .is_some_and(|t| ordering::reorder(&mut t.attributes, attribute_id, direction))
    }

    // ========================================================================
    // Edge maintenance
    // ========================================================================

    /// Bring the edge list in line with the attributes.
    ///
    /// Existing edges keep their position and are refreshed in place; edges
    /// no attribute justifies are dropped; missing ones are appended in table
    /// then attribute insertion order.
    pub(crate) fn sync_edges(&mut self) {
        let mut derived: Vec<Option<Edge>> = Vec::new();
        for table in &self.tables {
            for attribute in &table.attributes {
                if let Some(edge) = derive_edge(&table.id, attribute, &self.tables) {
                    derived.push(Some(edge));
                }
            }
        }

        let mut seen: HashSet<(String, String)> = HashSet::new();
        let mut edges = Vec::with_capacity(derived.len());
        for existing in &self.edges {
            let key = (existing.source.clone(), existing.source_handle.clone());
            if seen.contains(&key) {
                continue;
            }
            let slot = derived.iter_mut().find(|d| {
                d.as_ref()
                    .is_some_and(|e| e.source == key.0 && e.source_handle == key.1)
            });
            if let Some(edge) = slot.and_then(Option::take) {
                seen.insert(key);
                edges.push(edge);
            }
        }
        edges.extend(derived.into_iter().flatten());
        self.edges = edges;
    }
}

// ============================================================================
// SchemaStats
// ============================================================================

/// Summary counts of a diagram
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SchemaStats {
    pub tables: usize,
    pub attributes: usize,
    pub relationships: usize,
}

fn check_position(position: Position) -> EngineResult<()> {
    if position.is_finite() {
        Ok(())
    } else {
        Err(EngineError::validation(format!(
            "Table position must be finite, got ({}, {})",
            position.x, position.y
        )))
    }
}

// ============================================================================
// Tests
// ============================================================================
