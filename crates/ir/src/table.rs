//! Table definitions (diagram nodes)
//!
//! This module contains the `Table` struct, the `TableSpec` used to create a
//! table and the `TablePatch` used to update one, together with the reserved
//! behavior columns added by the timestamp and blameable flags.

use crate::attribute::Attribute;
use crate::ordering;
use schemaforge_core::Position;
use serde::{Deserialize, Serialize};

/// Columns added by the timestamp behavior
pub const TIMESTAMP_COLUMNS: [&str; 2] = ["created_at", "updated_at"];

/// Columns added by the blameable behavior
pub const BLAMEABLE_COLUMNS: [&str; 2] = ["created_by", "updated_by"];

// ============================================================================
// Table
// ============================================================================

/// A modeled relational table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    /// Derived once from the name, immutable afterwards
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Position on the canvas
    #[serde(default)]
    pub position: Position,

    #[serde(default)]
    pub with_timestamps: bool,

    #[serde(default)]
    pub with_blameable: bool,

    /// Leave the `id` primary key out of the compiled command
    #[serde(default = "default_true")]
    pub hide_id_in_command: bool,

    #[serde(default)]
    pub is_junction: bool,

    /// Table id of the first junction partner
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub junction_table1: Option<String>,

    /// Table id of the second junction partner
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub junction_table2: Option<String>,

    /// Attributes in insertion order; `sort` decides display order
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

fn default_true() -> bool {
    true
}

impl Table {
    /// Create an empty table named `name`
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: table_id_from_name(&name),
            name,
            description: String::new(),
            position: Position::zero(),
            with_timestamps: false,
            with_blameable: false,
            hide_id_in_command: true,
            is_junction: false,
            junction_table1: None,
            junction_table2: None,
            attributes: Vec::new(),
        }
    }

    /// Get an attribute by id
    pub fn attribute(&self, id: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.id == id)
    }

    /// Get a mutable attribute by id
    pub fn attribute_mut(&mut self, id: &str) -> Option<&mut Attribute> {
        self.attributes.iter_mut().find(|a| a.id == id)
    }

    /// Get an attribute by name
    pub fn attribute_by_name(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Check if the table has an attribute with the given name
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute_by_name(name).is_some()
    }

    /// The attribute flagged as primary key, if any
    pub fn primary_key(&self) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.is_primary_key)
    }

    /// Attributes ordered by `sort`
    pub fn sorted_attributes(&self) -> Vec<&Attribute> {
        ordering::sorted_by_sort(&self.attributes)
    }

    /// The id an attribute named `name` gets in this table
    pub fn attribute_id_for(&self, name: &str) -> String {
        format!("{}-{}", self.id, name)
    }

    /// Append `template` as a new attribute at the next sort index.
    ///
    /// Returns `false` without touching the table when the name or the id it
    /// would get is taken. Ids are fixed at creation, so a renamed attribute
    /// still holds the id of its old name.
    pub(crate) fn push_attribute(&mut self, template: Attribute, sort: Option<i64>) -> bool {
        let id = self.attribute_id_for(&template.name);
        if self.has_attribute(&template.name) || self.attribute(&id).is_some() {
            return false;
        }
        let sort = match sort {
            Some(sort) => sort,
            None => ordering::next_sort(&mut self.attributes),
        };
        self.attributes.push(template.with_id(id).with_sort(sort));
        true
    }

    /// Append any missing behavior columns, skipping names already present
    pub(crate) fn ensure_columns(&mut self, names: &[&str]) {
        for name in names {
            self.push_attribute(Attribute::behavior_column(*name), None);
        }
    }

    /// Remove behavior columns by their reserved names
    pub(crate) fn remove_columns(&mut self, names: &[&str]) {
        self.attributes.retain(|a| !names.contains(&a.name.as_str()));
    }
}

/// Derive a table id: lower-cased, whitespace runs replaced by `_`
pub fn table_id_from_name(name: &str) -> String {
    let mut id = String::with_capacity(name.len());
    let mut in_space = false;
    for c in name.chars() {
        if c.is_whitespace() {
            if !in_space {
                id.push('_');
            }
            in_space = true;
        } else {
            id.extend(c.to_lowercase());
            in_space = false;
        }
    }
    id
}

// ============================================================================
// TableSpec
// ============================================================================

/// Input to `add_node`
#[derive(Debug, Clone, PartialEq)]
pub struct TableSpec {
    pub name: String,
    pub description: String,
    pub position: Position,
    pub with_timestamps: bool,
    pub with_blameable: bool,
    pub hide_id_in_command: bool,
    pub is_junction: bool,
    pub junction_table1: Option<String>,
    pub junction_table2: Option<String>,
}

impl TableSpec {
    /// Create a spec for a regular table
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            position: Position::zero(),
            with_timestamps: false,
            with_blameable: false,
            hide_id_in_command: true,
            is_junction: false,
            junction_table1: None,
            junction_table2: None,
        }
    }

    /// Create a spec for a junction table between two table ids
    pub fn junction(
        name: impl Into<String>,
        table1: impl Into<String>,
        table2: impl Into<String>,
    ) -> Self {
        let mut spec = Self::new(name);
        spec.is_junction = true;
        spec.junction_table1 = Some(table1.into());
        spec.junction_table2 = Some(table2.into());
        spec
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Position::new(x, y);
        self
    }

    pub fn with_timestamps(mut self) -> Self {
        self.with_timestamps = true;
        self
    }

    pub fn with_blameable(mut self) -> Self {
        self.with_blameable = true;
        self
    }

    pub fn show_id_in_command(mut self) -> Self {
        self.hide_id_in_command = false;
        self
    }

    /// The table this spec creates, before any seeded attributes
    pub(crate) fn into_table(self) -> Table {
        let mut table = Table::new(self.name);
        table.description = self.description;
        table.position = self.position;
        table.with_timestamps = self.with_timestamps;
        table.with_blameable = self.with_blameable;
        table.hide_id_in_command = self.hide_id_in_command;
        table.is_junction = self.is_junction;
        table.junction_table1 = self.junction_table1;
        table.junction_table2 = self.junction_table2;
        table
    }
}

// ============================================================================
// TablePatch
// ============================================================================

/// Partial update of a table's scalar fields. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TablePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub with_timestamps: Option<bool>,
    pub with_blameable: Option<bool>,
    pub hide_id_in_command: Option<bool>,
    pub is_junction: Option<bool>,
    pub junction_table1: Option<Option<String>>,
    pub junction_table2: Option<Option<String>>,
}

impl TablePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn timestamps(mut self, enabled: bool) -> Self {
        self.with_timestamps = Some(enabled);
        self
    }

    pub fn blameable(mut self, enabled: bool) -> Self {
        self.with_blameable = Some(enabled);
        self
    }

    pub fn hide_id(mut self, hide: bool) -> Self {
        self.hide_id_in_command = Some(hide);
        self
    }

    /// Merge the patch into `table`, adding or removing behavior columns
    /// when a behavior flag flips.
    pub(crate) fn apply_to(&self, table: &mut Table) {
        if let Some(name) = &self.name {
            table.name = name.clone();
        }
        if let Some(description) = &self.description {
            table.description = description.clone();
        }
        if let Some(hide) = self.hide_id_in_command {
            table.hide_id_in_command = hide;
        }
        if let Some(is_junction) = self.is_junction {
            table.is_junction = is_junction;
        }
        if let Some(partner) = &self.junction_table1 {
            table.junction_table1 = partner.clone();
        }
        if let Some(partner) = &self.junction_table2 {
            table.junction_table2 = partner.clone();
        }
        if let Some(enabled) = self.with_timestamps {
            toggle_behavior(table, enabled, &TIMESTAMP_COLUMNS, |t| &mut t.with_timestamps);
        }
        if let Some(enabled) = self.with_blameable {
            toggle_behavior(table, enabled, &BLAMEABLE_COLUMNS, |t| &mut t.with_blameable);
        }
    }
}

fn toggle_behavior(
    table: &mut Table,
    enabled: bool,
    columns: &[&str],
    flag: impl Fn(&mut Table) -> &mut bool,
) {
    let was_enabled = *flag(table);
    if enabled && !was_enabled {
        table.ensure_columns(columns);
    } else if !enabled && was_enabled {
        table.remove_columns(columns);
    }
    *flag(table) = enabled;
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn names(table: &Table) -> Vec<&str> {
        table.attributes.iter().map(|a| a.name.as_str()).collect()
    }

    #[test]
    fn test_table_id_from_name() {
        assert_eq!(table_id_from_name("Users"), "users");
        assert_eq!(table_id_from_name("Blog Post"), "blog_post");
        assert_eq!(table_id_from_name("Order   Line Items"), "order_line_items");
        assert_eq!(table_id_from_name("already_snake"), "already_snake");
    }

    #[test]
    fn test_push_attribute_assigns_id_and_sort() {
        let mut table = Table::new("Users");
        assert!(table.push_attribute(Attribute::primary_key_id(), None));
        assert!(table.push_attribute(
            Attribute::new("email", crate::AttributeKind::string(Some(255))),
            None
        ));
        assert_eq!(table.attributes[0].id, "users-id");
        assert_eq!(table.attributes[0].sort, 0);
        assert_eq!(table.attributes[1].id, "users-email");
        assert_eq!(table.attributes[1].sort, 1);

        assert!(!table.push_attribute(Attribute::primary_key_id(), None));
        assert_eq!(table.attributes.len(), 2);
    }

    #[test]
    fn test_push_attribute_explicit_sort() {
        let mut table = Table::new("users");
        table.push_attribute(Attribute::primary_key_id(), Some(7));
        table.push_attribute(Attribute::behavior_column("created_at"), None);
        assert_eq!(table.attributes[0].sort, 7);
        assert_eq!(table.attributes[1].sort, 8);
    }

    #[test]
    fn test_timestamp_toggle_is_idempotent() {
        let mut table = Table::new("posts");
        table.push_attribute(Attribute::behavior_column("created_at"), None);

        TablePatch::new().timestamps(true).apply_to(&mut table);
        assert!(table.with_timestamps);
        assert_eq!(names(&table), vec!["created_at", "updated_at"]);

        // Already enabled: nothing appended
        TablePatch::new().timestamps(true).apply_to(&mut table);
        assert_eq!(table.attributes.len(), 2);

        TablePatch::new().timestamps(false).apply_to(&mut table);
        assert!(!table.with_timestamps);
        assert!(table.attributes.is_empty());
    }

    #[test]
    fn test_blameable_toggle_keeps_other_columns() {
        let mut table = Table::new("posts");
        table.push_attribute(Attribute::primary_key_id(), None);
        TablePatch::new().blameable(true).apply_to(&mut table);
        assert_eq!(names(&table), vec!["id", "created_by", "updated_by"]);
        assert_eq!(table.attributes[2].sort, 2);

        TablePatch::new().blameable(false).apply_to(&mut table);
        assert_eq!(names(&table), vec!["id"]);
    }

    #[test]
    fn test_table_decodes_with_defaults() {
        let table: Table = serde_json::from_value(json!({
            "id": "users",
            "name": "users",
            "attributes": []
        }))
        .unwrap();
        assert!(table.hide_id_in_command);
        assert!(!table.is_junction);
        assert_eq!(table.position, Position::zero());
        assert_eq!(table.description, "");
    }
}
