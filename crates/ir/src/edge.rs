//! Derived relationship edges
//!
//! An `Edge` is never created directly: it exists exactly when a foreign-key
//! attribute resolves to a table. [`derive_edge`] computes that edge.

use crate::attribute::Attribute;
use crate::table::Table;
use serde::{Deserialize, Serialize};

/// A foreign key drawn from a source attribute to the target table's key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    /// `edge-{tableId}-{referencedTableId}`
    pub id: String,

    /// Source table id
    pub source: String,

    /// Target table id
    pub target: String,

    /// Id of the foreign-key attribute
    #[serde(default)]
    pub source_handle: String,

    /// Id of the referenced attribute
    #[serde(default)]
    pub target_handle: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Edge {
    /// Deterministic edge id for a source/target table pair
    pub fn id_for(source_table_id: &str, target_table_id: &str) -> String {
        format!("edge-{}-{}", source_table_id, target_table_id)
    }

    /// Whether either end of the edge is `table_id`
    pub fn touches_table(&self, table_id: &str) -> bool {
        self.source == table_id || self.target == table_id
    }

    /// Whether either handle of the edge is `attribute_id`
    pub fn touches_attribute(&self, attribute_id: &str) -> bool {
        self.source_handle == attribute_id || self.target_handle == attribute_id
    }
}

/// Compute the edge a foreign-key attribute of `source_table_id` requires.
///
/// Returns `None` when the attribute is not a foreign key or its target table
/// does not exist. The target handle is the referenced table's primary key,
/// falling back to its first attribute by insertion order.
pub fn derive_edge(
    source_table_id: &str,
    attribute: &Attribute,
    tables: &[Table],
) -> Option<Edge> {
    if !attribute.is_foreign_key {
        return None;
    }
    let references = attribute.references_table.as_deref()?;
    let Some(target) = tables.iter().find(|t| t.id == references) else {
        tracing::debug!(
            attribute = %attribute.id,
            references,
            "foreign key target table not found, no edge"
        );
        return None;
    };
    // TODO: fail closed instead of linking an arbitrary column once the UI
    // can surface keyless targets.
    let Some(target_attribute) = target.primary_key().or_else(|| target.attributes.first()) else {
        tracing::debug!(
            attribute = %attribute.id,
            references,
            "foreign key target table has no attributes, no edge"
        );
        return None;
    };

    Some(Edge {
        id: Edge::id_for(source_table_id, &target.id),
        source: source_table_id.to_string(),
        target: target.id.clone(),
        source_handle: attribute.id.clone(),
        target_handle: target_attribute.id.clone(),
        label: Some(edge_label(&attribute.name)),
    })
}

/// Edge label: the attribute name without a trailing `_id`
pub fn edge_label(attribute_name: &str) -> String {
    attribute_name
        .strip_suffix("_id")
        .unwrap_or(attribute_name)
        .to_string()
}

// ============================================================================
// Tests
// ============================================================================
