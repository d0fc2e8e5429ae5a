//! Import and export of diagrams
//!
//! The only wire format is `{ "name": string, "nodes": Table[], "edges": Edge[] }`.
//! Imports are checked for that outline before anything is decoded; a payload
//! that fails the check never reaches the store.

use crate::schema::Schema;
use schemaforge_core::{EngineError, EngineResult, ResultExt};
use serde_json::Value;
use std::path::Path;

/// File extension for exported diagrams
pub const DIAGRAM_EXTENSION: &str = "json";

const INVALID_STRUCTURE: &str =
    "Invalid diagram structure. Expected { name, nodes, edges } with a non-empty name";

// ============================================================================
// Load Functions
// ============================================================================

/// Check the `{ name, nodes, edges }` outline of a raw payload
pub fn check_diagram_outline(raw: &Value) -> EngineResult<()> {
    let name_ok = raw
        .get("name")
        .and_then(Value::as_str)
        .is_some_and(|name| !name.is_empty());
    let nodes_ok = raw.get("nodes").is_some_and(Value::is_array);
    let edges_ok = raw.get("edges").is_some_and(Value::is_array);

    if name_ok && nodes_ok && edges_ok {
        Ok(())
    } else {
        Err(EngineError::validation(INVALID_STRUCTURE))
    }
}

/// Decode a diagram from an already parsed JSON value.
///
/// Edges are re-derived from the decoded attributes, so a hand-edited file
/// with stale edges still satisfies the edge invariant once loaded.
pub fn load_diagram_value(raw: Value) -> EngineResult<Schema> {
    check_diagram_outline(&raw)?;
    let mut schema: Schema = serde_json::from_value(raw)
        .map_err(|e| EngineError::InvalidDiagramFormat(e.to_string()))?;
    schema.sync_edges();
    Ok(schema)
}

/// Decode a diagram from JSON text
pub fn load_diagram_from_str(json: &str) -> EngineResult<Schema> {
    let raw: Value = serde_json::from_str(json)
        .map_err(|e| EngineError::InvalidDiagramFormat(format!("Invalid JSON: {}", e)))?;
    load_diagram_value(raw)
}

/// Load a diagram from a file
pub fn load_diagram(path: impl AsRef<Path>) -> EngineResult<Schema> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(EngineError::DiagramNotFound(path.to_path_buf()));
    }
    let json = std::fs::read_to_string(path)
        .with_context(format!("Failed to read diagram {}", path.display()))?;
    load_diagram_from_str(&json)
}

/// Schema to start from given whatever the persistence port returned.
///
/// Missing or corrupt data yields the default empty diagram.
pub fn restore_schema(stored: Option<&str>) -> Schema {
    let Some(json) = stored else {
        return Schema::default();
    };
    match load_diagram_from_str(json) {
        Ok(schema) => schema,
        Err(e) => {
            tracing::warn!(error = %e, "stored diagram is unreadable, starting from an empty one");
            Schema::default()
        }
    }
}

// ============================================================================
// Save Functions
// ============================================================================

/// Export a diagram as pretty printed JSON
pub fn export_diagram(schema: &Schema) -> EngineResult<String> {
    Ok(serde_json::to_string_pretty(schema)?)
}

/// Export a diagram as compact JSON (what the persistence port stores)
pub fn export_diagram_compact(schema: &Schema) -> EngineResult<String> {
    Ok(serde_json::to_string(schema)?)
}

/// Save a diagram to a file, creating parent directories as needed
pub fn save_diagram(schema: &Schema, path: impl AsRef<Path>) -> EngineResult<()> {
    let path = path.as_ref();
    let json = export_diagram(schema)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)
                .with_context(format!("Failed to create directory {}", parent.display()))?;
        }
    }
    std::fs::write(path, json)
        .with_context(format!("Failed to write diagram {}", path.display()))
}

// ============================================================================
// Utility Functions
// ============================================================================

/// Download file name for a diagram: lower-cased, whitespace runs as `-`
pub fn default_file_name(diagram_name: &str) -> String {
    let slug = diagram_name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase();
    format!("{}.{}", slug, DIAGRAM_EXTENSION)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Attribute, AttributeKind, TableSpec};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::TempDir;

    fn sample() -> Schema {
        let mut schema = Schema::new("Blog");
        schema
            .add_node(TableSpec::new("users").at(10.0, 20.0).with_timestamps())
            .unwrap();
        schema.add_node(TableSpec::new("posts")).unwrap();
        schema
            .add_attribute(
                "posts",
                Attribute::new("price", AttributeKind::decimal(Some(10), Some(2)))
                    .with_default("9.99")
                    .into(),
            )
            .unwrap();
        schema
            .add_attribute(
                "posts",
                Attribute::new("user_id", AttributeKind::integer())
                    .references("users")
                    .into(),
            )
            .unwrap();
        schema
    }

    #[test]
    fn test_outline_check() {
        assert!(check_diagram_outline(&json!({"name": "x", "nodes": [], "edges": []})).is_ok());

        let bad = [
            json!({"nodes": [], "edges": []}),
            json!({"name": "", "nodes": [], "edges": []}),
            json!({"name": 3, "nodes": [], "edges": []}),
            json!({"name": "x", "nodes": {}, "edges": []}),
            json!({"name": "x", "nodes": []}),
            json!([1, 2, 3]),
        ];
        for raw in bad {
            let err = check_diagram_outline(&raw).unwrap_err();
            assert!(matches!(err, EngineError::Validation(_)), "{raw}");
        }
    }

    #[test]
    fn test_round_trip() {
        let schema = sample();
        let json = export_diagram(&schema).unwrap();
        assert_eq!(load_diagram_from_str(&json).unwrap(), schema);

        let compact = export_diagram_compact(&schema).unwrap();
        assert!(!compact.contains('\n'));
        assert_eq!(load_diagram_from_str(&compact).unwrap(), schema);
    }

    #[test]
    fn test_wire_shape_uses_nodes() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["name"], "Blog");
        assert_eq!(value["nodes"].as_array().unwrap().len(), 2);
        assert_eq!(value["edges"][0]["sourceHandle"], "posts-user_id");
        assert_eq!(value["nodes"][0]["withTimestamps"], true);
        assert!(value.get("tables").is_none());
    }

    #[test]
    fn test_load_rejects_undecodable_contents() {
        let err = load_diagram_value(json!({
            "name": "x",
            "nodes": [{"attributes": "nope"}],
            "edges": []
        }))
        .unwrap_err();
        assert!(matches!(err, EngineError::InvalidDiagramFormat(_)));

        let err = load_diagram_from_str("{not json").unwrap_err();
        assert!(matches!(err, EngineError::InvalidDiagramFormat(_)));
    }

    #[test]
    fn test_load_rederives_stale_edges() {
        let schema = load_diagram_value(json!({
            "name": "Imported",
            "nodes": [
                {"id": "users", "name": "users", "attributes": [
                    {"id": "users-id", "name": "id", "type": "integer", "isPrimaryKey": true}
                ]},
                {"id": "posts", "name": "posts", "attributes": [
                    {"id": "posts-user_id", "name": "user_id", "type": "integer",
                     "isForeignKey": true, "referencesTable": "users", "sort": 1}
                ]}
            ],
            "edges": [
                {"id": "edge-ghost", "source": "ghost", "target": "users"}
            ]
        }))
        .unwrap();
        assert_eq!(schema.edges.len(), 1);
        assert_eq!(schema.edges[0].source_handle, "posts-user_id");
        assert_eq!(schema.edges[0].target_handle, "users-id");
    }

    #[test]
    fn test_restore_schema_falls_back() {
        assert_eq!(restore_schema(None), Schema::default());
        assert_eq!(restore_schema(Some("garbage")), Schema::default());
        assert_eq!(restore_schema(Some(r#"{"name": ""}"#)), Schema::default());

        let json = export_diagram_compact(&sample()).unwrap();
        assert_eq!(restore_schema(Some(&json)), sample());
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("blog.json");
        save_diagram(&sample(), &path).unwrap();
        assert_eq!(load_diagram(&path).unwrap(), sample());

        let missing = dir.path().join("missing.json");
        assert!(matches!(
            load_diagram(&missing).unwrap_err(),
            EngineError::DiagramNotFound(_)
        ));
    }

    #[test]
    fn test_save_failure_names_the_path() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();

        let path = blocker.join("blog.json");
        let err = save_diagram(&sample(), &path).unwrap_err();
        assert!(matches!(err, EngineError::WithContext { .. }));
        assert!(err.to_string().starts_with("Failed to write diagram"));
        assert!(err.to_string().contains("blog.json"));
    }

    #[test]
    fn test_default_file_name() {
        assert_eq!(default_file_name("Untitled Diagram"), "untitled-diagram.json");
        assert_eq!(default_file_name("My   Shop  DB"), "my-shop-db.json");
        assert_eq!(default_file_name("blog"), "blog.json");
    }
}
