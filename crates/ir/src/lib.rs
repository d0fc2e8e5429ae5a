//! # Schemaforge IR
//!
//! The schema graph behind a diagram: tables, their attributes, and the
//! edges derived from foreign keys, together with the store that owns the
//! authoritative snapshot.
//!
//! ## Core Concepts
//!
//! - **Table**: a modeled relational table (a diagram node)
//! - **Attribute**: a column with a type, its parameters and constraint flags
//! - **Edge**: one resolved foreign key, derived and never edited directly
//! - **Schema**: the whole diagram, the only value persisted or exported
//! - **SchemaStore**: versioned owner of the current `Schema` snapshot
//!

// Module declarations
pub mod attribute;
pub mod edge;
pub mod ordering;
pub mod schema;
pub mod serialization;
pub mod storage;
pub mod store;
pub mod table;
pub mod validation;

// Re-export commonly used types at crate root
pub use attribute::{Attribute, AttributeKind, AttributePatch, AttributeSpec, DefaultValue};
pub use edge::{Edge, derive_edge, edge_label};
pub use ordering::{Direction, next_sort, sorted_by_sort};
pub use schema::{DEFAULT_DIAGRAM_NAME, Schema, SchemaStats};
pub use serialization::{
    default_file_name, export_diagram, export_diagram_compact, load_diagram, load_diagram_from_str,
    load_diagram_value, save_diagram,
};
pub use storage::{FileStorage, MemoryStorage};
pub use store::{DEFAULT_STORAGE_KEY, SchemaCommand, SchemaStore, StoreConfig, reduce};
pub use table::{Table, TablePatch, TableSpec, table_id_from_name};
pub use validation::{ValidationResult, ValidationRule, Validator};

// Re-export core types that are commonly used with IR
pub use schemaforge_core::{EngineError, EngineResult, ParamCategory, Position, StoragePort};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Prelude Module
// ============================================================================

/// Convenient re-exports for common usage
pub mod prelude {
    pub use crate::{
        Attribute, AttributeKind, AttributePatch, AttributeSpec, DefaultValue, Direction, Edge,
        EngineError, EngineResult, Position, Schema, SchemaCommand, SchemaStore, StoragePort,
        Table, TablePatch, TableSpec,
    };
}
