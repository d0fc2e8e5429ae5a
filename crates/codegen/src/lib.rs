//! # Schemaforge Codegen
//!
//! Compiles tables of a diagram into Yii migration generator commands.
//!
//! ## Features
//!
//! - **Field compilation**: one `name:type(params):modifier...` definition per
//!   attribute, in `sort` order
//! - **Regular tables**: `create_{table}_table`, optionally hiding the `id` key
//! - **Junction tables**: `create_junction_table_for_{a}_and_{b}_tables`
//!   without the key columns
//!

// ============================================================================
// Modules
// ============================================================================

pub mod fields;
pub mod migrations;

// ============================================================================
// Re-exports
// ============================================================================

pub use fields::{compile_field, compile_fields};
pub use migrations::{
    CompiledCommand, MIGRATE_CREATE, compile_migration_command, compile_schema_commands,
    compile_table_command, options_for_table,
};

// ============================================================================
// CommandOptions
// ============================================================================

/// Options for compiling a migration command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOptions {
    /// Leave the primary key named `id` out of the field list
    pub hide_id: bool,

    /// Compile as a junction table
    pub is_junction: bool,

    /// Name of the first junction partner
    pub junction_table1: String,

    /// Name of the second junction partner
    pub junction_table2: String,
}

impl Default for CommandOptions {
    fn default() -> Self {
        Self {
            hide_id: true,
            is_junction: false,
            junction_table1: String::new(),
            junction_table2: String::new(),
        }
    }
}

impl CommandOptions {
    /// Create options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether the `id` key is hidden
    pub fn with_hide_id(mut self, hide_id: bool) -> Self {
        self.hide_id = hide_id;
        self
    }

    /// Keep the `id` key in the field list
    pub fn show_id(self) -> Self {
        self.with_hide_id(false)
    }

    /// Compile as a junction table between two named tables
    pub fn junction(mut self, table1: impl Into<String>, table2: impl Into<String>) -> Self {
        self.is_junction = true;
        self.junction_table1 = table1.into();
        self.junction_table2 = table2.into();
        self
    }

    /// Both partner names when the junction form applies
    pub fn junction_tables(&self) -> Option<(&str, &str)> {
        let complete = self.is_junction
            && !self.junction_table1.is_empty()
            && !self.junction_table2.is_empty();
        complete.then_some((self.junction_table1.as_str(), self.junction_table2.as_str()))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_options_default() {
        let options = CommandOptions::default();
        assert!(options.hide_id);
        assert!(!options.is_junction);
        assert_eq!(options.junction_tables(), None);
    }

    #[test]
    fn test_command_options_builder() {
        let options = CommandOptions::new().show_id().junction("posts", "tags");
        assert!(!options.hide_id);
        assert_eq!(options.junction_tables(), Some(("posts", "tags")));

        let half = CommandOptions::new().junction("posts", "");
        assert!(half.is_junction);
        assert_eq!(half.junction_tables(), None);
    }
}
