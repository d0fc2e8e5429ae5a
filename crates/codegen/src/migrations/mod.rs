//! # Migration Commands
//!
//! Builds the `php yii migrate/create ...` invocation that scaffolds a
//! table's migration.
//!
//! ## Command Shapes
//!
//! ```text
//! php yii migrate/create create_{table}_table --fields="{fields}"
//! php yii migrate/create create_junction_table_for_{table1}_and_{table2}_tables [--fields="{fields}"]
//! ```
//!
//! Regular tables always carry the `--fields` clause, even when empty.
//! Junction tables leave out their key columns (the generator adds those
//! itself) and only carry the clause when something is left.

use crate::CommandOptions;
use crate::fields::join_sorted;
use schemaforge_core::{EngineError, EngineResult};
use schemaforge_ir::{Attribute, Schema, Table};

/// Command prefix of the Yii migration generator
pub const MIGRATE_CREATE: &str = "php yii migrate/create";

/// Compile the migration command for a table given its name and attributes
pub fn compile_migration_command(
    table_name: &str,
    attributes: &[Attribute],
    options: &CommandOptions,
) -> String {
    if let Some((table1, table2)) = options.junction_tables() {
        let fields = join_sorted(
            attributes
                .iter()
                .filter(|a| !a.is_primary_key && !a.is_foreign_key)
                .collect(),
        );
        let mut command = format!(
            "{} create_junction_table_for_{}_and_{}_tables",
            MIGRATE_CREATE,
            table1.to_lowercase(),
            table2.to_lowercase()
        );
        if !fields.is_empty() {
            command.push_str(&format!(" --fields=\"{}\"", fields));
        }
        return command;
    }

    let fields = join_sorted(
        attributes
            .iter()
            .filter(|a| !(options.hide_id && a.is_primary_key && a.name == "id"))
            .collect(),
    );
    format!(
        "{} create_{}_table --fields=\"{}\"",
        MIGRATE_CREATE,
        table_name.to_lowercase(),
        fields
    )
}

/// Options the command dialog derives from a stored table
pub fn options_for_table(schema: &Schema, table: &Table) -> CommandOptions {
    let partner_name = |id: Option<&str>| {
        id.and_then(|id| schema.table(id))
            .map(|t| t.name.clone())
            .unwrap_or_default()
    };
    CommandOptions {
        hide_id: table.hide_id_in_command,
        is_junction: table.is_junction,
        junction_table1: partner_name(table.junction_table1.as_deref()),
        junction_table2: partner_name(table.junction_table2.as_deref()),
    }
}

/// Compile the command for one table of a diagram
pub fn compile_table_command(schema: &Schema, table_id: &str) -> EngineResult<String> {
    let table = schema
        .table(table_id)
        .ok_or_else(|| EngineError::TableNotFound(table_id.to_string()))?;
    let options = options_for_table(schema, table);
    tracing::debug!(
        table = %table.id,
        junction = options.junction_tables().is_some(),
        hide_id = options.hide_id,
        "compiling migration command"
    );
    Ok(compile_migration_command(
        &table.name,
        &table.attributes,
        &options,
    ))
}

/// A compiled command together with the table it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledCommand {
    pub table_id: String,
    pub table_name: String,
    pub command: String,
}

/// Compile every table of a diagram, in diagram order
pub fn compile_schema_commands(schema: &Schema) -> Vec<CompiledCommand> {
    schema
        .tables
        .iter()
        .map(|table| CompiledCommand {
            table_id: table.id.clone(),
            table_name: table.name.clone(),
            command: compile_migration_command(
                &table.name,
                &table.attributes,
                &options_for_table(schema, table),
            ),
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
