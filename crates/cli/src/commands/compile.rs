//! compile and validate

use super::Store;
use crate::CliError;
use crate::output;
use schemaforge_codegen::{compile_migration_command, options_for_table};
use schemaforge_core::EngineError;
use schemaforge_ir::Validator;
use std::io::Write;

pub fn compile(
    store: &Store,
    table_id: Option<&str>,
    show_id: bool,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let schema = store.schema();
    let tables: Vec<_> = match table_id {
        Some(id) => vec![
            schema
                .table(id)
                .ok_or_else(|| EngineError::TableNotFound(id.to_string()))?,
        ],
        None => schema.tables.iter().collect(),
    };

    for table in tables {
        let mut options = options_for_table(schema, table);
        if show_id {
            options = options.show_id();
        }
        writeln!(
            out,
            "{}",
            compile_migration_command(&table.name, &table.attributes, &options)
        )?;
    }
    Ok(())
}

pub fn validate(store: &Store, out: &mut dyn Write) -> anyhow::Result<()> {
    let result = Validator::with_default_rules().validate(store.schema());

    for error in &result.errors {
        output::error(out, error.to_string())?;
    }
    for warning in &result.warnings {
        output::warning(out, warning.to_string())?;
    }
    if result.valid {
        output::success(
            out,
            format!("Diagram is valid ({} warnings)", result.warnings.len()),
        )?;
        Ok(())
    } else {
        Err(CliError::ValidationFailed {
            errors: result.errors.len(),
        }
        .into())
    }
}
