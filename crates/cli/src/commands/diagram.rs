//! Diagram-level commands: new, import, export, info, types, rename

use super::Store;
use crate::output;
use anyhow::Context;
use colored::Colorize;
use schemaforge_core::ParamCategory;
use schemaforge_ir::serialization::{export_diagram_compact, save_diagram};
use std::io::Write;
use std::path::Path;

pub fn new(store: &mut Store, name: &str, out: &mut dyn Write) -> anyhow::Result<()> {
    store.reset(name);
    output::success(out, format!("Created diagram '{}'", name))?;
    Ok(())
}

pub fn import(store: &mut Store, file: &Path, out: &mut dyn Write) -> anyhow::Result<()> {
    let json = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    store.load_diagram_str(&json)?;

    let stats = store.schema().stats();
    output::success(
        out,
        format!(
            "Imported '{}' ({} tables, {} attributes, {} relationships)",
            store.schema().name,
            stats.tables,
            stats.attributes,
            stats.relationships
        ),
    )?;
    Ok(())
}

pub fn export(
    store: &Store,
    target: Option<&Path>,
    compact: bool,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let Some(target) = target else {
        let json = if compact {
            export_diagram_compact(store.schema())?
        } else {
            store.export_json()?
        };
        writeln!(out, "{}", json)?;
        return Ok(());
    };

    let path = if target.is_dir() {
        target.join(store.export_file_name())
    } else {
        target.to_path_buf()
    };
    if compact {
        std::fs::write(&path, export_diagram_compact(store.schema())?)
            .with_context(|| format!("failed to write {}", path.display()))?;
    } else {
        save_diagram(store.schema(), &path)?;
    }
    output::success(out, format!("Exported to {}", path.display()))?;
    Ok(())
}

pub fn info(store: &Store, out: &mut dyn Write) -> anyhow::Result<()> {
    let schema = store.schema();
    let stats = schema.stats();

    output::heading(out, &schema.name)?;
    output::field(out, "Tables", stats.tables)?;
    output::field(out, "Attributes", stats.attributes)?;
    output::field(out, "Relationships", stats.relationships)?;

    for table in &schema.tables {
        let mut flags = Vec::new();
        if table.is_junction {
            flags.push(format!(
                "junction {} + {}",
                table.junction_table1.as_deref().unwrap_or("?"),
                table.junction_table2.as_deref().unwrap_or("?")
            ));
        }
        if table.with_timestamps {
            flags.push("timestamps".to_string());
        }
        if table.with_blameable {
            flags.push("blameable".to_string());
        }
        let flags = if flags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", flags.join(", "))
        };

        writeln!(out)?;
        writeln!(out, "{} {}{}", table.id.cyan().bold(), table.name.dimmed(), flags)?;
        for attribute in table.sorted_attributes() {
            let marker = if attribute.is_primary_key {
                "PK"
            } else if attribute.is_foreign_key {
                "FK"
            } else {
                "  "
            };
            writeln!(out, "  {} {}: {}", marker, attribute.name, attribute.type_token())?;
        }
    }

    if !schema.edges.is_empty() {
        writeln!(out)?;
        output::heading(out, "Relationships")?;
        for edge in &schema.edges {
            writeln!(
                out,
                "  {} -> {} ({})",
                edge.source_handle,
                edge.target_handle,
                edge.label.as_deref().unwrap_or("")
            )?;
        }
    }
    Ok(())
}

pub fn types(out: &mut dyn Write) -> anyhow::Result<()> {
    for category in ParamCategory::all() {
        output::field(out, category.display_name(), category.tokens().join(", "))?;
    }
    Ok(())
}

pub fn rename(store: &mut Store, name: &str, out: &mut dyn Write) -> anyhow::Result<()> {
    store.set_name(name)?;
    output::success(out, format!("Renamed diagram to '{}'", name))?;
    Ok(())
}
