//! table add|update|remove|move

use super::{Store, require_table};
use crate::args::TableAction;
use crate::output;
use schemaforge_ir::{Position, TablePatch, TableSpec};
use std::io::Write;

pub fn run(store: &mut Store, action: TableAction, out: &mut dyn Write) -> anyhow::Result<()> {
    match action {
        TableAction::Add {
            name,
            description,
            timestamps,
            blameable,
            show_id,
            junction,
            x,
            y,
        } => {
            let mut spec = match junction.as_deref() {
                Some([first, second]) => TableSpec::junction(&name, first, second),
                _ => TableSpec::new(&name),
            };
            spec = spec.at(x, y);
            if let Some(description) = description {
                spec = spec.with_description(description);
            }
            if timestamps {
                spec = spec.with_timestamps();
            }
            if blameable {
                spec = spec.with_blameable();
            }
            if show_id {
                spec = spec.show_id_in_command();
            }

            let id = store.add_node(spec)?;
            let attributes = store.schema().table(&id).map_or(0, |t| t.attributes.len());
            output::success(
                out,
                format!("Added table '{}' with {} attributes", id, attributes),
            )?;
        }
        TableAction::Update {
            id,
            name,
            description,
            timestamps,
            blameable,
            hide_id,
        } => {
            require_table(store, &id)?;
            let patch = TablePatch {
                name,
                description,
                with_timestamps: timestamps,
                with_blameable: blameable,
                hide_id_in_command: hide_id,
                ..TablePatch::default()
            };
            store.update_node(&id, patch)?;
            output::success(out, format!("Updated table '{}'", id))?;
        }
        TableAction::Remove { id } => {
            require_table(store, &id)?;
            store.delete_node(&id)?;
            output::success(out, format!("Removed table '{}'", id))?;
        }
        TableAction::Move { id, x, y } => {
            require_table(store, &id)?;
            store.update_node_position(&id, Position::new(x, y))?;
            output::success(out, format!("Moved table '{}' to ({}, {})", id, x, y))?;
        }
    }
    Ok(())
}
