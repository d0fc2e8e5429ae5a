//! attr add|update|remove|move

use super::{Store, require_attribute, require_table};
use crate::args::{AttrAction, TypeArgs};
use crate::output;
use schemaforge_ir::{Attribute, AttributeKind, AttributePatch, AttributeSpec, DefaultValue};
use std::io::Write;

pub fn run(store: &mut Store, action: AttrAction, out: &mut dyn Write) -> anyhow::Result<()> {
    match action {
        AttrAction::Add {
            table,
            name,
            kind,
            not_null,
            unique,
            primary_key,
            unsigned,
            references,
            references_field,
            default,
            sort,
        } => {
            require_table(store, &table)?;
            let mut attribute = Attribute::new(name, build_kind(&kind, None));
            attribute.is_not_null = not_null;
            attribute.is_unique = unique;
            attribute.is_primary_key = primary_key;
            attribute.is_unsigned = unsigned;
            if let Some(target) = references {
                attribute = attribute.references(target);
            }
            attribute.references_field = references_field;
            attribute.default_value = default.as_deref().map(parse_default);

            let mut spec = AttributeSpec::from(attribute);
            if let Some(sort) = sort {
                spec = spec.at(sort);
            }
            if let Some(id) = store.add_attribute(&table, spec)? {
                output::success(out, format!("Added attribute '{}'", id))?;
            }
        }
        AttrAction::Update {
            table,
            id,
            name,
            kind,
            not_null,
            unique,
            primary_key,
            unsigned,
            references,
            no_references,
            default,
            no_default,
        } => {
            let current = require_attribute(store, &table, &id)?;
            let mut patch = AttributePatch {
                name,
                is_not_null: not_null,
                is_unique: unique,
                is_primary_key: primary_key,
                is_unsigned: unsigned,
                ..AttributePatch::default()
            };
            if !kind.is_empty() {
                patch.kind = Some(build_kind(&kind, Some(&current.kind)));
            }
            if let Some(target) = references {
                patch = patch
                    .foreign_key(true)
                    .references_table(Some(target));
            } else if no_references {
                patch = patch.foreign_key(false).references_table(None);
            }
            if let Some(value) = default {
                patch = patch.default_value(Some(parse_default(&value)));
            } else if no_default {
                patch = patch.default_value(None);
            }

            store.update_attribute(&table, &id, patch)?;
            output::success(out, format!("Updated attribute '{}'", id))?;
        }
        AttrAction::Remove { table, id } => {
            require_attribute(store, &table, &id)?;
            store.delete_attribute(&table, &id)?;
            output::success(out, format!("Removed attribute '{}'", id))?;
        }
        AttrAction::Move {
            table,
            id,
            direction,
        } => {
            require_attribute(store, &table, &id)?;
            if store.reorder_attribute(&table, &id, direction.into())? {
                output::success(out, format!("Moved attribute '{}'", id))?;
            } else {
                output::warning(out, format!("Attribute '{}' is already at the edge", id))?;
            }
        }
    }
    Ok(())
}

/// Build a kind from the type arguments, filling gaps from `current`
fn build_kind(args: &TypeArgs, current: Option<&AttributeKind>) -> AttributeKind {
    let token = args
        .type_token
        .as_deref()
        .or(current.map(|k| k.type_token()))
        .unwrap_or("string");
    AttributeKind::from_parts(
        token,
        args.length.or(current.and_then(|k| k.length())),
        args.precision.or(current.and_then(|k| k.precision())),
        args.scale.or(current.and_then(|k| k.scale())),
    )
}

/// Numbers become numeric defaults, anything else stays text
fn parse_default(raw: &str) -> DefaultValue {
    if let Ok(i) = raw.parse::<i64>() {
        return DefaultValue::from(i);
    }
    raw.parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
        .map_or_else(|| DefaultValue::from(raw), DefaultValue::Number)
}
