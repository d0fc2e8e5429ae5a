//! Field list compilation
//!
//! Turns attributes into the `--fields` grammar of the Yii migration
//! generator:
//!
//! ```text
//! field    := name ":" type [params] (":" modifier)*
//! params   := "(" number ["," number] ")"
//! modifier := "notNull" | "unique" | "unsigned" | "defaultValue(" value ")" | "foreignKey(" table ")"
//! ```

use schemaforge_ir::{Attribute, AttributeKind, DefaultValue, sorted_by_sort};

/// Compile one attribute into a field definition.
///
/// A primary key compiles to `name:primaryKey` (integer) or
/// `name:bigPrimaryKey` (anything else) with no parameters or modifiers.
pub fn compile_field(attribute: &Attribute) -> String {
    if attribute.is_primary_key {
        let key_type = if attribute.type_token() == "integer" {
            "primaryKey"
        } else {
            "bigPrimaryKey"
        };
        return format!("{}:{}", attribute.name, key_type);
    }

    let mut field = format!(
        "{}:{}{}",
        attribute.name,
        attribute.type_token(),
        type_params(&attribute.kind)
    );
    for modifier in modifiers(attribute) {
        field.push(':');
        field.push_str(&modifier);
    }
    field
}

/// Compile attributes in `sort` order, comma separated
pub fn compile_fields(attributes: &[Attribute]) -> String {
    join_sorted(sorted_by_sort(attributes))
}

/// Compile an already filtered selection, ordering it by `sort` first
pub(crate) fn join_sorted(mut attributes: Vec<&Attribute>) -> String {
    attributes.sort_by_key(|a| a.sort);
    attributes
        .into_iter()
        .map(compile_field)
        .collect::<Vec<_>>()
        .join(",")
}

/// Parameter suffix allowed by the kind's category. Zero counts as absent,
/// and a precision/scale pair is all or nothing.
fn type_params(kind: &AttributeKind) -> String {
    let nonzero = |value: Option<u32>| value.filter(|v| *v != 0);
    match kind {
        AttributeKind::Length { length, .. } => nonzero(*length)
            .map(|l| format!("({})", l))
            .unwrap_or_default(),
        AttributeKind::Precision { precision, .. } => nonzero(*precision)
            .map(|p| format!("({})", p))
            .unwrap_or_default(),
        AttributeKind::Scaled {
            precision, scale, ..
        } => match (nonzero(*precision), nonzero(*scale)) {
            (Some(p), Some(s)) => format!("({},{})", p, s),
            _ => String::new(),
        },
        AttributeKind::Bare(_) | AttributeKind::Unrecognized(_) => String::new(),
    }
}

fn modifiers(attribute: &Attribute) -> Vec<String> {
    let mut modifiers = Vec::new();
    if attribute.is_not_null {
        modifiers.push("notNull".to_string());
    }
    if attribute.is_unique {
        modifiers.push("unique".to_string());
    }
    if attribute.is_unsigned {
        modifiers.push("unsigned".to_string());
    }
    if let Some(value) = attribute.default_value.as_ref().filter(|v| v.is_effective()) {
        modifiers.push(format!("defaultValue({})", default_literal(value)));
    }
    if attribute.has_reference() {
        if let Some(table) = &attribute.references_table {
            modifiers.push(format!("foreignKey({})", table));
        }
    }
    modifiers
}

/// Default value as written into the command: text verbatim, numbers in
/// their shortest form (`1` rather than `1.0`)
fn default_literal(value: &DefaultValue) -> String {
    match value {
        DefaultValue::Text(text) => text.clone(),
        DefaultValue::Number(number) => {
            if let Some(i) = number.as_i64() {
                i.to_string()
            } else if let Some(u) = number.as_u64() {
                u.to_string()
            } else {
                number.as_f64().map(|f| f.to_string()).unwrap_or_default()
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn attr(value: serde_json::Value) -> Attribute {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_primary_key_overrides_everything() {
        let id = attr(json!({
            "name": "id", "type": "integer", "length": 11,
            "isPrimaryKey": true, "isNotNull": true, "isUnique": true
        }));
        assert_eq!(compile_field(&id), "id:primaryKey");

        let uuid = attr(json!({
            "name": "uuid", "type": "string", "length": 36, "isPrimaryKey": true
        }));
        assert_eq!(compile_field(&uuid), "uuid:bigPrimaryKey");

        let big = attr(json!({"name": "id", "type": "bigint", "isPrimaryKey": true}));
        assert_eq!(compile_field(&big), "id:bigPrimaryKey");
    }

    #[test]
    fn test_type_params() {
        let cases = [
            (json!({"name": "a", "type": "string", "length": 100}), "a:string(100)"),
            (json!({"name": "a", "type": "string", "length": 0}), "a:string"),
            (json!({"name": "a", "type": "string"}), "a:string"),
            (json!({"name": "a", "type": "timestamp", "precision": 6}), "a:timestamp(6)"),
            (json!({"name": "a", "type": "decimal", "precision": 10, "scale": 2}), "a:decimal(10,2)"),
            (json!({"name": "a", "type": "money", "precision": 10, "scale": 0}), "a:money"),
            (json!({"name": "a", "type": "decimal", "precision": 10}), "a:decimal"),
            (json!({"name": "a", "type": "text", "length": 100}), "a:text"),
            (json!({"name": "a", "type": "float", "length": 8}), "a:float"),
            (json!({"name": "a", "type": "geometry", "length": 8}), "a:geometry"),
        ];
        for (value, expected) in cases {
            assert_eq!(compile_field(&attr(value)), expected);
        }
    }

    #[test]
    fn test_modifier_order() {
        let field = attr(json!({
            "name": "owner_id", "type": "integer",
            "isForeignKey": true, "referencesTable": "users",
            "defaultValue": 1, "isUnsigned": true, "isUnique": true, "isNotNull": true
        }));
        assert_eq!(
            compile_field(&field),
            "owner_id:integer:notNull:unique:unsigned:defaultValue(1):foreignKey(users)"
        );
    }

    #[test]
    fn test_default_value_suppression() {
        let cases = [
            (json!("active"), "status:string:defaultValue(active)"),
            (json!(""), "status:string"),
            (json!(0), "status:string"),
            (json!(0.0), "status:string"),
            (json!(null), "status:string"),
            (json!(2.5), "status:string:defaultValue(2.5)"),
            (json!(-3), "status:string:defaultValue(-3)"),
        ];
        for (default, expected) in cases {
            let field = attr(json!({"name": "status", "type": "string", "defaultValue": default}));
            assert_eq!(compile_field(&field), expected);
        }
    }

    #[test]
    fn test_foreign_key_needs_target() {
        let field = attr(json!({"name": "user_id", "type": "integer", "isForeignKey": true}));
        assert_eq!(compile_field(&field), "user_id:integer");

        let field = attr(json!({
            "name": "user_id", "type": "integer",
            "isForeignKey": false, "referencesTable": "users"
        }));
        assert_eq!(compile_field(&field), "user_id:integer");
    }

    #[test]
    fn test_compile_fields_follows_sort() {
        let attributes = vec![
            attr(json!({"name": "c", "type": "text", "sort": 2})),
            attr(json!({"name": "a", "type": "text", "sort": 0})),
            attr(json!({"name": "b", "type": "text", "sort": 1})),
        ];
        assert_eq!(compile_fields(&attributes), "a:text,b:text,c:text");

        let mut reversed = attributes.clone();
        reversed.reverse();
        assert_eq!(compile_fields(&reversed), compile_fields(&attributes));
    }

    #[test]
    fn test_compile_fields_ties_keep_order() {
        let attributes = vec![
            attr(json!({"name": "x", "type": "text", "sort": 1})),
            attr(json!({"name": "y", "type": "text", "sort": 1})),
        ];
        assert_eq!(compile_fields(&attributes), "x:text,y:text");
        assert_eq!(compile_fields(&[]), "");
    }
}
