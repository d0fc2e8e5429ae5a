//! Validation rules and utilities for diagrams
//!
//! The store never rejects a name or a dangling reference while the user is
//! editing. These rules report such problems on demand, as errors (the
//! diagram cannot produce sensible migrations) or warnings (it can, but
//! something is probably missing).

use crate::schema::Schema;
use regex::Regex;
use schemaforge_core::{EngineError, EngineResult, Validatable};
use std::collections::HashSet;
use std::sync::LazyLock;

static TABLE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9_]*$").expect("valid table name pattern"));

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*$").expect("valid identifier pattern"));

// ============================================================================
// ValidationResult
// ============================================================================

/// Result of a validation operation
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether the validation passed
    pub valid: bool,

    /// List of errors (empty if valid)
    pub errors: Vec<ValidationError>,

    /// List of warnings (non-fatal issues)
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    /// Create a successful validation result
    pub fn ok() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Add an error to the result
    pub fn add_error(&mut self, error: ValidationError) {
        self.valid = false;
        self.errors.push(error);
    }

    /// Add a warning to the result
    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Merge another validation result into this one
    pub fn merge(&mut self, other: ValidationResult) {
        if !other.valid {
            self.valid = false;
        }
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Convert to EngineResult (fails if any errors)
    pub fn to_result(self) -> EngineResult<()> {
        if self.valid {
            Ok(())
        } else {
            let msg = self
                .errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            Err(EngineError::validation(msg))
        }
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::ok()
    }
}

// ============================================================================
// ValidationError
// ============================================================================

/// A validation error
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Error code for programmatic handling
    pub code: ValidationErrorCode,

    /// Human-readable error message
    pub message: String,

    /// Path to the problematic element (e.g., "nodes.users.attributes.email")
    pub path: Option<String>,
}

impl ValidationError {
    pub fn new(code: ValidationErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(path) = &self.path {
            write!(f, "[{}] {}", path, self.message)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

/// Error codes for validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationErrorCode {
    EmptyDiagramName,
    InvalidTableName,
    DuplicateTableId,
    InvalidAttributeName,
    DuplicateAttributeId,
    DanglingEdge,
}

// ============================================================================
// ValidationWarning
// ============================================================================

/// A validation warning (non-fatal issue)
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub code: ValidationWarningCode,
    pub message: String,
    pub path: Option<String>,
}

impl ValidationWarning {
    pub fn new(code: ValidationWarningCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(path) = &self.path {
            write!(f, "[{}] Warning: {}", path, self.message)
        } else {
            write!(f, "Warning: {}", self.message)
        }
    }
}

/// Warning codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationWarningCode {
    UnresolvedForeignKey,
    IncompleteJunction,
    NoAttributes,
}

// ============================================================================
// ValidationRule Trait
// ============================================================================

/// Trait for validation rules
pub trait ValidationRule {
    /// Get the rule name
    fn name(&self) -> &'static str;

    /// Get the rule description
    fn description(&self) -> &'static str;

    /// Validate a diagram and return the result
    fn validate(&self, schema: &Schema) -> ValidationResult;
}

// ============================================================================
// Validator
// ============================================================================

/// Diagram validator that runs multiple validation rules
#[derive(Default)]
pub struct Validator {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl Validator {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Create a validator with default rules
    pub fn with_default_rules() -> Self {
        let mut validator = Self::new();
        validator.add_rule(Box::new(DiagramNameRule));
        validator.add_rule(Box::new(TableNamesRule));
        validator.add_rule(Box::new(AttributeNamesRule));
        validator.add_rule(Box::new(EdgesRule));
        validator.add_rule(Box::new(ForeignKeysRule));
        validator.add_rule(Box::new(JunctionTablesRule));
        validator
    }

    pub fn add_rule(&mut self, rule: Box<dyn ValidationRule>) {
        self.rules.push(rule);
    }

    /// Names of the configured rules, in run order
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Validate a diagram with all rules
    pub fn validate(&self, schema: &Schema) -> ValidationResult {
        let mut result = ValidationResult::ok();
        for rule in &self.rules {
            result.merge(rule.validate(schema));
        }
        result
    }

    pub fn validate_result(&self, schema: &Schema) -> EngineResult<()> {
        self.validate(schema).to_result()
    }
}

impl Validatable for Schema {
    fn validate(&self) -> EngineResult<()> {
        Validator::with_default_rules().validate_result(self)
    }

    fn validation_errors(&self) -> Vec<String> {
        Validator::with_default_rules()
            .validate(self)
            .errors
            .iter()
            .map(|e| e.to_string())
            .collect()
    }
}

// ============================================================================
// Built-in Validation Rules
// ============================================================================

/// Rule: the diagram has a name
pub struct DiagramNameRule;

impl ValidationRule for DiagramNameRule {
    fn name(&self) -> &'static str {
        "diagram_name"
    }

    fn description(&self) -> &'static str {
        "Validates that the diagram has a non-empty name"
    }

    fn validate(&self, schema: &Schema) -> ValidationResult {
        let mut result = ValidationResult::ok();
        if schema.name.trim().is_empty() {
            result.add_error(ValidationError::new(
                ValidationErrorCode::EmptyDiagramName,
                "Diagram name cannot be empty",
            ));
        }
        result
    }
}

/// Rule: table names are usable in a migration name, ids are unique
pub struct TableNamesRule;

impl ValidationRule for TableNamesRule {
    fn name(&self) -> &'static str {
        "table_names"
    }

    fn description(&self) -> &'static str {
        "Validates that table names are valid and table ids unique"
    }

    fn validate(&self, schema: &Schema) -> ValidationResult {
        let mut result = ValidationResult::ok();
        let mut seen: HashSet<&str> = HashSet::new();

        for table in &schema.tables {
            let path = format!("nodes.{}", table.id);
            if !is_valid_table_name(&table.name) {
                result.add_error(
                    ValidationError::new(
                        ValidationErrorCode::InvalidTableName,
                        format!(
                            "Table name '{}' must start with a letter and contain only letters, digits and underscores",
                            table.name
                        ),
                    )
                    .with_path(&path),
                );
            }
            if !seen.insert(table.id.as_str()) {
                result.add_error(
                    ValidationError::new(
                        ValidationErrorCode::DuplicateTableId,
                        format!("Duplicate table id: '{}'", table.id),
                    )
                    .with_path(&path),
                );
            }
        }

        result
    }
}

/// Rule: attribute names are identifiers, ids are unique per table
pub struct AttributeNamesRule;

impl ValidationRule for AttributeNamesRule {
    fn name(&self) -> &'static str {
        "attribute_names"
    }

    fn description(&self) -> &'static str {
        "Validates that attribute names are identifiers and attribute ids unique"
    }

    fn validate(&self, schema: &Schema) -> ValidationResult {
        let mut result = ValidationResult::ok();

        for table in &schema.tables {
            if table.attributes.is_empty() {
                result.add_warning(
                    ValidationWarning::new(
                        ValidationWarningCode::NoAttributes,
                        format!("Table '{}' has no attributes", table.name),
                    )
                    .with_path(format!("nodes.{}", table.id)),
                );
            }

            let mut seen: HashSet<&str> = HashSet::new();
            for attribute in &table.attributes {
                let path = format!("nodes.{}.attributes.{}", table.id, attribute.name);
                if !is_valid_identifier(&attribute.name) {
                    result.add_error(
                        ValidationError::new(
                            ValidationErrorCode::InvalidAttributeName,
                            format!(
                                "Attribute name '{}' is not a valid identifier",
                                attribute.name
                            ),
                        )
                        .with_path(&path),
                    );
                }
                if !seen.insert(attribute.id.as_str()) {
                    result.add_error(
                        ValidationError::new(
                            ValidationErrorCode::DuplicateAttributeId,
                            format!("Duplicate attribute id: '{}'", attribute.id),
                        )
                        .with_path(&path),
                    );
                }
            }
        }

        result
    }
}

/// Rule: every edge points at existing tables and attributes
pub struct EdgesRule;

impl ValidationRule for EdgesRule {
    fn name(&self) -> &'static str {
        "edges"
    }

    fn description(&self) -> &'static str {
        "Validates that edges reference existing tables and attributes"
    }

    fn validate(&self, schema: &Schema) -> ValidationResult {
        let mut result = ValidationResult::ok();

        for edge in &schema.edges {
            let source_ok = schema.attribute(&edge.source, &edge.source_handle).is_some();
            let target_ok = schema.attribute(&edge.target, &edge.target_handle).is_some();
            if !source_ok || !target_ok {
                result.add_error(
                    ValidationError::new(
                        ValidationErrorCode::DanglingEdge,
                        format!(
                            "Edge '{}' references a missing {}",
                            edge.id,
                            if source_ok { "target" } else { "source" }
                        ),
                    )
                    .with_path(format!("edges.{}", edge.id)),
                );
            }
        }

        result
    }
}

/// Rule: foreign keys point at existing tables
pub struct ForeignKeysRule;

impl ValidationRule for ForeignKeysRule {
    fn name(&self) -> &'static str {
        "foreign_keys"
    }

    fn description(&self) -> &'static str {
        "Warns about foreign keys whose target table does not exist"
    }

    fn validate(&self, schema: &Schema) -> ValidationResult {
        let mut result = ValidationResult::ok();

        for table in &schema.tables {
            for attribute in table.attributes.iter().filter(|a| a.is_foreign_key) {
                let path = format!("nodes.{}.attributes.{}", table.id, attribute.name);
                let message = match attribute.references_table.as_deref() {
                    None | Some("") => {
                        format!("Foreign key '{}' has no target table", attribute.name)
                    }
                    Some(target) if schema.table(target).is_none() => format!(
                        "Foreign key '{}' references missing table '{}'",
                        attribute.name, target
                    ),
                    Some(_) => continue,
                };
                result.add_warning(
                    ValidationWarning::new(ValidationWarningCode::UnresolvedForeignKey, message)
                        .with_path(path),
                );
            }
        }

        result
    }
}

/// Rule: junction tables name two existing, distinct partners
pub struct JunctionTablesRule;

impl ValidationRule for JunctionTablesRule {
    fn name(&self) -> &'static str {
        "junction_tables"
    }

    fn description(&self) -> &'static str {
        "Warns about junction tables without two existing partner tables"
    }

    fn validate(&self, schema: &Schema) -> ValidationResult {
        let mut result = ValidationResult::ok();

        for table in schema.tables.iter().filter(|t| t.is_junction) {
            let partners = [
                table.junction_table1.as_deref(),
                table.junction_table2.as_deref(),
            ];
            let resolved: Vec<&str> = partners
                .into_iter()
                .flatten()
                .filter(|id| schema.table(id).is_some())
                .collect();
            let complete = resolved.len() == 2 && resolved[0] != resolved[1];
            if !complete {
                result.add_warning(
                    ValidationWarning::new(
                        ValidationWarningCode::IncompleteJunction,
                        format!(
                            "Junction table '{}' needs two distinct existing partner tables",
                            table.name
                        ),
                    )
                    .with_path(format!("nodes.{}", table.id)),
                );
            }
        }

        result
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Check if a table name can be used in a migration name
pub fn is_valid_table_name(name: &str) -> bool {
    TABLE_NAME.is_match(name)
}

/// Check if a string is a valid identifier
pub fn is_valid_identifier(s: &str) -> bool {
    IDENTIFIER.is_match(s)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Attribute, AttributeKind, Edge, TableSpec};

    fn codes(result: &ValidationResult) -> Vec<ValidationErrorCode> {
        result.errors.iter().map(|e| e.code).collect()
    }

    fn warning_codes(result: &ValidationResult) -> Vec<ValidationWarningCode> {
        result.warnings.iter().map(|w| w.code).collect()
    }

    fn blog() -> Schema {
        let mut schema = Schema::new("Blog");
        schema.add_node(TableSpec::new("users")).unwrap();
        schema.add_node(TableSpec::new("posts")).unwrap();
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
    fn test_valid_diagram() {
        let result = Validator::with_default_rules().validate(&blog());
        assert!(result.valid);
        assert!(!result.has_warnings());
        assert!(blog().is_valid());
    }

    #[test]
    fn test_validation_result_merge() {
        let mut result = ValidationResult::ok();
        let mut other = ValidationResult::ok();
        other.add_error(ValidationError::new(
            ValidationErrorCode::EmptyDiagramName,
            "Error",
        ));
        result.merge(other);
        assert!(!result.valid);
        assert!(result.has_errors());
        assert!(result.to_result().unwrap_err().is_validation());
    }

    #[test]
    fn test_error_display() {
        let error = ValidationError::new(ValidationErrorCode::InvalidTableName, "bad name")
            .with_path("nodes.x");
        assert_eq!(error.to_string(), "[nodes.x] bad name");
        let warning = ValidationWarning::new(ValidationWarningCode::NoAttributes, "empty");
        assert_eq!(warning.to_string(), "Warning: empty");
    }

    #[test]
    fn test_table_names_rule() {
        let mut schema = blog();
        schema.add_node(TableSpec::new("Blog Post")).unwrap();
        schema.add_node(TableSpec::new("2fa")).unwrap();
        let result = TableNamesRule.validate(&schema);
        assert_eq!(
            codes(&result),
            vec![
                ValidationErrorCode::InvalidTableName,
                ValidationErrorCode::InvalidTableName
            ]
        );
    }

    #[test]
    fn test_duplicate_ids_from_import() {
        let mut schema = blog();
        let copy = schema.tables[0].clone();
        schema.tables.push(copy);
        let attribute = schema.tables[1].attributes[0].clone();
        schema.tables[1].attributes.push(attribute);

        assert!(
            codes(&TableNamesRule.validate(&schema))
                .contains(&ValidationErrorCode::DuplicateTableId)
        );
        assert!(
            codes(&AttributeNamesRule.validate(&schema))
                .contains(&ValidationErrorCode::DuplicateAttributeId)
        );
    }

    #[test]
    fn test_attribute_names_rule() {
        let mut schema = blog();
        schema
            .add_attribute(
                "users",
                Attribute::new("first name", AttributeKind::string(None)).into(),
            )
            .unwrap();
        schema.add_node(TableSpec::junction("tags", "a", "b")).unwrap();

        let result = AttributeNamesRule.validate(&schema);
        assert_eq!(codes(&result), vec![ValidationErrorCode::InvalidAttributeName]);
        assert_eq!(warning_codes(&result), vec![ValidationWarningCode::NoAttributes]);
    }

    #[test]
    fn test_edges_rule() {
        let mut schema = blog();
        schema.edges.push(Edge {
            id: "edge-posts-ghosts".to_string(),
            source: "posts".to_string(),
            target: "ghosts".to_string(),
            source_handle: "posts-user_id".to_string(),
            target_handle: "ghosts-id".to_string(),
            label: None,
        });
        let result = EdgesRule.validate(&schema);
        assert_eq!(codes(&result), vec![ValidationErrorCode::DanglingEdge]);
        assert!(result.errors[0].message.contains("missing target"));
    }

    #[test]
    fn test_foreign_keys_rule() {
        let mut schema = blog();
        schema
            .add_attribute(
                "posts",
                Attribute::new("tag_id", AttributeKind::integer())
                    .references("tags")
                    .into(),
            )
            .unwrap();
        let result = ForeignKeysRule.validate(&schema);
        assert!(result.valid);
        assert_eq!(
            warning_codes(&result),
            vec![ValidationWarningCode::UnresolvedForeignKey]
        );
    }

    #[test]
    fn test_junction_tables_rule() {
        let mut schema = blog();
        schema
            .add_node(TableSpec::junction("post_users", "posts", "users"))
            .unwrap();
        schema
            .add_node(TableSpec::junction("selfish", "posts", "posts"))
            .unwrap();
        let result = JunctionTablesRule.validate(&schema);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].path.as_deref(), Some("nodes.selfish"));
    }

    #[test]
    fn test_empty_diagram_name() {
        let mut schema = blog();
        schema.set_name("  ");
        let errors = schema.validation_errors();
        assert_eq!(errors, vec!["Diagram name cannot be empty".to_string()]);
    }

    #[test]
    fn test_identifier_patterns() {
        assert!(is_valid_table_name("users"));
        assert!(is_valid_table_name("Order_Items2"));
        assert!(!is_valid_table_name("_users"));
        assert!(!is_valid_table_name("order items"));
        assert!(!is_valid_table_name(""));

        assert!(is_valid_identifier("user_id"));
        assert!(is_valid_identifier("_private"));
        assert!(!is_valid_identifier("123user"));
        assert!(!is_valid_identifier("user-id"));
    }

    #[test]
    fn test_rule_names() {
        let names = Validator::with_default_rules().rule_names();
        assert_eq!(names.len(), 6);
        assert_eq!(names[0], "diagram_name");
    }
}
