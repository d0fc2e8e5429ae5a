//! Attribute definitions for table columns
//!
//! This module contains the `Attribute` struct, the `AttributeKind` sum type
//! that ties a type token to the parameters its category allows, and the
//! spec/patch values the schema operations take.
//!
//! On the wire an attribute is a flat JSON object (`type`, `length`,
//! `precision`, `scale` side by side). Decoding goes through
//! [`AttributeRecord`], which drops any parameter the type's category does
//! not accept.

use schemaforge_core::{BareType, LengthType, ParamCategory, PrecisionType, ScaledType};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// AttributeKind
// ============================================================================

/// A type token together with the parameters its category allows
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    /// No parameters (text, boolean, date, json)
    Bare(BareType),
    /// Optional length (string, char, integers, primary key types)
    Length {
        ty: LengthType,
        length: Option<u32>,
    },
    /// Optional precision (datetime, time, timestamp, float, double)
    Precision {
        ty: PrecisionType,
        precision: Option<u32>,
    },
    /// Optional precision and scale (decimal, money)
    Scaled {
        ty: ScaledType,
        precision: Option<u32>,
        scale: Option<u32>,
    },
    /// A token outside the known catalogue; never carries parameters
    Unrecognized(String),
}

impl AttributeKind {
    /// Build a kind from a raw token and whatever parameters were supplied.
    ///
    /// Parameters outside the token's category are discarded.
    pub fn from_parts(
        token: &str,
        length: Option<u32>,
        precision: Option<u32>,
        scale: Option<u32>,
    ) -> Self {
        if let Some(ty) = BareType::from_token(token) {
            AttributeKind::Bare(ty)
        } else if let Some(ty) = LengthType::from_token(token) {
            AttributeKind::Length { ty, length }
        } else if let Some(ty) = PrecisionType::from_token(token) {
            AttributeKind::Precision { ty, precision }
        } else if let Some(ty) = ScaledType::from_token(token) {
            AttributeKind::Scaled {
                ty,
                precision,
                scale,
            }
        } else {
            AttributeKind::Unrecognized(token.to_string())
        }
    }

    /// Build a parameterless kind from a raw token
    pub fn parse(token: &str) -> Self {
        Self::from_parts(token, None, None, None)
    }

    /// `integer`, the type seeded for keys and behavior columns
    pub fn integer() -> Self {
        AttributeKind::Length {
            ty: LengthType::Integer,
            length: None,
        }
    }

    /// `string` with an optional length
    pub fn string(length: Option<u32>) -> Self {
        AttributeKind::Length {
            ty: LengthType::String,
            length,
        }
    }

    /// `decimal` with optional precision and scale
    pub fn decimal(precision: Option<u32>, scale: Option<u32>) -> Self {
        AttributeKind::Scaled {
            ty: ScaledType::Decimal,
            precision,
            scale,
        }
    }

    /// The raw type token
    pub fn type_token(&self) -> &str {
        match self {
            AttributeKind::Bare(ty) => ty.as_str(),
            AttributeKind::Length { ty, .. } => ty.as_str(),
            AttributeKind::Precision { ty, .. } => ty.as_str(),
            AttributeKind::Scaled { ty, .. } => ty.as_str(),
            AttributeKind::Unrecognized(token) => token,
        }
    }

    /// The parameter category, `None` for unrecognised tokens
    pub fn category(&self) -> Option<ParamCategory> {
        match self {
            AttributeKind::Bare(_) => Some(ParamCategory::Bare),
            AttributeKind::Length { .. } => Some(ParamCategory::Length),
            AttributeKind::Precision { .. } => Some(ParamCategory::Precision),
            AttributeKind::Scaled { .. } => Some(ParamCategory::PrecisionScale),
            AttributeKind::Unrecognized(_) => None,
        }
    }

    pub fn length(&self) -> Option<u32> {
        match self {
            AttributeKind::Length { length, .. } => *length,
            _ => None,
        }
    }

    pub fn precision(&self) -> Option<u32> {
        match self {
            AttributeKind::Precision { precision, .. }
            | AttributeKind::Scaled { precision, .. } => *precision,
            _ => None,
        }
    }

    pub fn scale(&self) -> Option<u32> {
        match self {
            AttributeKind::Scaled { scale, .. } => *scale,
            _ => None,
        }
    }
}

impl Default for AttributeKind {
    fn default() -> Self {
        Self::string(None)
    }
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_token())
    }
}

// ============================================================================
// DefaultValue
// ============================================================================

/// Column default as entered in the attribute form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefaultValue {
    Number(serde_json::Number),
    Text(String),
}

impl DefaultValue {
    /// Whether the value produces a `defaultValue(..)` modifier.
    ///
    /// The empty string and numeric zero count as "no default".
    pub fn is_effective(&self) -> bool {
        match self {
            DefaultValue::Text(text) => !text.is_empty(),
            DefaultValue::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        }
    }
}

impl fmt::Display for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Text(text) => write!(f, "{}", text),
            DefaultValue::Number(number) => write!(f, "{}", number),
        }
    }
}

impl From<&str> for DefaultValue {
    fn from(value: &str) -> Self {
        DefaultValue::Text(value.to_string())
    }
}

impl From<String> for DefaultValue {
    fn from(value: String) -> Self {
        DefaultValue::Text(value)
    }
}

impl From<i64> for DefaultValue {
    fn from(value: i64) -> Self {
        DefaultValue::Number(value.into())
    }
}

// ============================================================================
// Attribute
// ============================================================================

/// A modeled column of a table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "AttributeRecord", into = "AttributeRecord")]
pub struct Attribute {
    /// `{tableId}-{name}`, assigned when the attribute is added
    pub id: String,

    /// Column name
    pub name: String,

    /// Type token and its parameters
    pub kind: AttributeKind,

    /// Display and compile order within the table
    pub sort: i64,

    pub is_not_null: bool,
    pub is_unique: bool,
    pub is_primary_key: bool,
    pub is_foreign_key: bool,
    pub is_unsigned: bool,

    /// Id of the referenced table
    pub references_table: Option<String>,

    /// Name of the referenced column
    pub references_field: Option<String>,

    pub default_value: Option<DefaultValue>,
}

impl Attribute {
    /// Create a new attribute with the given name and kind
    pub fn new(name: impl Into<String>, kind: AttributeKind) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            kind,
            sort: 0,
            is_not_null: false,
            is_unique: false,
            is_primary_key: false,
            is_foreign_key: false,
            is_unsigned: false,
            references_table: None,
            references_field: None,
            default_value: None,
        }
    }

    /// The `id` primary key seeded into every regular table
    pub fn primary_key_id() -> Self {
        Self::new("id", AttributeKind::integer())
            .not_null()
            .unique()
            .primary_key()
    }

    /// A not-null unsigned integer column (timestamps, blame and junction keys)
    pub fn behavior_column(name: impl Into<String>) -> Self {
        Self::new(name, AttributeKind::integer())
            .not_null()
            .unsigned()
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    /// Set the sort index
    pub fn with_sort(mut self, sort: i64) -> Self {
        self.sort = sort;
        self
    }

    /// Set the id
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Mark the attribute as NOT NULL
    pub fn not_null(mut self) -> Self {
        self.is_not_null = true;
        self
    }

    /// Mark the attribute as unique
    pub fn unique(mut self) -> Self {
        self.is_unique = true;
        self
    }

    /// Mark the attribute as primary key
    pub fn primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self
    }

    /// Mark the attribute as unsigned
    pub fn unsigned(mut self) -> Self {
        self.is_unsigned = true;
        self
    }

    /// Make the attribute a foreign key to `table`
    pub fn references(mut self, table: impl Into<String>) -> Self {
        self.is_foreign_key = true;
        self.references_table = Some(table.into());
        self
    }

    /// Set the referenced column name
    pub fn references_field(mut self, field: impl Into<String>) -> Self {
        self.references_field = Some(field.into());
        self
    }

    /// Set a default value
    pub fn with_default(mut self, value: impl Into<DefaultValue>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    // ========================================================================
    // Utility methods
    // ========================================================================

    /// The raw type token
    pub fn type_token(&self) -> &str {
        self.kind.type_token()
    }

    /// Whether this attribute is a foreign key with a non-empty target
    pub fn has_reference(&self) -> bool {
        self.is_foreign_key && self.references_table.as_deref().is_some_and(|t| !t.is_empty())
    }
}

impl Default for Attribute {
    fn default() -> Self {
        Self::new("field", AttributeKind::default())
    }
}

// ============================================================================
// Wire record
// ============================================================================

/// Flat JSON shape of an attribute
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub type_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<u32>,
    #[serde(default)]
    pub sort: i64,
    #[serde(default, alias = "isRequired")]
    pub is_not_null: bool,
    #[serde(default)]
    pub is_unique: bool,
    #[serde(default)]
    pub is_primary_key: bool,
    #[serde(default)]
    pub is_foreign_key: bool,
    #[serde(default)]
    pub is_unsigned: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references_table: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references_field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<DefaultValue>,
}

impl From<AttributeRecord> for Attribute {
    fn from(record: AttributeRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            kind: AttributeKind::from_parts(
                &record.type_token,
                record.length,
                record.precision,
                record.scale,
            ),
            sort: record.sort,
            is_not_null: record.is_not_null,
            is_unique: record.is_unique,
            is_primary_key: record.is_primary_key,
            is_foreign_key: record.is_foreign_key,
            is_unsigned: record.is_unsigned,
            references_table: record.references_table,
            references_field: record.references_field,
            default_value: record.default_value,
        }
    }
}

impl From<Attribute> for AttributeRecord {
    fn from(attribute: Attribute) -> Self {
        Self {
            type_token: attribute.kind.type_token().to_string(),
            length: attribute.kind.length(),
            precision: attribute.kind.precision(),
            scale: attribute.kind.scale(),
            id: attribute.id,
            name: attribute.name,
            sort: attribute.sort,
            is_not_null: attribute.is_not_null,
            is_unique: attribute.is_unique,
            is_primary_key: attribute.is_primary_key,
            is_foreign_key: attribute.is_foreign_key,
            is_unsigned: attribute.is_unsigned,
            references_table: attribute.references_table,
            references_field: attribute.references_field,
            default_value: attribute.default_value,
        }
    }
}

// ============================================================================
// AttributeSpec / AttributePatch
// ============================================================================

/// Input to `add_attribute`: a template plus an optional explicit sort index
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeSpec {
    pub template: Attribute,
    pub sort: Option<i64>,
}

impl AttributeSpec {
    /// Pin the sort index instead of appending after the current maximum
    pub fn at(mut self, sort: i64) -> Self {
        self.sort = Some(sort);
        self
    }
}

impl From<Attribute> for AttributeSpec {
    fn from(template: Attribute) -> Self {
        Self {
            template,
            sort: None,
        }
    }
}

/// Partial update of an attribute. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributePatch {
    pub name: Option<String>,
    pub kind: Option<AttributeKind>,
    pub sort: Option<i64>,
    pub is_not_null: Option<bool>,
    pub is_unique: Option<bool>,
    pub is_primary_key: Option<bool>,
    pub is_foreign_key: Option<bool>,
    pub is_unsigned: Option<bool>,
    pub references_table: Option<Option<String>>,
    pub references_field: Option<Option<String>>,
    pub default_value: Option<Option<DefaultValue>>,
}

impl AttributePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn kind(mut self, kind: AttributeKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn not_null(mut self, value: bool) -> Self {
        self.is_not_null = Some(value);
        self
    }

    pub fn unique(mut self, value: bool) -> Self {
        self.is_unique = Some(value);
        self
    }

    pub fn primary_key(mut self, value: bool) -> Self {
        self.is_primary_key = Some(value);
        self
    }

    pub fn foreign_key(mut self, value: bool) -> Self {
        self.is_foreign_key = Some(value);
        self
    }

    pub fn unsigned(mut self, value: bool) -> Self {
        self.is_unsigned = Some(value);
        self
    }

    pub fn references_table(mut self, table: Option<String>) -> Self {
        self.references_table = Some(table);
        self
    }

    pub fn default_value(mut self, value: Option<DefaultValue>) -> Self {
        self.default_value = Some(value);
        self
    }

    /// Whether the patch can change the attribute's derived edge
    pub fn touches_foreign_key(&self) -> bool {
        self.is_foreign_key.is_some() || self.references_table.is_some()
    }

    /// Merge the patch into `attribute`
    pub fn apply_to(&self, attribute: &mut Attribute) {
        if let Some(name) = &self.name {
            attribute.name = name.clone();
        }
        if let Some(kind) = &self.kind {
            attribute.kind = kind.clone();
        }
        if let Some(sort) = self.sort {
            attribute.sort = sort;
        }
        if let Some(value) = self.is_not_null {
            attribute.is_not_null = value;
        }
        if let Some(value) = self.is_unique {
            attribute.is_unique = value;
        }
        if let Some(value) = self.is_primary_key {
            attribute.is_primary_key = value;
        }
        if let Some(value) = self.is_foreign_key {
            attribute.is_foreign_key = value;
        }
        if let Some(value) = self.is_unsigned {
            attribute.is_unsigned = value;
        }
        if let Some(table) = &self.references_table {
            attribute.references_table = table.clone();
        }
        if let Some(field) = &self.references_field {
            attribute.references_field = field.clone();
        }
        if let Some(value) = &self.default_value {
            attribute.default_value = value.clone();
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
