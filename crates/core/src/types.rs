//! Core types used throughout Schemaforge
//!
//! This module contains the canvas geometry shared by tables and the
//! classification of attribute type tokens into parameter categories.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Geometry Types
// ============================================================================

/// Position of a table on the diagram canvas
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    /// Create a new position
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Create a position at the origin (0, 0)
    pub fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Both coordinates are finite. JSON has no encoding for NaN or infinity.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::zero()
    }
}

// ============================================================================
// Parameter Categories
// ============================================================================

/// Type tokens that take no parameters
pub const BARE_TYPES: &[&str] = &["text", "boolean", "date", "json"];

/// Type tokens that take an optional `length`
pub const LENGTH_TYPES: &[&str] = &[
    "string",
    "char",
    "binary",
    "tinyInteger",
    "smallint",
    "integer",
    "bigint",
    "primaryKey",
    "bigPrimaryKey",
];

/// Type tokens that take an optional `precision`
pub const PRECISION_TYPES: &[&str] = &["datetime", "time", "timestamp", "float", "double"];

/// Type tokens that take an optional `precision` and `scale`
pub const PRECISION_SCALE_TYPES: &[&str] = &["decimal", "money"];

/// Which extra parameters an attribute type accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamCategory {
    Bare,
    Length,
    Precision,
    PrecisionScale,
}

impl ParamCategory {
    /// Classify a raw type token. Unrecognised tokens have no category.
    pub fn of(token: &str) -> Option<Self> {
        if BARE_TYPES.contains(&token) {
            Some(ParamCategory::Bare)
        } else if LENGTH_TYPES.contains(&token) {
            Some(ParamCategory::Length)
        } else if PRECISION_TYPES.contains(&token) {
            Some(ParamCategory::Precision)
        } else if PRECISION_SCALE_TYPES.contains(&token) {
            Some(ParamCategory::PrecisionScale)
        } else {
            None
        }
    }

    /// The tokens belonging to this category
    pub fn tokens(&self) -> &'static [&'static str] {
        match self {
            ParamCategory::Bare => BARE_TYPES,
            ParamCategory::Length => LENGTH_TYPES,
            ParamCategory::Precision => PRECISION_TYPES,
            ParamCategory::PrecisionScale => PRECISION_SCALE_TYPES,
        }
    }

    /// Get the display name for this category
    pub fn display_name(&self) -> &'static str {
        match self {
            ParamCategory::Bare => "bare",
            ParamCategory::Length => "length",
            ParamCategory::Precision => "precision",
            ParamCategory::PrecisionScale => "precision, scale",
        }
    }

    /// All categories in declaration order
    pub fn all() -> &'static [ParamCategory] {
        &[
            ParamCategory::Bare,
            ParamCategory::Length,
            ParamCategory::Precision,
            ParamCategory::PrecisionScale,
        ]
    }
}

impl fmt::Display for ParamCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Type Tokens
// ============================================================================

/// Types without parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BareType {
    Text,
    Boolean,
    Date,
    Json,
}

impl BareType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BareType::Text => "text",
            BareType::Boolean => "boolean",
            BareType::Date => "date",
            BareType::Json => "json",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "text" => Some(BareType::Text),
            "boolean" => Some(BareType::Boolean),
            "date" => Some(BareType::Date),
            "json" => Some(BareType::Json),
            _ => None,
        }
    }
}

/// Types carrying an optional length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LengthType {
    String,
    Char,
    Binary,
    TinyInteger,
    SmallInt,
    Integer,
    BigInt,
    PrimaryKey,
    BigPrimaryKey,
}

impl LengthType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LengthType::String => "string",
            LengthType::Char => "char",
            LengthType::Binary => "binary",
            LengthType::TinyInteger => "tinyInteger",
            LengthType::SmallInt => "smallint",
            LengthType::Integer => "integer",
            LengthType::BigInt => "bigint",
            LengthType::PrimaryKey => "primaryKey",
            LengthType::BigPrimaryKey => "bigPrimaryKey",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "string" => Some(LengthType::String),
            "char" => Some(LengthType::Char),
            "binary" => Some(LengthType::Binary),
            "tinyInteger" => Some(LengthType::TinyInteger),
            "smallint" => Some(LengthType::SmallInt),
            "integer" => Some(LengthType::Integer),
            "bigint" => Some(LengthType::BigInt),
            "primaryKey" => Some(LengthType::PrimaryKey),
            "bigPrimaryKey" => Some(LengthType::BigPrimaryKey),
            _ => None,
        }
    }
}

/// Types carrying an optional precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrecisionType {
    DateTime,
    Time,
    Timestamp,
    Float,
    Double,
}

impl PrecisionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrecisionType::DateTime => "datetime",
            PrecisionType::Time => "time",
            PrecisionType::Timestamp => "timestamp",
            PrecisionType::Float => "float",
            PrecisionType::Double => "double",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "datetime" => Some(PrecisionType::DateTime),
            "time" => Some(PrecisionType::Time),
            "timestamp" => Some(PrecisionType::Timestamp),
            "float" => Some(PrecisionType::Float),
            "double" => Some(PrecisionType::Double),
            _ => None,
        }
    }
}

/// Types carrying an optional precision and scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScaledType {
    Decimal,
    Money,
}

impl ScaledType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScaledType::Decimal => "decimal",
            ScaledType::Money => "money",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "decimal" => Some(ScaledType::Decimal),
            "money" => Some(ScaledType::Money),
            _ => None,
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
    use std::collections::HashSet;

    #[test]
    fn test_position_is_finite() {
        assert!(Position::new(-10.0, 2.5).is_finite());
        assert!(!Position::new(f64::NAN, 0.0).is_finite());
        assert!(!Position::new(0.0, f64::NEG_INFINITY).is_finite());
        assert_eq!(Position::default(), Position::zero());
    }

    #[test]
    fn test_categories_are_disjoint() {
        let mut seen = HashSet::new();
        for category in ParamCategory::all() {
            for token in category.tokens() {
                assert!(seen.insert(*token), "token '{}' classified twice", token);
                assert_eq!(ParamCategory::of(token), Some(*category));
            }
        }
        assert_eq!(seen.len(), 20);
    }

    #[test]
    fn test_unrecognised_token_has_no_category() {
        assert_eq!(ParamCategory::of("uuid"), None);
        assert_eq!(ParamCategory::of("Integer"), None);
        assert_eq!(ParamCategory::of(""), None);
    }

    #[test]
    fn test_primary_key_tokens_are_length_bearing() {
        assert_eq!(ParamCategory::of("primaryKey"), Some(ParamCategory::Length));
        assert_eq!(
            ParamCategory::of("bigPrimaryKey"),
            Some(ParamCategory::Length)
        );
    }

    #[test]
    fn test_token_enums_agree_with_sets() {
        for token in BARE_TYPES {
            assert_eq!(BareType::from_token(token).unwrap().as_str(), *token);
        }
        for token in LENGTH_TYPES {
            assert_eq!(LengthType::from_token(token).unwrap().as_str(), *token);
        }
        for token in PRECISION_TYPES {
            assert_eq!(PrecisionType::from_token(token).unwrap().as_str(), *token);
        }
        for token in PRECISION_SCALE_TYPES {
            assert_eq!(ScaledType::from_token(token).unwrap().as_str(), *token);
        }
        assert!(BareType::from_token("string").is_none());
        assert!(ScaledType::from_token("float").is_none());
    }
}
