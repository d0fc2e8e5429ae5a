//! Error types for Schemaforge
//!
//! This module provides unified error handling across the engine:
//! diagram validation, lookup failures, storage and serialization errors.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for Schemaforge
#[derive(Debug, Error)]
pub enum EngineError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    /// General validation error (malformed diagram, bad names)
    #[error("Validation error: {0}")]
    Validation(String),

    /// The diagram had the right outline but its contents could not be decoded
    #[error("Invalid diagram format: {0}")]
    InvalidDiagramFormat(String),

    // ========================================================================
    // Not Found Errors
    // ========================================================================
    /// Table not found
    #[error("Table not found: {0}")]
    TableNotFound(String),

    /// Attribute not found
    #[error("Attribute '{attribute}' not found in table '{table}'")]
    AttributeNotFound { table: String, attribute: String },

    /// Diagram file not found
    #[error("Diagram not found at path: {0}")]
    DiagramNotFound(PathBuf),

    // ========================================================================
    // Duplicate Errors
    // ========================================================================
    /// Duplicate table id
    #[error("Duplicate table: '{0}' already exists")]
    DuplicateTable(String),

    /// Duplicate attribute id
    #[error("Duplicate attribute: '{attribute}' already exists in table '{table}'")]
    DuplicateAttribute { table: String, attribute: String },

    // ========================================================================
    // Storage Errors
    // ========================================================================
    /// Persistence port failure
    #[error("Storage error for key '{key}': {message}")]
    Storage { key: String, message: String },

    /// File IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),

    // ========================================================================
    // Generic Errors
    // ========================================================================
    /// Internal error (broken invariant, should not happen)
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error with context
    #[error("{context}: {message}")]
    WithContext { context: String, message: String },
}

impl EngineError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        EngineError::Validation(msg.into())
    }

    /// Create a storage error
    pub fn storage(key: impl Into<String>, msg: impl Into<String>) -> Self {
        EngineError::Storage {
            key: key.into(),
            message: msg.into(),
        }
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        EngineError::Internal(msg.into())
    }

    /// Create an error with context
    pub fn with_context(context: impl Into<String>, msg: impl Into<String>) -> Self {
        EngineError::WithContext {
            context: context.into(),
            message: msg.into(),
        }
    }

    /// Check if this error is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            EngineError::Validation(_) | EngineError::InvalidDiagramFormat(_)
        )
    }

    /// Check if this error is a not-found error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            EngineError::TableNotFound(_)
                | EngineError::AttributeNotFound { .. }
                | EngineError::DiagramNotFound(_)
        )
    }

    /// Check if this error is a duplicate error
    pub fn is_duplicate(&self) -> bool {
        matches!(
            self,
            EngineError::DuplicateTable(_) | EngineError::DuplicateAttribute { .. }
        )
    }

    /// Check if this error is an IO or storage error
    pub fn is_io(&self) -> bool {
        matches!(self, EngineError::Io(_) | EngineError::Storage { .. })
    }
}

/// Result type alias using EngineError
pub type EngineResult<T> = Result<T, EngineError>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn with_context<C: Into<String>>(self, context: C) -> EngineResult<T>;
}

impl<T, E: Into<EngineError>> ResultExt<T> for Result<T, E> {
    fn with_context<C: Into<String>>(self, context: C) -> EngineResult<T> {
        self.map_err(|e| {
            let err: EngineError = e.into();
            EngineError::with_context(context, err.to_string())
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
