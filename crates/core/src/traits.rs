//! Core traits for Schemaforge
//!
//! This module defines the behaviors shared across crates: validation of
//! model values and the key-value persistence port the schema store writes to.

use crate::error::EngineResult;

// ============================================================================
// Validatable Trait
// ============================================================================

/// Trait for types that can be validated
///
/// Types implementing this trait can check their internal consistency
/// and return validation errors if the state is invalid.
pub trait Validatable {
    /// Validate the current state of the object
    ///
    /// Returns `Ok(())` if valid, or an `EngineError` describing the problem.
    fn validate(&self) -> EngineResult<()>;

    /// Check if the object is valid without returning error details
    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Get all validation errors (for types that can have multiple errors)
    fn validation_errors(&self) -> Vec<String> {
        match self.validate() {
            Ok(()) => vec![],
            Err(e) => vec![e.to_string()],
        }
    }
}

// ============================================================================
// StoragePort Trait
// ============================================================================

/// Key-value storage the schema store persists its snapshot through
///
/// The store reads one key at startup and overwrites it wholesale after
/// every mutation. Implementations decide where the bytes live.
///
/// # Example
///
/// ```rust,ignore
/// use schemaforge_core::{EngineResult, StoragePort};
/// use std::collections::HashMap;
///
/// #[derive(Default)]
/// struct MapStorage(HashMap<String, String>);
///
/// impl StoragePort for MapStorage {
///     fn get(&self, key: &str) -> EngineResult<Option<String>> {
///         Ok(self.0.get(key).cloned())
///     }
///
///     fn set(&mut self, key: &str, value: &str) -> EngineResult<()> {
///         self.0.insert(key.to_string(), value.to_string());
///         Ok(())
///     }
/// }
/// ```
pub trait StoragePort {
    /// Read the value stored under `key`, `None` if nothing is stored
    fn get(&self, key: &str) -> EngineResult<Option<String>>;

    /// Replace the value stored under `key`
    fn set(&mut self, key: &str, value: &str) -> EngineResult<()>;
}

impl<S: StoragePort + ?Sized> StoragePort for Box<S> {
    fn get(&self, key: &str) -> EngineResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> EngineResult<()> {
        (**self).set(key, value)
    }
}
