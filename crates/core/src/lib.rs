//! # Schemaforge Core
//!
//! Core types, traits, and error handling for Schemaforge.
//!
//! This crate provides the foundational building blocks used throughout
//! the workspace, including:
//!
//! - **Types**: canvas `Position` and the classification of attribute type
//!   tokens into parameter categories (`ParamCategory`)
//! - **Traits**: `Validatable` and the `StoragePort` persistence port
//! - **Errors**: Unified error handling with `EngineError` and `EngineResult`
//!

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use error::{EngineError, EngineResult, ResultExt};
pub use traits::{StoragePort, Validatable};
pub use types::{
    BARE_TYPES, BareType, LENGTH_TYPES, LengthType, PRECISION_SCALE_TYPES, PRECISION_TYPES,
    ParamCategory, Position, PrecisionType, ScaledType,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
