//! # Schemaforge CLI
//!
//! Command-line front end over a file-backed diagram store.
//!
//! ## Commands
//!
//! - `new`, `rename` - start or rename the diagram
//! - `import`, `export` - move diagrams in and out as JSON
//! - `info`, `types`, `validate` - inspect the diagram
//! - `compile` - print Yii migration commands
//! - `table`, `attr` - edit tables and attributes
//!

pub mod args;
pub mod commands;
mod output;

pub use args::Cli;
pub use commands::run;

// Re-export dependencies for use in main.rs
pub use schemaforge_codegen;
pub use schemaforge_core;
pub use schemaforge_ir;

/// CLI version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// CLI name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Failures that belong to the CLI rather than the engine
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("diagram has {errors} error(s)")]
    ValidationFailed { errors: usize },
}

impl CliError {
    /// Process exit code for this failure
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::ValidationFailed { .. } => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert_eq!(NAME, "schemaforge_cli");
    }

    #[test]
    fn test_cli_error_display() {
        let err = CliError::ValidationFailed { errors: 3 };
        assert_eq!(err.to_string(), "diagram has 3 error(s)");
        assert_eq!(err.exit_code(), 2);
    }
}
