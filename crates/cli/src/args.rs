//! CLI argument definitions using clap
//!
//! Commands:
//! - schemaforge new [NAME]
//! - schemaforge import <FILE> / export [--output PATH]
//! - schemaforge info / types / validate
//! - schemaforge compile [--table ID] [--show-id]
//! - schemaforge rename <NAME>
//! - schemaforge table add|update|remove|move
//! - schemaforge attr add|update|remove|move

use clap::{Args, Parser, Subcommand, ValueEnum};
use schemaforge_ir::{DEFAULT_DIAGRAM_NAME, DEFAULT_STORAGE_KEY, Direction};
use std::path::PathBuf;

/// Schemaforge - relational schema designer and Yii migration command compiler
#[derive(Parser, Debug)]
#[command(name = "schemaforge")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Directory holding the persisted diagram
    #[arg(long, global = true, env = "SCHEMAFORGE_STORE", default_value = ".schemaforge")]
    pub store: PathBuf,

    /// Storage key of the diagram
    #[arg(long, global = true, env = "SCHEMAFORGE_KEY", default_value = DEFAULT_STORAGE_KEY)]
    pub key: String,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start a new, empty diagram
    New {
        /// Diagram name
        #[arg(default_value = DEFAULT_DIAGRAM_NAME)]
        name: String,
    },

    /// Replace the diagram with an exported JSON file
    Import {
        /// Path of the JSON file
        file: PathBuf,
    },

    /// Export the diagram as JSON
    Export {
        /// Write to this file (or into this directory) instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Single-line JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show the diagram's tables and counts
    Info,

    /// List attribute types by parameter category
    Types,

    /// Print Yii migration commands
    Compile {
        /// Only this table id
        #[arg(long)]
        table: Option<String>,

        /// Keep the `id` primary key even where the table hides it
        #[arg(long)]
        show_id: bool,
    },

    /// Check names, references and edges
    Validate,

    /// Rename the diagram
    Rename { name: String },

    /// Manage tables
    Table {
        #[command(subcommand)]
        action: TableAction,
    },

    /// Manage attributes
    Attr {
        #[command(subcommand)]
        action: AttrAction,
    },
}

// ============================================================================
// Table subcommands
// ============================================================================

#[derive(Subcommand, Debug)]
pub enum TableAction {
    /// Add a table
    Add {
        /// Table name; the id is derived from it
        name: String,

        #[arg(long)]
        description: Option<String>,

        /// Add created_at / updated_at
        #[arg(long)]
        timestamps: bool,

        /// Add created_by / updated_by
        #[arg(long)]
        blameable: bool,

        /// Keep the `id` key in the compiled command
        #[arg(long)]
        show_id: bool,

        /// Make a junction table between two table ids
        #[arg(long, num_args = 2, value_names = ["TABLE1", "TABLE2"])]
        junction: Option<Vec<String>>,

        #[arg(
            long,
            default_value_t = 0.0,
            allow_negative_numbers = true,
            value_parser = finite_coordinate
        )]
        x: f64,

        #[arg(
            long,
            default_value_t = 0.0,
            allow_negative_numbers = true,
            value_parser = finite_coordinate
        )]
        y: f64,
    },

    /// Update a table's fields
    Update {
        /// Table id
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        timestamps: Option<bool>,

        #[arg(long)]
        blameable: Option<bool>,

        #[arg(long)]
        hide_id: Option<bool>,
    },

    /// Remove a table and its edges
    Remove {
        /// Table id
        id: String,
    },

    /// Move a table on the canvas
    Move {
        /// Table id
        id: String,

        #[arg(allow_negative_numbers = true, value_parser = finite_coordinate)]
        x: f64,

        #[arg(allow_negative_numbers = true, value_parser = finite_coordinate)]
        y: f64,
    },
}

// ============================================================================
// Attribute subcommands
// ============================================================================

/// Type and parameters of an attribute
#[derive(Args, Debug, Clone, Default)]
pub struct TypeArgs {
    /// Type token (e.g. string, integer, decimal)
    #[arg(long = "type", short = 't')]
    pub type_token: Option<String>,

    #[arg(long)]
    pub length: Option<u32>,

    #[arg(long)]
    pub precision: Option<u32>,

    #[arg(long)]
    pub scale: Option<u32>,
}

impl TypeArgs {
    pub fn is_empty(&self) -> bool {
        self.type_token.is_none()
            && self.length.is_none()
            && self.precision.is_none()
            && self.scale.is_none()
    }
}

#[derive(Subcommand, Debug)]
pub enum AttrAction {
    /// Add an attribute to a table
    Add {
        /// Table id
        table: String,

        /// Attribute name
        name: String,

        #[command(flatten)]
        kind: TypeArgs,

        #[arg(long)]
        not_null: bool,

        #[arg(long)]
        unique: bool,

        #[arg(long)]
        primary_key: bool,

        #[arg(long)]
        unsigned: bool,

        /// Make the attribute a foreign key to this table id
        #[arg(long)]
        references: Option<String>,

        /// Referenced column name
        #[arg(long)]
        references_field: Option<String>,

        /// Default value; numbers are stored as numbers
        #[arg(long)]
        default: Option<String>,

        /// Explicit sort index
        #[arg(long, allow_negative_numbers = true)]
        sort: Option<i64>,
    },

    /// Update an attribute
    Update {
        /// Table id
        table: String,

        /// Attribute id
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[command(flatten)]
        kind: TypeArgs,

        #[arg(long)]
        not_null: Option<bool>,

        #[arg(long)]
        unique: Option<bool>,

        #[arg(long)]
        primary_key: Option<bool>,

        #[arg(long)]
        unsigned: Option<bool>,

        /// Point the foreign key at this table id
        #[arg(long, conflicts_with = "no_references")]
        references: Option<String>,

        /// Drop the foreign key
        #[arg(long)]
        no_references: bool,

        #[arg(long)]
        default: Option<String>,

        /// Remove the default value
        #[arg(long, conflicts_with = "default")]
        no_default: bool,
    },

    /// Remove an attribute and its edges
    Remove {
        /// Table id
        table: String,

        /// Attribute id
        id: String,
    },

    /// Move an attribute one step up or down
    Move {
        /// Table id
        table: String,

        /// Attribute id
        id: String,

        direction: DirectionArg,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum DirectionArg {
    Up,
    Down,
}

impl From<DirectionArg> for Direction {
    fn from(value: DirectionArg) -> Self {
        match value {
            DirectionArg::Up => Direction::Up,
            DirectionArg::Down => Direction::Down,
        }
    }
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

/// Canvas coordinates must be finite numbers
fn finite_coordinate(raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .parse()
        .map_err(|_| format!("'{}' is not a number", raw))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("'{}' is not a finite coordinate", raw))
    }
}
