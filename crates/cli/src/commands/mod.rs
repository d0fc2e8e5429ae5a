//! Command dispatch
//!
//! Every invocation opens the file-backed store, runs one command against it
//! and flushes whatever the command changed.

mod attr;
mod compile;
mod diagram;
mod table;

use crate::args::{Cli, Command};
use anyhow::Context;
use schemaforge_core::{EngineError, EngineResult};
use schemaforge_ir::{Attribute, FileStorage, SchemaStore, StoreConfig};
use std::io::Write;

pub(crate) type Store = SchemaStore<FileStorage>;

/// Run a parsed command line, writing human output to `out`
pub fn run(cli: Cli, out: &mut dyn Write) -> anyhow::Result<()> {
    if cli.no_color {
        colored::control::set_override(false);
    }

    let config = StoreConfig::new().with_key(&cli.key);
    let mut store = SchemaStore::with_config(FileStorage::new(&cli.store), config);
    tracing::debug!(store = %cli.store.display(), key = %cli.key, "opened diagram store");

    match cli.command {
        Command::New { name } => diagram::new(&mut store, &name, out)?,
        Command::Import { file } => diagram::import(&mut store, &file, out)?,
        Command::Export { output, compact } => {
            diagram::export(&store, output.as_deref(), compact, out)?
        }
        Command::Info => diagram::info(&store, out)?,
        Command::Types => diagram::types(out)?,
        Command::Compile { table, show_id } => {
            compile::compile(&store, table.as_deref(), show_id, out)?
        }
        Command::Validate => compile::validate(&store, out)?,
        Command::Rename { name } => diagram::rename(&mut store, &name, out)?,
        Command::Table { action } => table::run(&mut store, action, out)?,
        Command::Attr { action } => attr::run(&mut store, action, out)?,
    }

    store
        .flush()
        .with_context(|| format!("failed to save diagram to {}", cli.store.display()))?;
    Ok(())
}

pub(crate) fn require_table(store: &Store, id: &str) -> EngineResult<()> {
    match store.schema().table(id) {
        Some(_) => Ok(()),
        None => Err(EngineError::TableNotFound(id.to_string())),
    }
}

pub(crate) fn require_attribute(
    store: &Store,
    table_id: &str,
    attribute_id: &str,
) -> EngineResult<Attribute> {
    require_table(store, table_id)?;
    store
        .schema()
        .attribute(table_id, attribute_id)
        .cloned()
        .ok_or_else(|| EngineError::AttributeNotFound {
            table: table_id.to_string(),
            attribute: attribute_id.to_string(),
        })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use schemaforge_ir::{DEFAULT_STORAGE_KEY, StoragePort};
    use tempfile::TempDir;

    struct Session {
        dir: TempDir,
    }

    impl Session {
        fn new() -> Self {
            Self {
                dir: TempDir::new().unwrap(),
            }
        }

        fn store_dir(&self) -> String {
            self.dir.path().join("store").display().to_string()
        }

        fn try_run(&self, args: &[&str]) -> anyhow::Result<String> {
            let store = self.store_dir();
            let mut argv = vec!["schemaforge", "--store", store.as_str(), "--no-color"];
            argv.extend_from_slice(args);
            let cli = Cli::try_parse_from(argv)?;
            let mut out = Vec::new();
            run(cli, &mut out)?;
            Ok(String::from_utf8(out)?)
        }

        fn run(&self, args: &[&str]) -> String {
            self.try_run(args).unwrap()
        }

        fn stored(&self) -> serde_json::Value {
            let storage = FileStorage::new(self.dir.path().join("store"));
            let json = storage.get(DEFAULT_STORAGE_KEY).unwrap().unwrap();
            serde_json::from_str(&json).unwrap()
        }
    }

    fn blog() -> Session {
        let session = Session::new();
        session.run(&["new", "Blog"]);
        session.run(&["table", "add", "users", "--timestamps"]);
        session.run(&["table", "add", "posts"]);
        session.run(&[
            "attr", "add", "users", "username", "--type", "string", "--length", "50", "--not-null",
        ]);
        session.run(&[
            "attr", "add", "posts", "user_id", "--type", "integer", "--references", "users",
        ]);
        session
    }

    #[test]
    fn test_new_and_rename_persist() {
        let session = Session::new();
        session.run(&["new", "Shop"]);
        session.run(&["rename", "Shop DB"]);
        assert_eq!(session.stored()["name"], "Shop DB");
    }

    #[test]
    fn test_table_and_attribute_commands() {
        let session = blog();
        let stored = session.stored();
        assert_eq!(stored["nodes"].as_array().unwrap().len(), 2);
        assert_eq!(stored["edges"][0]["sourceHandle"], "posts-user_id");

        let out = session.run(&["compile", "--table", "users"]);
        assert_eq!(
            out.trim(),
            r#"php yii migrate/create create_users_table --fields="created_at:integer:notNull:unsigned,updated_at:integer:notNull:unsigned,username:string(50):notNull""#
        );
    }

    #[test]
    fn test_compile_all_with_show_id() {
        let session = blog();
        let out = session.run(&["compile", "--show-id"]);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[1],
            r#"php yii migrate/create create_posts_table --fields="id:primaryKey,user_id:integer:foreignKey(users)""#
        );
    }

    #[test]
    fn test_attribute_move_and_update() {
        let session = blog();
        session.run(&["attr", "move", "users", "users-username", "up"]);
        session.run(&[
            "attr", "update", "users", "users-username", "--length", "80", "--unique", "true",
        ]);
        session.run(&["attr", "update", "posts", "posts-user_id", "--no-references"]);

        let out = session.run(&["compile", "--table", "users"]);
        assert!(out.contains(
            r#"--fields="created_at:integer:notNull:unsigned,username:string(80):notNull:unique,updated_at"#
        ));
        assert_eq!(session.stored()["edges"], serde_json::json!([]));
    }

    #[test]
    fn test_remove_table_cascades() {
        let session = blog();
        session.run(&["table", "remove", "users"]);
        let stored = session.stored();
        assert_eq!(stored["nodes"].as_array().unwrap().len(), 1);
        assert_eq!(stored["edges"], serde_json::json!([]));
    }

    #[test]
    fn test_junction_table() {
        let session = blog();
        session.run(&["table", "add", "post_tags", "--junction", "posts", "users"]);
        let out = session.run(&["compile", "--table", "post_tags"]);
        assert_eq!(
            out.trim(),
            "php yii migrate/create create_junction_table_for_posts_and_users_tables"
        );
    }

    #[test]
    fn test_unknown_ids_are_errors() {
        let session = blog();
        let err = session.try_run(&["table", "remove", "comments"]).unwrap_err();
        assert!(err.to_string().contains("Table not found"));

        let err = session
            .try_run(&["attr", "remove", "users", "users-missing"])
            .unwrap_err();
        assert!(err.to_string().contains("users-missing"));

        let err = session.try_run(&["table", "add", "Users"]).unwrap_err();
        assert!(err.to_string().contains("Duplicate table"));
    }

    #[test]
    fn test_move_rejects_non_finite_coordinates() {
        let session = blog();
        let before = session.stored();
        assert!(session.try_run(&["table", "move", "users", "NaN", "0"]).is_err());
        assert!(session.try_run(&["table", "move", "users", "0", "inf"]).is_err());
        assert_eq!(session.stored(), before);

        session.run(&["table", "move", "users", "-12.5", "40"]);
        let out = session.run(&["info"]);
        assert!(out.contains("Tables: 2"));
    }

    #[test]
    fn test_export_and_import() {
        let session = blog();
        let target = session.dir.path().to_path_buf();
        let out = session.run(&["export", "--output", target.to_str().unwrap()]);
        assert!(out.contains("blog.json"));

        let other = Session::new();
        let file = target.join("blog.json");
        let out = other.run(&["import", file.to_str().unwrap()]);
        assert!(out.contains("Imported 'Blog' (2 tables, 6 attributes, 1 relationships)"));
        assert_eq!(other.stored(), session.stored());
    }

    #[test]
    fn test_import_rejects_bad_outline() {
        let session = blog();
        let file = session.dir.path().join("bad.json");
        std::fs::write(&file, r#"{"name": "x", "nodes": {}}"#).unwrap();
        let err = session.try_run(&["import", file.to_str().unwrap()]).unwrap_err();
        assert!(err.to_string().contains("Invalid diagram structure"));
        assert_eq!(session.stored()["name"], "Blog");
    }

    #[test]
    fn test_validate() {
        let session = blog();
        let out = session.run(&["validate"]);
        assert!(out.contains("Diagram is valid"));

        session.run(&["attr", "add", "posts", "bad name"]);
        let err = session.try_run(&["validate"]).unwrap_err();
        assert!(err.to_string().contains("1 error"));
    }

    #[test]
    fn test_info_and_types() {
        let session = blog();
        let out = session.run(&["info"]);
        assert!(out.contains("Blog"));
        assert!(out.contains("Relationships: 1"));
        assert!(out.contains("posts-user_id -> users-id (user)"));

        let out = session.run(&["types"]);
        assert!(out.contains("precision, scale: decimal, money"));
    }

    #[test]
    fn test_export_to_stdout() {
        let session = blog();
        let out = session.run(&["export", "--compact"]);
        let value: serde_json::Value = serde_json::from_str(out.trim()).unwrap();
        assert_eq!(value, session.stored());
    }
}
