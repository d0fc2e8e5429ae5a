//! Persistence port implementations
//!
//! [`MemoryStorage`] keeps values in a map and is what tests use.
//! [`FileStorage`] keeps one `{key}.json` file per key under a directory.

use schemaforge_core::{EngineError, EngineResult, StoragePort};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

// ============================================================================
// MemoryStorage
// ============================================================================

/// In-memory key-value storage
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-populated with one value
    pub fn with_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut storage = Self::new();
        storage.values.insert(key.into(), value.into());
        storage
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl StoragePort for MemoryStorage {
    fn get(&self, key: &str) -> EngineResult<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> EngineResult<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ============================================================================
// FileStorage
// ============================================================================

/// Directory-backed storage, one file per key
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Storage rooted at `root`. The directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File backing `key`. Characters other than letters, digits, `-` and `_`
    /// are replaced by `_`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let file: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.root.join(format!("{}.json", file))
    }
}

impl StoragePort for FileStorage {
    fn get(&self, key: &str) -> EngineResult<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        std::fs::read_to_string(&path)
            .map(Some)
            .map_err(|e| EngineError::storage(key, format!("{}: {}", path.display(), e)))
    }

    fn set(&mut self, key: &str, value: &str) -> EngineResult<()> {
        std::fs::create_dir_all(&self.root)
            .map_err(|e| EngineError::storage(key, format!("{}: {}", self.root.display(), e)))?;
        let path = self.path_for(key);
        std::fs::write(&path, value)
            .map_err(|e| EngineError::storage(key, format!("{}: {}", path.display(), e)))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_storage() {
        let mut storage = MemoryStorage::new();
        assert!(storage.is_empty());
        assert_eq!(storage.get("a").unwrap(), None);

        storage.set("a", "1").unwrap();
        storage.set("a", "2").unwrap();
        assert_eq!(storage.get("a").unwrap().as_deref(), Some("2"));
        assert_eq!(storage.len(), 1);
    }

    #[test]
    fn test_file_storage_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut storage = FileStorage::new(dir.path().join("store"));
        assert_eq!(storage.get("diagram").unwrap(), None);

        storage.set("diagram", "{}").unwrap();
        assert!(dir.path().join("store").join("diagram.json").exists());
        assert_eq!(storage.get("diagram").unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn test_file_storage_sanitizes_keys() {
        let storage = FileStorage::new("/tmp/x");
        assert_eq!(
            storage.path_for("../my key"),
            PathBuf::from("/tmp/x/___my_key.json")
        );
    }

    #[test]
    fn test_file_storage_write_failure() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "file, not a directory").unwrap();

        let mut storage = FileStorage::new(&blocker);
        let err = storage.set("diagram", "{}").unwrap_err();
        assert!(matches!(err, EngineError::Storage { ref key, .. } if key == "diagram"));
    }
}
