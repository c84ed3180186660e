//! Durable key-value storage for serialized state.
//!
//! Values are opaque strings. `FileStorage` keeps one `<key>.json` file per key
//! in a data directory; `MemoryStorage` is a HashMap for tests and previews.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{CalGridError, CalGridResult};

/// A string key-value store.
pub trait KeyValueStorage {
    fn get(&self, key: &str) -> CalGridResult<Option<String>>;

    fn set(&mut self, key: &str, value: &str) -> CalGridResult<()>;

    fn remove(&mut self, key: &str) -> CalGridResult<()>;
}

/// Storage backed by a directory of JSON files.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Open storage rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> CalGridResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| {
            CalGridError::Storage(format!("Could not create {}: {e}", dir.display()))
        })?;
        Ok(FileStorage { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> CalGridResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(CalGridError::Storage(format!("Invalid storage key '{key}'")));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> CalGridResult<Option<String>> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Write via a temp file and rename, so a reader never sees half a value.
    fn set(&mut self, key: &str, value: &str) -> CalGridResult<()> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("json.tmp");

        std::fs::write(&tmp, value)
            .map_err(|e| CalGridError::Storage(format!("Could not write {}: {e}", tmp.display())))?;
        std::fs::rename(&tmp, &path)
            .map_err(|e| CalGridError::Storage(format!("Could not write {}: {e}", path.display())))?;

        Ok(())
    }

    fn remove(&mut self, key: &str) -> CalGridResult<()> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage preloaded with a single value.
    pub fn with_value(key: &str, value: impl Into<String>) -> Self {
        let mut storage = Self::new();
        storage.values.insert(key.to_string(), value.into());
        storage
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> CalGridResult<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> CalGridResult<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> CalGridResult<()> {
        self.values.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_storage_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::open(dir.path().join("data")).unwrap();

        assert_eq!(storage.get("calendar_events").unwrap(), None);

        storage.set("calendar_events", "[]").unwrap();
        assert_eq!(storage.get("calendar_events").unwrap().as_deref(), Some("[]"));
        assert!(dir.path().join("data/calendar_events.json").exists());
        assert!(!dir.path().join("data/calendar_events.json.tmp").exists());

        storage.remove("calendar_events").unwrap();
        assert_eq!(storage.get("calendar_events").unwrap(), None);
        storage.remove("calendar_events").unwrap();
    }

    #[test]
    fn test_file_storage_rejects_path_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::open(dir.path()).unwrap();
        assert!(storage.set("../escape", "x").is_err());
        assert!(storage.get("").is_err());
    }

    #[test]
    fn test_memory_storage() {
        let mut storage = MemoryStorage::with_value("a", "1");
        assert_eq!(storage.get("a").unwrap().as_deref(), Some("1"));
        storage.set("a", "2").unwrap();
        assert_eq!(storage.get("a").unwrap().as_deref(), Some("2"));
        storage.remove("a").unwrap();
        assert_eq!(storage.get("a").unwrap(), None);
    }
}
