//! Durable storage backends
//!
//! A backend is a set of named slots, each holding one serialized value. The
//! collection store uses a single slot and overwrites it wholesale.

use crate::CollectionError;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

/// Named-slot storage used to persist collection snapshots
pub trait SnapshotStorage {
    /// Read a slot; `None` if it was never written
    fn read(&self, key: &str) -> Result<Option<String>, CollectionError>;

    /// Overwrite a slot
    fn write(&self, key: &str, value: &str) -> Result<(), CollectionError>;

    /// Delete a slot; no-op if absent
    fn remove(&self, key: &str) -> Result<(), CollectionError>;
}

/// One JSON file per slot inside a data directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Use `dir` for slot files; created on first write
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing a slot
    pub fn slot_path(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{}.json", name))
    }
}

impl SnapshotStorage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, CollectionError> {
        match fs::read_to_string(self.slot_path(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), CollectionError> {
        fs::create_dir_all(&self.dir)?;

        // Write aside then rename; the slot is never left truncated
        let path = self.slot_path(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;

        tracing::debug!("Wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CollectionError> {
        match fs::remove_file(self.slot_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process storage; clones share the same slots
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slots: Arc<RwLock<HashMap<String, String>>>,
    unavailable: Arc<AtomicBool>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every operation fail, as if storage were full or disabled
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Raw slot contents
    pub fn get(&self, key: &str) -> Option<String> {
        self.slots.read().ok()?.get(key).cloned()
    }

    /// Put raw contents into a slot, bypassing availability
    pub fn insert(&self, key: &str, value: impl Into<String>) {
        if let Ok(mut slots) = self.slots.write() {
            slots.insert(key.to_string(), value.into());
        }
    }

    fn check_available(&self) -> Result<(), CollectionError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(CollectionError::Storage("storage unavailable".to_string()));
        }
        Ok(())
    }
}

impl SnapshotStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, CollectionError> {
        self.check_available()?;
        let slots = self
            .slots
            .read()
            .map_err(|e| CollectionError::Storage(e.to_string()))?;
        Ok(slots.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), CollectionError> {
        self.check_available()?;
        let mut slots = self
            .slots
            .write()
            .map_err(|e| CollectionError::Storage(e.to_string()))?;
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CollectionError> {
        self.check_available()?;
        let mut slots = self
            .slots
            .write()
            .map_err(|e| CollectionError::Storage(e.to_string()))?;
        slots.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_storage_missing_slot() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path().join("data"));
        assert_eq!(storage.read("gamesinfo-storage").unwrap(), None);
        storage.remove("gamesinfo-storage").unwrap();
    }

    #[test]
    fn test_file_storage_write_read() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path().join("data"));

        storage.write("gamesinfo-storage", "{}").unwrap();
        storage.write("gamesinfo-storage", r#"{"version":1}"#).unwrap();

        assert_eq!(
            storage.read("gamesinfo-storage").unwrap().as_deref(),
            Some(r#"{"version":1}"#)
        );
        assert!(!storage.slot_path("gamesinfo-storage").with_extension("json.tmp").exists());
    }

    #[test]
    fn test_file_storage_sanitizes_key() {
        let storage = FileStorage::new("/tmp/x");
        let path = storage.slot_path("../evil/key");
        assert_eq!(path, PathBuf::from("/tmp/x/.._evil_key.json"));
    }

    #[test]
    fn test_memory_storage_shared_between_clones() {
        let storage = MemoryStorage::new();
        let other = storage.clone();

        storage.write("slot", "value").unwrap();
        assert_eq!(other.read("slot").unwrap().as_deref(), Some("value"));

        other.remove("slot").unwrap();
        assert_eq!(storage.get("slot"), None);
    }

    #[test]
    fn test_memory_storage_unavailable() {
        let storage = MemoryStorage::new();
        storage.set_unavailable(true);

        assert!(storage.write("slot", "value").is_err());
        assert!(storage.read("slot").is_err());

        storage.set_unavailable(false);
        assert_eq!(storage.read("slot").unwrap(), None);
    }
}
