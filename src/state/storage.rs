//! Key-value storage backends
//!
//! The host app and the backup controller share one flat string store, the
//! way a page shares its local storage. Last writer wins; there is no
//! coordination beyond that.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::error::{BackupError, Result};

/// A flat string-to-string store.
pub trait KeyValueStore {
    /// Read a value. Missing keys are `Ok(None)`.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any existing one.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Delete a key. Deleting a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<()>;

    /// All keys currently stored, sorted.
    fn keys(&self) -> Vec<String>;
}

/// In-memory store with an optional size quota.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
    quota_bytes: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that rejects writes once keys plus values exceed `quota_bytes`.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: BTreeMap::new(),
            quota_bytes: Some(quota_bytes),
        }
    }

    /// Total bytes used by keys and values.
    pub fn used_bytes(&self) -> usize {
        self.entries.iter().map(|(k, v)| k.len() + v.len()).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if let Some(quota) = self.quota_bytes {
            let existing = self.entries.get(key).map(|v| key.len() + v.len()).unwrap_or(0);
            let needed = self.used_bytes() - existing + key.len() + value.len();
            if needed > quota {
                return Err(BackupError::QuotaExceeded {
                    key: key.to_string(),
                    needed_bytes: needed,
                    quota_bytes: quota,
                });
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }
}

/// A store persisted as a single JSON object file.
///
/// Nothing is cached: every read loads the file and every mutation loads it,
/// changes the one key and writes it back. Another process writing other keys
/// between two calls is seen by the next call and never overwritten.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Open a store file, starting empty if it does not exist yet. An
    /// existing file must hold a JSON object of strings.
    pub fn open(path: &Path) -> Result<Self> {
        let store = Self {
            path: path.to_path_buf(),
        };
        let entries = store.load()?;
        debug!("Opened store {} ({} keys)", path.display(), entries.len());
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| BackupError::StoreReadError {
            path: self.path.clone(),
            source: e,
        })?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&content).map_err(|_| BackupError::InvalidStoreFile {
            path: self.path.clone(),
        })
    }

    fn write(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| BackupError::StoreWriteError {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        let content = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, content).map_err(|e| BackupError::StoreWriteError {
            path: self.path.clone(),
            source: e,
        })
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value.to_string());
        self.write(&entries)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let mut entries = self.load()?;
        if entries.remove(key).is_some() {
            self.write(&entries)?;
        }
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        match self.load() {
            Ok(entries) => entries.into_keys().collect(),
            Err(e) => {
                warn!("Could not list keys in {}: {}", self.path.display(), e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_memory_store_set_get_remove() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("a").unwrap(), None);

        store.set("a", "1").unwrap();
        store.set("a", "2").unwrap();
        assert_eq!(store.get("a").unwrap(), Some("2".to_string()));
        assert_eq!(store.len(), 1);

        store.remove("a").unwrap();
        store.remove("a").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_memory_store_quota() {
        let mut store = MemoryStore::with_quota(10);
        store.set("key", "12345").unwrap();
        // Overwriting counts only the replacement size
        store.set("key", "1234567").unwrap();

        let err = store.set("other", "x").unwrap_err();
        assert_eq!(err.error_code(), "QUOTA_EXCEEDED");
        assert_eq!(store.get("other").unwrap(), None);
        assert_eq!(store.get("key").unwrap(), Some("1234567".to_string()));
    }

    #[test]
    fn test_file_store_nonexistent_starts_empty() {
        let temp = tempdir().unwrap();
        let store = FileStore::open(&temp.path().join("storage.json")).unwrap();
        assert!(store.keys().is_empty());
    }

    #[test]
    fn test_file_store_persists_across_opens() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("nested").join("storage.json");

        let mut store = FileStore::open(&path).unwrap();
        store.set("eliteWorkoutState", r#"{"isActive":true}"#).unwrap();
        store.set("eliteWorkoutDate", "Sun Oct 18 2026").unwrap();
        store.remove("eliteWorkoutDate").unwrap();

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(
            reopened.get("eliteWorkoutState").unwrap(),
            Some(r#"{"isActive":true}"#.to_string())
        );
        assert_eq!(reopened.keys(), vec!["eliteWorkoutState".to_string()]);
    }

    #[test]
    fn test_file_store_rejects_non_object() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("storage.json");
        fs::write(&path, "[1, 2, 3]").unwrap();

        let err = FileStore::open(&path).unwrap_err();
        assert!(matches!(err, BackupError::InvalidStoreFile { .. }));
    }

    #[test]
    fn test_file_store_handles_see_each_others_writes() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("storage.json");

        let mut watcher = FileStore::open(&path).unwrap();
        watcher.set("eliteWorkoutState", "running").unwrap();

        let mut host = FileStore::open(&path).unwrap();
        host.set("eliteWorkoutState", "paused").unwrap();
        host.set("eliteWorkoutDate", "Sun Oct 18 2026").unwrap();

        assert_eq!(
            watcher.get("eliteWorkoutState").unwrap(),
            Some("paused".to_string())
        );

        // Writing one key leaves the other handle's keys alone
        watcher.set("eliteTimerBackup", "{}").unwrap();
        assert_eq!(host.get("eliteWorkoutState").unwrap(), Some("paused".to_string()));
        assert_eq!(
            host.keys(),
            vec![
                "eliteTimerBackup".to_string(),
                "eliteWorkoutDate".to_string(),
                "eliteWorkoutState".to_string(),
            ]
        );

        host.remove("eliteWorkoutDate").unwrap();
        assert_eq!(watcher.get("eliteWorkoutDate").unwrap(), None);
    }
}
