//! JSON file store
//!
//! Persists the whole key space as one JSON object. The file is read lazily on
//! first access and rewritten (temp file + rename) after every mutation. An
//! unparseable file is moved aside to `store.json.corrupt` and the store starts
//! empty.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::KeyValueStore;
use crate::error::Result;

/// File name used inside the data directory.
pub const STORE_FILE_NAME: &str = "store.json";

type Entries = BTreeMap<String, String>;

// == File Store ==
/// Durable store backed by a single JSON file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    /// `None` until the file has been loaded
    entries: Mutex<Option<Entries>>,
}

impl FileStore {
    /// Creates a store persisting to `path`. Nothing is read until first use.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: Mutex::new(None),
        }
    }

    /// Creates a store persisting to `<dir>/store.json`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(STORE_FILE_NAME))
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Entries> {
        match fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(Entries::new()),
            Ok(content) => match serde_json::from_str(&content) {
                Ok(entries) => Ok(entries),
                Err(e) => {
                    self.quarantine(&e).await;
                    Ok(Entries::new())
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No store file at {}, starting empty", self.path.display());
                Ok(Entries::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Moves an unreadable store file out of the way so writes can resume.
    async fn quarantine(&self, error: &serde_json::Error) {
        let aside = self.corrupt_path();
        match fs::rename(&self.path, &aside).await {
            Ok(()) => warn!(
                error = %error,
                moved_to = %aside.display(),
                "Corrupt store file moved aside, starting empty"
            ),
            Err(e) => warn!(
                error = %error,
                rename_error = %e,
                "Corrupt store file could not be moved aside, starting empty"
            ),
        }
    }

    /// Path an unreadable store file is moved to.
    pub fn corrupt_path(&self) -> PathBuf {
        self.path.with_extension("json.corrupt")
    }

    async fn persist(&self, entries: &Entries) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let json = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Runs `f` against the loaded entries, loading them first if needed.
    async fn with_entries<R>(&self, f: impl FnOnce(&mut Entries) -> R) -> Result<R> {
        let mut guard = self.entries.lock().await;
        if guard.is_none() {
            *guard = Some(self.load().await?);
        }
        let entries = guard.get_or_insert_with(Entries::new);
        Ok(f(entries))
    }

    /// Applies `f` to a copy of the entries and writes the file if `f` reports
    /// a change. The copy replaces the loaded entries only once it is on disk.
    async fn mutate(&self, f: impl FnOnce(&mut Entries) -> bool) -> Result<()> {
        let mut guard = self.entries.lock().await;
        if guard.is_none() {
            *guard = Some(self.load().await?);
        }

        let mut next = guard.clone().unwrap_or_default();
        if f(&mut next) {
            self.persist(&next).await?;
            *guard = Some(next);
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get_string(&self, key: &str) -> Result<Option<String>> {
        self.with_entries(|entries| entries.get(key).cloned()).await
    }

    async fn set_string(&self, key: &str, value: &str) -> Result<()> {
        self.mutate(|entries| {
            entries.insert(key.to_string(), value.to_string());
            true
        })
        .await
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        self.mutate(|entries| entries.remove(key).is_some()).await
    }

    async fn list_keys(&self) -> Result<Vec<String>> {
        self.with_entries(|entries| entries.keys().cloned().collect())
            .await
    }

    async fn remove_items(&self, keys: &[String]) -> Result<()> {
        self.mutate(|entries| {
            let before = entries.len();
            for key in keys {
                entries.remove(key);
            }
            entries.len() != before
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CacheError;
    use tempfile::TempDir;

    fn create_test_store() -> (FileStore, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = FileStore::in_dir(temp_dir.path());
        (store, temp_dir)
    }

    #[tokio::test]
    async fn test_missing_file_reads_as_empty() {
        let (store, _temp_dir) = create_test_store();

        assert!(store.get_string("anything").await.unwrap().is_none());
        assert!(store.list_keys().await.unwrap().is_empty());
        assert!(!store.path().exists(), "Reads must not create the file");
    }

    #[tokio::test]
    async fn test_values_survive_new_instance() {
        let (store, temp_dir) = create_test_store();
        store.set_string("favorites", "[]").await.unwrap();
        store.set_string("swgt_cache_a", "{}").await.unwrap();

        let reopened = FileStore::in_dir(temp_dir.path());
        assert_eq!(
            reopened.get_string("favorites").await.unwrap().as_deref(),
            Some("[]")
        );
        assert_eq!(reopened.list_keys().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_creates_nested_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("nested").join("data");
        let store = FileStore::in_dir(&nested);

        store.set_string("k", "v").await.unwrap();

        assert!(nested.join(STORE_FILE_NAME).exists());
    }

    #[tokio::test]
    async fn test_remove_items_persists() {
        let (store, temp_dir) = create_test_store();
        store.set_string("a", "1").await.unwrap();
        store.set_string("b", "2").await.unwrap();

        store
            .remove_items(&["a".to_string(), "missing".to_string()])
            .await
            .unwrap();

        let reopened = FileStore::in_dir(temp_dir.path());
        assert_eq!(reopened.list_keys().await.unwrap(), vec!["b"]);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_moved_aside_and_store_recovers() {
        let (store, temp_dir) = create_test_store();
        std::fs::write(store.path(), "{truncated").unwrap();

        assert!(store.get_string("a").await.unwrap().is_none());
        store.set_string("a", "1").await.unwrap();

        let aside = std::fs::read_to_string(store.corrupt_path()).unwrap();
        assert_eq!(aside, "{truncated");

        let reopened = FileStore::in_dir(temp_dir.path());
        assert_eq!(reopened.get_string("a").await.unwrap().as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn test_failed_persist_leaves_entries_unchanged() {
        let (store, _temp_dir) = create_test_store();
        store.set_string("a", "1").await.unwrap();

        // A directory in the temp file's place makes the write fail
        std::fs::create_dir(store.path().with_extension("json.tmp")).unwrap();
        let result = store.set_string("b", "2").await;

        assert!(matches!(result, Err(CacheError::Storage(_))));
        assert!(store.get_string("b").await.unwrap().is_none());
        assert_eq!(store.list_keys().await.unwrap(), vec!["a"]);
    }
}
