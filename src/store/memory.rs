//! In-memory store, used for tests and `STORE_BACKEND=memory`.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::KeyValueStore;
use crate::error::Result;

// == Memory Store ==
/// HashMap-backed store. Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored keys.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns true if nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get_string(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set_string(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn list_keys(&self) -> Result<Vec<String>> {
        let mut keys: Vec<String> = self.entries.read().await.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }

    async fn remove_items(&self, keys: &[String]) -> Result<()> {
        let mut entries = self.entries.write().await;
        for key in keys {
            entries.remove(key);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_remove() {
        let store = MemoryStore::new();

        store.set_string("a", "1").await.unwrap();
        assert_eq!(store.get_string("a").await.unwrap().as_deref(), Some("1"));

        store.remove_item("a").await.unwrap();
        assert!(store.get_string("a").await.unwrap().is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_remove_missing_key_is_ok() {
        let store = MemoryStore::new();
        assert!(store.remove_item("ghost").await.is_ok());
        assert!(store.remove_items(&["ghost".to_string()]).await.is_ok());
    }

    #[tokio::test]
    async fn test_list_keys_sorted() {
        let store = MemoryStore::new();
        store.set_string("b", "2").await.unwrap();
        store.set_string("a", "1").await.unwrap();

        assert_eq!(store.list_keys().await.unwrap(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_remove_items_batch() {
        let store = MemoryStore::new();
        store.set_string("a", "1").await.unwrap();
        store.set_string("b", "2").await.unwrap();
        store.set_string("c", "3").await.unwrap();

        store
            .remove_items(&["a".to_string(), "c".to_string()])
            .await
            .unwrap();

        assert_eq!(store.len().await, 1);
        assert_eq!(store.get_string("b").await.unwrap().as_deref(), Some("2"));
    }
}
