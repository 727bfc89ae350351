//! Backing Store Module
//!
//! Opaque persistent string store the cache and the user library sit on.
//! Implementations own durability; namespacing is layered on top by callers.

mod file;
mod memory;

use std::fmt;

use async_trait::async_trait;

use crate::error::Result;

pub use file::FileStore;
pub use memory::MemoryStore;

// == Key-Value Store ==
/// Asynchronous string key-value store.
///
/// Removing a key that does not exist is not an error.
#[async_trait]
pub trait KeyValueStore: Send + Sync + fmt::Debug {
    /// Returns the raw string stored under `key`, if any.
    async fn get_string(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set_string(&self, key: &str, value: &str) -> Result<()>;

    /// Removes a single key.
    async fn remove_item(&self, key: &str) -> Result<()>;

    /// Lists every key currently stored.
    async fn list_keys(&self) -> Result<Vec<String>>;

    /// Removes a batch of keys in one operation.
    async fn remove_items(&self, keys: &[String]) -> Result<()>;
}
