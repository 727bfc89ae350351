//! User Library Module
//!
//! User-authored data kept outside the expiring cache: favorites, search
//! history, overlay settings and the local analytics log. Each lives under a single key as one JSON
//! blob. Reads degrade to empty/default values; writes report errors.

mod analytics;
mod favorites;
mod history;
mod overlay;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::error::Result;
use crate::store::KeyValueStore;

pub use analytics::{
    Analytics, AnalyticsEvent, AnalyticsReport, ANALYTICS_KEY, MAX_ANALYTICS_EVENTS,
    REPORT_RECENT_EVENTS,
};
pub use favorites::{Favorites, SavedComposition, FAVORITES_KEY};
pub use history::{SearchHistory, DEFAULT_HISTORY_LIMIT, HISTORY_KEY};
pub use overlay::{OverlaySettings, OverlayState, OVERLAY_KEY};

/// Reads the JSON blob under `key`, `None` on absence or any failure.
async fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    match try_load_json(store, key).await {
        Ok(value) => value,
        Err(e) => {
            warn!(key, error = %e, "Failed to read stored value");
            None
        }
    }
}

/// Reads the JSON blob under `key` for a read-modify-write.
///
/// Store errors are returned so the caller never overwrites data it could not
/// read. An unparseable blob is reported as absent.
async fn try_load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>> {
    let Some(raw) = store.get_string(key).await? else {
        return Ok(None);
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            warn!(key, error = %e, "Ignoring unreadable stored value");
            Ok(None)
        }
    }
}

async fn save_json<T: Serialize + ?Sized>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<()> {
    let json = serde_json::to_string(value)?;
    store.set_string(key, &json).await
}

// == Clear User Data ==
/// Removes favorites and search history in one batch.
pub async fn clear_user_data(store: &Arc<dyn KeyValueStore>) -> Result<()> {
    store
        .remove_items(&[FAVORITES_KEY.to_string(), HISTORY_KEY.to_string()])
        .await
}

/// Store that fails the next `get_string` calls, then behaves like `MemoryStore`.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct HiccupStore {
    inner: crate::store::MemoryStore,
    failing_reads: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl HiccupStore {
    pub(crate) fn fail_next_reads(&self, count: usize) {
        self.failing_reads
            .store(count, std::sync::atomic::Ordering::SeqCst);
    }
}

#[cfg(test)]
#[async_trait::async_trait]
impl KeyValueStore for HiccupStore {
    async fn get_string(&self, key: &str) -> Result<Option<String>> {
        use std::sync::atomic::Ordering;
        let failing = self
            .failing_reads
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        if failing.is_ok() {
            return Err(crate::error::CacheError::Storage("read timed out".into()));
        }
        self.inner.get_string(key).await
    }
    async fn set_string(&self, key: &str, value: &str) -> Result<()> {
        self.inner.set_string(key, value).await
    }
    async fn remove_item(&self, key: &str) -> Result<()> {
        self.inner.remove_item(key).await
    }
    async fn list_keys(&self) -> Result<Vec<String>> {
        self.inner.list_keys().await
    }
    async fn remove_items(&self, keys: &[String]) -> Result<()> {
        self.inner.remove_items(keys).await
    }
}
