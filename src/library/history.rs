//! Recent search queries.

use std::sync::Arc;

use super::{load_json, save_json, try_load_json};
use crate::error::Result;
use crate::store::KeyValueStore;

/// Store key holding the search history
pub const HISTORY_KEY: &str = "search_history";

/// Number of queries kept by default
pub const DEFAULT_HISTORY_LIMIT: usize = 20;

// == Search History ==
/// Most-recent-first list of distinct queries, capped at `limit`.
#[derive(Debug, Clone)]
pub struct SearchHistory {
    store: Arc<dyn KeyValueStore>,
    limit: usize,
}

impl SearchHistory {
    pub fn new(store: Arc<dyn KeyValueStore>, limit: usize) -> Self {
        Self {
            store,
            limit: limit.max(1),
        }
    }

    pub async fn list(&self) -> Vec<String> {
        load_json(self.store.as_ref(), HISTORY_KEY)
            .await
            .unwrap_or_default()
    }

    /// Moves `query` to the front. Blank queries are ignored.
    ///
    /// # Arguments
    /// * `query` - Raw query text, trimmed before storing
    pub async fn record(&self, query: &str) -> Result<Vec<String>> {
        let query = query.trim();
        let mut history: Vec<String> = try_load_json(self.store.as_ref(), HISTORY_KEY)
            .await?
            .unwrap_or_default();
        if query.is_empty() {
            return Ok(history);
        }

        history.retain(|q| q != query);
        history.insert(0, query.to_string());
        history.truncate(self.limit);

        save_json(self.store.as_ref(), HISTORY_KEY, &history).await?;
        Ok(history)
    }

    pub async fn clear(&self) -> Result<()> {
        self.store.remove_item(HISTORY_KEY).await
    }
}
