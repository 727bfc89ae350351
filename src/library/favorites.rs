//! Saved defense compositions.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{load_json, save_json, try_load_json};
use crate::error::{CacheError, Result};
use crate::store::KeyValueStore;

/// Store key holding the favorites list
pub const FAVORITES_KEY: &str = "favorites";

// == Saved Composition ==
/// A three-monster defense the user bookmarked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedComposition {
    pub id: String,
    pub monsters: [String; 3],
    pub name: String,
    pub saved_at: DateTime<Utc>,
}

impl SavedComposition {
    /// Builds a composition saved now, named after its monsters when `name` is blank.
    pub fn new(id: impl Into<String>, monsters: [String; 3], name: Option<String>) -> Result<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(CacheError::InvalidRequest("Favorite id cannot be empty".to_string()));
        }
        if monsters.iter().any(|m| m.trim().is_empty()) {
            return Err(CacheError::InvalidRequest(
                "A composition needs exactly three monster names".to_string(),
            ));
        }

        let name = name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| monsters.join(", "));

        Ok(Self {
            id,
            monsters,
            name,
            saved_at: Utc::now(),
        })
    }
}

// == Favorites ==
/// Ordered list of saved compositions, newest first.
#[derive(Debug, Clone)]
pub struct Favorites {
    store: Arc<dyn KeyValueStore>,
}

impl Favorites {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Every saved composition; empty when nothing is stored or it is unreadable.
    pub async fn list(&self) -> Vec<SavedComposition> {
        load_json(self.store.as_ref(), FAVORITES_KEY)
            .await
            .unwrap_or_default()
    }

    async fn load_for_update(&self) -> Result<Vec<SavedComposition>> {
        Ok(try_load_json(self.store.as_ref(), FAVORITES_KEY)
            .await?
            .unwrap_or_default())
    }

    /// Saves `composition` at the front, replacing any entry with the same id.
    pub async fn add(&self, composition: SavedComposition) -> Result<Vec<SavedComposition>> {
        let mut favorites = self.load_for_update().await?;
        favorites.retain(|f| f.id != composition.id);

        info!(id = %composition.id, name = %composition.name, "Saving favorite");
        favorites.insert(0, composition);

        save_json(self.store.as_ref(), FAVORITES_KEY, &favorites).await?;
        Ok(favorites)
    }

    /// Removes the composition with `id`. Returns whether it existed.
    pub async fn remove(&self, id: &str) -> Result<bool> {
        let mut favorites = self.load_for_update().await?;
        let before = favorites.len();
        favorites.retain(|f| f.id != id);

        if favorites.len() == before {
            return Ok(false);
        }

        save_json(self.store.as_ref(), FAVORITES_KEY, &favorites).await?;
        info!(id, "Removed favorite");
        Ok(true)
    }

    pub async fn contains(&self, id: &str) -> bool {
        self.list().await.iter().any(|f| f.id == id)
    }

    pub async fn clear(&self) -> Result<()> {
        self.store.remove_item(FAVORITES_KEY).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::HiccupStore;
    use crate::store::MemoryStore;

    fn trio(a: &str, b: &str, c: &str) -> [String; 3] {
        [a.to_string(), b.to_string(), c.to_string()]
    }

    fn create_favorites() -> (Favorites, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (Favorites::new(store.clone()), store)
    }

    #[test]
    fn test_new_composition_defaults_name() {
        let comp = SavedComposition::new("1", trio("Susano", "Garo", "Orion"), None).unwrap();
        assert_eq!(comp.name, "Susano, Garo, Orion");

        let named = SavedComposition::new("2", trio("a", "b", "c"), Some("  GW def ".into())).unwrap();
        assert_eq!(named.name, "GW def");
    }

    #[test]
    fn test_new_composition_rejects_blank_monster() {
        assert!(SavedComposition::new("1", trio("Susano", " ", "Orion"), None).is_err());
        assert!(SavedComposition::new("", trio("a", "b", "c"), None).is_err());
    }

    #[test]
    fn test_wire_format_is_camel_case() {
        let comp = SavedComposition::new("1", trio("a", "b", "c"), None).unwrap();
        let json = serde_json::to_value(&comp).unwrap();
        assert!(json.get("savedAt").is_some());
        assert_eq!(json["monsters"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_add_puts_newest_first() {
        let (favorites, _store) = create_favorites();

        favorites.add(SavedComposition::new("1", trio("a", "b", "c"), None).unwrap()).await.unwrap();
        favorites.add(SavedComposition::new("2", trio("d", "e", "f"), None).unwrap()).await.unwrap();

        let ids: Vec<_> = favorites.list().await.into_iter().map(|f| f.id).collect();
        assert_eq!(ids, vec!["2", "1"]);
    }

    #[tokio::test]
    async fn test_add_same_id_replaces() {
        let (favorites, _store) = create_favorites();

        favorites.add(SavedComposition::new("1", trio("a", "b", "c"), None).unwrap()).await.unwrap();
        favorites.add(SavedComposition::new("2", trio("d", "e", "f"), None).unwrap()).await.unwrap();
        let list = favorites
            .add(SavedComposition::new("1", trio("x", "y", "z"), None).unwrap())
            .await
            .unwrap();

        assert_eq!(list.len(), 2);
        assert_eq!(list[0].id, "1");
        assert_eq!(list[0].monsters, trio("x", "y", "z"));
    }

    #[tokio::test]
    async fn test_remove() {
        let (favorites, _store) = create_favorites();
        favorites.add(SavedComposition::new("1", trio("a", "b", "c"), None).unwrap()).await.unwrap();

        assert!(favorites.remove("1").await.unwrap());
        assert!(!favorites.remove("1").await.unwrap());
        assert!(!favorites.contains("1").await);
    }

    #[tokio::test]
    async fn test_unreadable_blob_lists_empty() {
        let (favorites, store) = create_favorites();
        store.set_string(FAVORITES_KEY, "not json").await.unwrap();

        assert!(favorites.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_clear() {
        let (favorites, store) = create_favorites();
        favorites.add(SavedComposition::new("1", trio("a", "b", "c"), None).unwrap()).await.unwrap();

        favorites.clear().await.unwrap();

        assert!(store.get_string(FAVORITES_KEY).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_failed_read_never_overwrites_favorites() {
        let store = Arc::new(HiccupStore::default());
        let favorites = Favorites::new(store.clone());
        for id in ["1", "2", "3"] {
            favorites.add(SavedComposition::new(id, trio("a", "b", "c"), None).unwrap()).await.unwrap();
        }

        store.fail_next_reads(1);
        let added = favorites
            .add(SavedComposition::new("new", trio("d", "e", "f"), None).unwrap())
            .await;
        assert!(added.is_err());

        store.fail_next_reads(1);
        assert!(favorites.remove("1").await.is_err());

        let ids: Vec<_> = favorites.list().await.into_iter().map(|f| f.id).collect();
        assert_eq!(ids, vec!["3", "2", "1"]);
    }
}
