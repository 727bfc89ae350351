//! Cached swgt client
//!
//! Every read goes through the refresh orchestration of the cache, so a
//! failing source degrades to stale or empty results instead of errors.

use std::sync::Arc;

use tracing::{info, warn};

use super::models::{Defense, DefenseQuery, Monster, MonsterCounter, TrendingDefense, VoteDirection};
use super::source::DefenseSource;
use crate::cache::{CacheStats, ExpiringCache, Lookup, MaxAge};

const TRENDING_KEY: &str = "trending_defenses";

// == Swgt Client ==
#[derive(Debug)]
pub struct SwgtClient {
    source: Arc<dyn DefenseSource>,
    cache: ExpiringCache,
    ttl: MaxAge,
}

impl SwgtClient {
    /// # Arguments
    /// * `source` - Where fresh data comes from
    /// * `cache` - Region for query results, normally `SWGT_CACHE_PREFIX`
    /// * `ttl` - How long a stored result counts as fresh
    pub fn new(source: Arc<dyn DefenseSource>, cache: ExpiringCache, ttl: MaxAge) -> Self {
        Self { source, cache, ttl }
    }

    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }

    pub fn ttl(&self) -> MaxAge {
        self.ttl
    }

    // == Lookups ==
    pub async fn search_defenses(&self, query: &DefenseQuery) -> Lookup<Vec<Defense>> {
        let key = format!("defenses_{}", query.cache_suffix());
        self.cache
            .refresh_with_fallback(&key, self.ttl, || self.source.search_defenses(query))
            .await
    }

    pub async fn search_monsters(&self, query: &str) -> Lookup<Vec<Monster>> {
        let query = query.trim();
        let key = format!("monsters_{}", query);
        self.cache
            .refresh_with_fallback(&key, self.ttl, || self.source.search_monsters(query))
            .await
    }

    pub async fn trending(&self) -> Lookup<Vec<TrendingDefense>> {
        self.cache
            .refresh_with_fallback(TRENDING_KEY, self.ttl, || self.source.trending())
            .await
    }

    pub async fn monster_counters(&self, name: &str) -> Lookup<Vec<MonsterCounter>> {
        let name = name.trim();
        let key = format!("monster_{}", name);
        self.cache
            .refresh_with_fallback(&key, self.ttl, || self.source.monster_counters(name))
            .await
    }

    // == Writes ==
    /// Sends a vote. Never cached; `false` when the source refused or failed.
    pub async fn vote(&self, counter_id: &str, direction: VoteDirection) -> bool {
        match self.source.vote(counter_id, direction).await {
            Ok(()) => true,
            Err(e) => {
                warn!(counter_id, direction = %direction, error = %e, "Vote failed");
                false
            }
        }
    }

    /// Asks the source whether it is reachable. Never cached.
    pub async fn check_health(&self) -> bool {
        let reachable = self.source.check_health().await;
        if !reachable {
            warn!(source = self.source.name(), "swgt is not reachable");
        }
        reachable
    }

    /// Drops every cached swgt result.
    pub async fn clear_cache(&self) {
        self.cache.clear().await;
        info!("swgt cache cleared");
    }

    // == Sync ==
    /// Refetches trending defenses regardless of freshness and stores them.
    ///
    /// Returns the number of defenses received, zero when the source failed.
    pub async fn sync(&self) -> usize {
        match self.source.trending().await {
            Ok(trending) => {
                self.cache.put(TRENDING_KEY, &trending).await;
                info!(source = self.source.name(), defenses = trending.len(), "swgt sync complete");
                trending.len()
            }
            Err(e) => {
                warn!(source = self.source.name(), error = %e, "swgt sync failed");
                0
            }
        }
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub async fn cached_entries(&self) -> usize {
        self.cache.len().await
    }
}
