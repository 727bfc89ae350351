//! Refresh Orchestration
//!
//! The read path every remote lookup follows: fresh cache hit, otherwise
//! refresh and store, otherwise stale cache, otherwise nothing. Refresh errors
//! are logged here and never returned.

use std::future::Future;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::cache::{ExpiringCache, MaxAge};
use crate::error::Result;

// == Freshness ==
/// Where a lookup result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Freshness {
    /// Fresh cache hit, remote not contacted
    Cached,
    /// Remote refresh succeeded
    Fetched,
    /// Remote refresh failed, expired cache entry served
    Stale,
    /// Remote refresh failed and nothing was cached
    Unavailable,
}

// == Lookup ==
/// Result of a cached lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct Lookup<T> {
    pub data: Option<T>,
    pub freshness: Freshness,
}

impl<T> Lookup<T> {
    /// True when the remote could not be reached for this lookup.
    pub fn is_degraded(&self) -> bool {
        matches!(self.freshness, Freshness::Stale | Freshness::Unavailable)
    }

    pub fn into_data(self) -> Option<T> {
        self.data
    }

    /// The data, or `T::default()` when nothing was available.
    pub fn unwrap_or_default(self) -> T
    where
        T: Default,
    {
        self.data.unwrap_or_default()
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Lookup<U> {
        Lookup {
            data: self.data.map(f),
            freshness: self.freshness,
        }
    }
}

impl ExpiringCache {
    // == Refresh With Fallback ==
    /// Serves `key` from cache if younger than `ttl`; otherwise runs `fetch`.
    ///
    /// A successful fetch is stored and returned. A failed fetch falls back to
    /// the cached value of any age, then to `None`. Expired entries are never
    /// purged here, so they stay available as the fallback.
    ///
    /// Concurrent calls for the same missing key each run their own fetch.
    pub async fn refresh_with_fallback<T, F, Fut>(&self, key: &str, ttl: MaxAge, fetch: F) -> Lookup<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        // Read once without purging: an expired entry is the fallback candidate.
        let full_key = self.full_key(key);
        let cached = self.read_entry::<T>(&full_key).await;
        let now = self.now_ms();

        let fallback = match cached {
            Some(entry) if entry.is_fresh(ttl, now) => {
                self.recorder().record_hit();
                debug!(key = %full_key, age_ms = entry.age_ms(now), "Cache hit");
                return Lookup {
                    data: Some(entry.data),
                    freshness: Freshness::Cached,
                };
            }
            other => {
                self.recorder().record_miss();
                other
            }
        };

        self.recorder().record_refresh();
        match fetch().await {
            Ok(fresh) => {
                self.put(key, &fresh).await;
                info!(namespace = %self.namespace(), key, "Refreshed cache entry");
                Lookup {
                    data: Some(fresh),
                    freshness: Freshness::Fetched,
                }
            }
            Err(e) => {
                self.recorder().record_refresh_failure();
                warn!(namespace = %self.namespace(), key, error = %e, "Refresh failed, trying stale cache");

                match fallback {
                    Some(entry) => {
                        self.recorder().record_stale_hit();
                        debug!(key = %full_key, age_ms = entry.age_ms(now), "Serving stale cache entry");
                        Lookup {
                            data: Some(entry.data),
                            freshness: Freshness::Stale,
                        }
                    }
                    None => Lookup {
                        data: None,
                        freshness: Freshness::Unavailable,
                    },
                }
            }
        }
    }

    /// `refresh_with_fallback`, collapsing "nothing available" into `T::default()`.
    pub async fn refresh_or_default<T, F, Fut>(&self, key: &str, ttl: MaxAge, fetch: F) -> T
    where
        T: Serialize + DeserializeOwned + Default,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.refresh_with_fallback(key, ttl, fetch)
            .await
            .unwrap_or_default()
    }
}
