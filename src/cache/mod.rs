//! Cache Module
//!
//! Expiring key-value cache over a persistent string store, with stale-read
//! fallback for failed refreshes.

mod clock;
mod entry;
mod expiring;
mod refresh;
mod stats;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use clock::{current_timestamp_ms, Clock, ManualClock, SystemClock};
pub use entry::{CacheEntry, MaxAge};
pub use expiring::ExpiringCache;
pub use refresh::{Freshness, Lookup};
pub use stats::CacheStats;

// == Public Constants ==
/// Namespace of the swgt query cache
pub const SWGT_CACHE_PREFIX: &str = "swgt_cache_";

/// Default freshness window of swgt data, in hours
pub const DEFAULT_TTL_HOURS: u64 = 24;
