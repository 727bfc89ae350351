//! Cache Entry Module
//!
//! Stored representation of a cached value plus the freshness rule.

use std::time::Duration;

use serde::{Deserialize, Serialize};

// == Cache Entry ==
/// A value wrapped with the time it was stored.
///
/// Serialized as `{"data": ..., "storedAtEpochMillis": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry<T> {
    /// The cached payload
    pub data: T,
    /// Unix milliseconds at write time
    pub stored_at_epoch_millis: u64,
}

impl<T> CacheEntry<T> {
    /// Wraps `data` stamped with `now_ms`.
    pub fn new(data: T, now_ms: u64) -> Self {
        Self {
            data,
            stored_at_epoch_millis: now_ms,
        }
    }

    /// Milliseconds elapsed since the entry was stored. A clock that went
    /// backwards yields zero.
    pub fn age_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.stored_at_epoch_millis)
    }

    /// Checks freshness against `max_age`.
    pub fn is_fresh(&self, max_age: MaxAge, now_ms: u64) -> bool {
        max_age.admits(self.age_ms(now_ms))
    }
}

// == Max Age ==
/// Upper bound on the age of an entry that still counts as fresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaxAge {
    /// Fresh while `age <= millis`
    Millis(u64),
    /// Any age is fresh
    Unbounded,
}

impl MaxAge {
    pub fn hours(hours: u64) -> Self {
        MaxAge::Millis(hours.saturating_mul(60 * 60 * 1000))
    }

    pub fn from_duration(duration: Duration) -> Self {
        MaxAge::Millis(duration.as_millis().min(u64::MAX as u128) as u64)
    }

    /// Boundary inclusive: an entry exactly `millis` old is still fresh.
    pub fn admits(&self, age_ms: u64) -> bool {
        match self {
            MaxAge::Millis(max) => age_ms <= *max,
            MaxAge::Unbounded => true,
        }
    }
}
