//! Response DTOs for the lookup API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::{CacheStats, Freshness, Lookup};
use crate::library::OverlayState;
use crate::notify::{NotificationCategory, NotifyOutcome};
use crate::swgt::VoteDirection;

/// Response body of every cached lookup
///
/// `degraded` is true when the remote source could not be reached and the
/// results are stale or empty.
#[derive(Debug, Clone, Serialize)]
pub struct LookupResponse<T> {
    pub freshness: Freshness,
    pub degraded: bool,
    pub count: usize,
    pub results: Vec<T>,
}

impl<T> From<Lookup<Vec<T>>> for LookupResponse<T> {
    fn from(lookup: Lookup<Vec<T>>) -> Self {
        let freshness = lookup.freshness;
        let degraded = lookup.is_degraded();
        let results = lookup.unwrap_or_default();
        Self {
            freshness,
            degraded,
            count: results.len(),
            results,
        }
    }
}

/// Response body for `POST /counters/:id/vote`
#[derive(Debug, Clone, Serialize)]
pub struct VoteResponse {
    pub counter_id: String,
    pub direction: VoteDirection,
    pub accepted: bool,
}

/// Generic acknowledgement for mutations without a richer result
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Overlay state plus its one-line description
#[derive(Debug, Clone, Serialize)]
pub struct OverlayResponse {
    #[serde(flatten)]
    pub state: OverlayState,
    pub description: String,
}

impl From<OverlayState> for OverlayResponse {
    fn from(state: OverlayState) -> Self {
        Self {
            description: state.describe(),
            state,
        }
    }
}

/// Response body for `POST /notifications/:category`
#[derive(Debug, Clone, Serialize)]
pub struct NotifyResponse {
    pub category: NotificationCategory,
    #[serde(flatten)]
    pub outcome: NotifyOutcome,
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub cache: CacheStats,
    /// Entries currently stored in the swgt cache region
    pub total_entries: usize,
    /// (hits + stale hits) / lookups
    pub hit_rate: f64,
}

impl StatsResponse {
    pub fn new(cache: CacheStats, total_entries: usize) -> Self {
        Self {
            hit_rate: cache.hit_rate(),
            cache,
            total_entries,
        }
    }
}

/// Response body for `POST /share`
#[derive(Debug, Clone, Serialize)]
pub struct ShareResponse {
    pub text: String,
    pub link: String,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// "healthy", or "degraded" when swgt cannot be reached
    pub status: String,
    /// Active swgt source
    pub source: String,
    /// Whether the swgt source answered the health check
    pub upstream_reachable: bool,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn new(source: impl Into<String>, upstream_reachable: bool) -> Self {
        let status = if upstream_reachable { "healthy" } else { "degraded" };
        Self {
            status: status.to_string(),
            source: source.into(),
            upstream_reachable,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
