//! Local usage analytics.
//!
//! A bounded log of named events kept on the shared store, plus a summary
//! report. Nothing is sent anywhere.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::{load_json, save_json, try_load_json};
use crate::error::{CacheError, Result};
use crate::store::KeyValueStore;

/// Store key holding the event log
pub const ANALYTICS_KEY: &str = "firebase_analytics_events";

/// Oldest events are dropped beyond this many
pub const MAX_ANALYTICS_EVENTS: usize = 100;

/// Number of most recent events included in a report
pub const REPORT_RECENT_EVENTS: usize = 20;

// == Analytics Event ==
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Map<String, Value>>,
    pub timestamp: DateTime<Utc>,
}

/// Summary of the event log.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub total_events: usize,
    /// Distinct event names in order of first appearance
    pub event_types: Vec<String>,
    /// The most recent events, oldest first
    pub events: Vec<AnalyticsEvent>,
    pub generated_at: DateTime<Utc>,
}

// == Analytics ==
/// Oldest-first event log capped at `MAX_ANALYTICS_EVENTS`.
#[derive(Debug, Clone)]
pub struct Analytics {
    store: Arc<dyn KeyValueStore>,
}

impl Analytics {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Appends an event stamped now.
    ///
    /// # Arguments
    /// * `name` - Event name, e.g. `search_defense`
    /// * `params` - Optional JSON object with event details
    pub async fn log_event(&self, name: &str, params: Option<Value>) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CacheError::InvalidRequest("Event name cannot be empty".to_string()));
        }

        let params = match params {
            None | Some(Value::Null) => None,
            Some(Value::Object(map)) => Some(map),
            Some(_) => {
                return Err(CacheError::InvalidRequest(
                    "Event params must be a JSON object".to_string(),
                ))
            }
        };

        let mut events: Vec<AnalyticsEvent> = try_load_json(self.store.as_ref(), ANALYTICS_KEY)
            .await?
            .unwrap_or_default();
        events.push(AnalyticsEvent {
            name: name.to_string(),
            params,
            timestamp: Utc::now(),
        });
        if events.len() > MAX_ANALYTICS_EVENTS {
            let excess = events.len() - MAX_ANALYTICS_EVENTS;
            events.drain(..excess);
        }

        save_json(self.store.as_ref(), ANALYTICS_KEY, &events).await?;
        debug!(event = name, "Analytics event recorded");
        Ok(())
    }

    /// `log_event` for callers that must not fail because of analytics.
    pub async fn track(&self, name: &str, params: Value) {
        if let Err(e) = self.log_event(name, Some(params)).await {
            warn!(event = name, error = %e, "Failed to record analytics event");
        }
    }

    /// Every stored event, oldest first; empty when unreadable.
    pub async fn events(&self) -> Vec<AnalyticsEvent> {
        load_json(self.store.as_ref(), ANALYTICS_KEY)
            .await
            .unwrap_or_default()
    }

    pub async fn clear(&self) -> Result<()> {
        self.store.remove_item(ANALYTICS_KEY).await
    }

    pub async fn report(&self) -> AnalyticsReport {
        let events = self.events().await;

        let mut event_types: Vec<String> = Vec::new();
        for event in &events {
            if !event_types.contains(&event.name) {
                event_types.push(event.name.clone());
            }
        }

        let recent_from = events.len().saturating_sub(REPORT_RECENT_EVENTS);
        AnalyticsReport {
            total_events: events.len(),
            event_types,
            events: events[recent_from..].to_vec(),
            generated_at: Utc::now(),
        }
    }
}
