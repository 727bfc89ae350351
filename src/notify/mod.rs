//! Notification Module
//!
//! Rate-limited notifications. Each category remembers when it last fired as
//! an entry in its own cache region; delivery goes through a pluggable sink.

mod notifier;
mod sink;

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::CacheError;

pub use notifier::{Notifier, NotifyOutcome};
pub use sink::{LogSink, NotificationSink};

/// Cache region holding the last-sent timestamps
pub const NOTIFICATION_NAMESPACE: &str = "notification_";

// == Notification Category ==
/// Kinds of notification, each with its own cooldown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationCategory {
    TrendingCounter,
    FavoriteUpdate,
    SyncComplete,
}

impl NotificationCategory {
    pub const ALL: [NotificationCategory; 3] = [
        NotificationCategory::TrendingCounter,
        NotificationCategory::FavoriteUpdate,
        NotificationCategory::SyncComplete,
    ];

    /// Key of the last-sent entry inside the notification region.
    pub fn key(&self) -> &'static str {
        match self {
            NotificationCategory::TrendingCounter => "trending_counter",
            NotificationCategory::FavoriteUpdate => "favorite_update",
            NotificationCategory::SyncComplete => "sync_complete",
        }
    }

    /// Minimum time between two notifications of this category.
    pub fn cooldown(&self) -> Duration {
        let hours = match self {
            NotificationCategory::TrendingCounter => 6,
            NotificationCategory::FavoriteUpdate => 12,
            NotificationCategory::SyncComplete => 24,
        };
        Duration::from_secs(hours * 60 * 60)
    }
}

impl fmt::Display for NotificationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for NotificationCategory {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "trending_counter" | "trending" => Ok(NotificationCategory::TrendingCounter),
            "favorite_update" | "favorite" => Ok(NotificationCategory::FavoriteUpdate),
            "sync_complete" | "sync" => Ok(NotificationCategory::SyncComplete),
            other => Err(CacheError::InvalidRequest(format!(
                "Unknown notification category: '{}'. Valid categories: trending_counter, favorite_update, sync_complete",
                other
            ))),
        }
    }
}

// == Notification ==
/// A message ready for delivery.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub category: NotificationCategory,
    pub title: String,
    pub body: String,
}

impl Notification {
    pub fn new(
        category: NotificationCategory,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            category,
            title: title.into(),
            body: body.into(),
        }
    }
}
