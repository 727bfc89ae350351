//! Rate-limited notifier.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use super::{Notification, NotificationCategory, NotificationSink};
use crate::cache::ExpiringCache;

// == Notify Outcome ==
/// What happened to a notification request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NotifyOutcome {
    /// Delivered and cooldown restarted
    Sent,
    /// Category still cooling down
    RateLimited { remaining_ms: u64 },
    /// Nothing worth sending
    Skipped,
    /// Sink failed; cooldown not restarted
    Failed,
}

// == Notifier ==
/// Emits notifications at most once per category cooldown.
#[derive(Debug)]
pub struct Notifier {
    /// Last-sent timestamps, one entry per category
    limits: ExpiringCache,
    sink: Arc<dyn NotificationSink>,
}

impl Notifier {
    /// `limits` should be a dedicated region (see `NOTIFICATION_NAMESPACE`).
    pub fn new(limits: ExpiringCache, sink: Arc<dyn NotificationSink>) -> Self {
        Self { limits, sink }
    }

    /// Milliseconds until `category` may fire again; zero when ready.
    pub async fn remaining_ms(&self, category: NotificationCategory) -> u64 {
        let cooldown_ms = category.cooldown().as_millis() as u64;
        match self.limits.age_of(category.key()).await {
            Some(age) => cooldown_ms.saturating_sub(age),
            None => 0,
        }
    }

    // == Notify If Ready ==
    /// Delivers `notification` when at least one cooldown has passed since the
    /// last delivery of its category.
    pub async fn notify_if_ready(&self, notification: Notification) -> NotifyOutcome {
        let category = notification.category;

        let remaining_ms = self.remaining_ms(category).await;
        if remaining_ms > 0 {
            info!(
                category = %category,
                remaining_hours = %format!("{:.1}", remaining_ms as f64 / 3_600_000.0),
                "Notification rate limited"
            );
            return NotifyOutcome::RateLimited { remaining_ms };
        }

        match self.sink.deliver(&notification).await {
            Ok(()) => {
                self.limits.put(category.key(), &()).await;
                NotifyOutcome::Sent
            }
            Err(e) => {
                warn!(category = %category, error = %e, "Notification delivery failed");
                NotifyOutcome::Failed
            }
        }
    }

    pub async fn notify_trending_counter(&self, monsters: &[String], rating: f64) -> NotifyOutcome {
        self.notify_if_ready(Notification::new(
            NotificationCategory::TrendingCounter,
            format!("New Trending Counter: {}", monsters.join(", ")),
            format!("Rating: {:.1} - Tap to view strategy", rating),
        ))
        .await
    }

    pub async fn notify_favorite_updated(&self, composition: &str) -> NotifyOutcome {
        self.notify_if_ready(Notification::new(
            NotificationCategory::FavoriteUpdate,
            "Favorite Composition Updated",
            format!("{} has new counters available", composition),
        ))
        .await
    }

    /// Skipped when the sync brought nothing new.
    pub async fn notify_sync_complete(&self, new_counters: usize) -> NotifyOutcome {
        if new_counters == 0 {
            return NotifyOutcome::Skipped;
        }

        self.notify_if_ready(Notification::new(
            NotificationCategory::SyncComplete,
            "SwArifa Sync Complete",
            format!("{} new counters added from swgt.io", new_counters),
        ))
        .await
    }

    /// Forgets every last-sent timestamp.
    pub async fn clear_limits(&self) {
        self.limits.clear().await;
        info!("Notification limits cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;
    use crate::error::{CacheError, Result};
    use crate::notify::NOTIFICATION_NAMESPACE;
    use crate::store::MemoryStore;
    use async_trait::async_trait;
    use std::sync::Mutex;

    const HOUR: u64 = 60 * 60 * 1000;

    #[derive(Debug, Default)]
    struct RecordingSink {
        sent: Mutex<Vec<Notification>>,
    }

    #[async_trait]
    impl NotificationSink for RecordingSink {
        async fn deliver(&self, notification: &Notification) -> Result<()> {
            self.sent.lock().unwrap().push(notification.clone());
            Ok(())
        }
    }

    #[derive(Debug)]
    struct FailingSink;

    #[async_trait]
    impl NotificationSink for FailingSink {
        async fn deliver(&self, _notification: &Notification) -> Result<()> {
            Err(CacheError::Internal("no permission".into()))
        }
    }

    fn create_notifier(sink: Arc<dyn NotificationSink>) -> (Notifier, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(1_700_000_000_000));
        let limits = ExpiringCache::with_clock(
            Arc::new(MemoryStore::new()),
            NOTIFICATION_NAMESPACE,
            clock.clone(),
        );
        (Notifier::new(limits, sink), clock)
    }

    #[tokio::test]
    async fn test_first_notification_is_sent() {
        let sink = Arc::new(RecordingSink::default());
        let (notifier, _clock) = create_notifier(sink.clone());

        let outcome = notifier
            .notify_trending_counter(&["Lushen".to_string(), "Galleon".to_string(), "Taor".to_string()], 9.2)
            .await;

        assert_eq!(outcome, NotifyOutcome::Sent);
        let sent = sink.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].title, "New Trending Counter: Lushen, Galleon, Taor");
        assert_eq!(sent[0].body, "Rating: 9.2 - Tap to view strategy");
    }

    #[tokio::test]
    async fn test_cooldown_boundary_allows_at_exact_interval() {
        let sink = Arc::new(RecordingSink::default());
        let (notifier, clock) = create_notifier(sink.clone());

        assert_eq!(notifier.notify_favorite_updated("Susano, Garo, Orion").await, NotifyOutcome::Sent);

        clock.advance(12 * HOUR - 1);
        assert_eq!(
            notifier.notify_favorite_updated("Susano, Garo, Orion").await,
            NotifyOutcome::RateLimited { remaining_ms: 1 }
        );

        clock.advance(1);
        assert_eq!(notifier.notify_favorite_updated("Susano, Garo, Orion").await, NotifyOutcome::Sent);
        assert_eq!(sink.sent.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_categories_are_limited_independently() {
        let sink = Arc::new(RecordingSink::default());
        let (notifier, _clock) = create_notifier(sink.clone());

        notifier.notify_sync_complete(3).await;
        let outcome = notifier.notify_favorite_updated("Susano, Garo, Orion").await;

        assert_eq!(outcome, NotifyOutcome::Sent);
        assert!(matches!(
            notifier.notify_sync_complete(5).await,
            NotifyOutcome::RateLimited { .. }
        ));
    }

    #[tokio::test]
    async fn test_sync_complete_with_nothing_new_is_skipped() {
        let sink = Arc::new(RecordingSink::default());
        let (notifier, _clock) = create_notifier(sink.clone());

        assert_eq!(notifier.notify_sync_complete(0).await, NotifyOutcome::Skipped);
        assert!(sink.sent.lock().unwrap().is_empty());
        assert_eq!(notifier.remaining_ms(NotificationCategory::SyncComplete).await, 0);
    }

    #[tokio::test]
    async fn test_failed_delivery_does_not_start_cooldown() {
        let (notifier, _clock) = create_notifier(Arc::new(FailingSink));

        assert_eq!(notifier.notify_sync_complete(2).await, NotifyOutcome::Failed);
        assert_eq!(notifier.remaining_ms(NotificationCategory::SyncComplete).await, 0);
    }

    #[tokio::test]
    async fn test_clear_limits_resets_cooldowns() {
        let sink = Arc::new(RecordingSink::default());
        let (notifier, _clock) = create_notifier(sink.clone());

        notifier.notify_sync_complete(1).await;
        notifier.clear_limits().await;

        assert_eq!(notifier.notify_sync_complete(1).await, NotifyOutcome::Sent);
    }

    #[test]
    fn test_outcome_serialization() {
        let json = serde_json::to_string(&NotifyOutcome::RateLimited { remaining_ms: 5 }).unwrap();
        assert_eq!(json, r#"{"status":"rate_limited","remaining_ms":5}"#);
    }
}
