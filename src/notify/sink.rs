//! Notification delivery.

use std::fmt;

use async_trait::async_trait;
use tracing::info;

use super::Notification;
use crate::error::Result;

/// Delivers a notification to the user. Push delivery lives behind this trait.
#[async_trait]
pub trait NotificationSink: Send + Sync + fmt::Debug {
    async fn deliver(&self, notification: &Notification) -> Result<()>;
}

/// Sink that writes notifications to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

#[async_trait]
impl NotificationSink for LogSink {
    async fn deliver(&self, notification: &Notification) -> Result<()> {
        info!(
            category = %notification.category,
            title = %notification.title,
            body = %notification.body,
            "Notification sent"
        );
        Ok(())
    }
}
