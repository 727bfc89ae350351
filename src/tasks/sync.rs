//! swgt Sync Task
//!
//! Background task that periodically refetches trending defenses and emits a
//! rate-limited "sync complete" notification.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::notify::{Notifier, NotifyOutcome};
use crate::swgt::SwgtClient;

/// Runs one sync and notifies when it brought data.
///
/// Returns the number of trending defenses received.
pub async fn run_sync(client: &SwgtClient, notifier: &Notifier) -> usize {
    let synced = client.sync().await;

    match notifier.notify_sync_complete(synced).await {
        NotifyOutcome::Sent => info!(synced, "Sync notification sent"),
        outcome => debug!(synced, ?outcome, "Sync notification not sent"),
    }

    synced
}

/// Spawns a background task that syncs swgt data every `sync_interval_secs`.
///
/// # Arguments
/// * `client` - Shared swgt client
/// * `notifier` - Shared notifier for the "sync complete" message
/// * `sync_interval_secs` - Interval in seconds between syncs, 0 disables the task
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown, or `None` when syncing is disabled.
pub fn spawn_sync_task(
    client: Arc<SwgtClient>,
    notifier: Arc<Notifier>,
    sync_interval_secs: u64,
) -> Option<JoinHandle<()>> {
    if sync_interval_secs == 0 {
        info!("Background sync disabled");
        return None;
    }

    let interval = Duration::from_secs(sync_interval_secs);

    Some(tokio::spawn(async move {
        info!(
            "Starting swgt sync task with interval of {} seconds",
            sync_interval_secs
        );

        loop {
            // Sleep for the configured interval
            tokio::time::sleep(interval).await;
            run_sync(&client, &notifier).await;
        }
    }))
}
