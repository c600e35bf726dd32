//! Background feed import.

use std::sync::Arc;
use std::time::Duration;

use rentcal_core::{SqliteStore, Syncer};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Sync every property now, then every `interval`. Runs in its own task.
pub fn spawn_periodic_sync(
    syncer: Arc<Syncer<SqliteStore>>,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // No catch-up bursts after a slow run
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            sync_all_properties(&syncer).await;
        }
    })
}

/// One pass over every property. Returns the number of bookings imported.
pub async fn sync_all_properties(syncer: &Syncer<SqliteStore>) -> usize {
    tracing::info!("Starting scheduled sync");

    match syncer.sync_all().await {
        Ok(reports) => {
            let imported = reports.iter().map(|r| r.imported).sum();
            let failed_feeds = reports
                .iter()
                .flat_map(|r| &r.sources)
                .filter(|s| s.is_failed())
                .count();
            tracing::info!(
                properties = reports.len(),
                imported,
                failed_feeds,
                "Scheduled sync finished"
            );
            imported
        }
        Err(e) => {
            tracing::error!("Scheduled sync failed: {e}");
            0
        }
    }
}
