//! Importing every configured feed of a property.
//!
//! Each source runs fetch → parse → classify → reconcile on its own. A
//! source that cannot be fetched or parsed is recorded as failed and the
//! next one still runs; an event that cannot be stored is counted and the
//! rest of the feed still runs.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::booking::BookingSource;
use crate::classify::Classifier;
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::fetch::FeedFetcher;
use crate::ics::parse_feed;
use crate::property::{FeedSource, Property};
use crate::reconcile::{Reconciled, reconcile};
use crate::store::{BookingStore, SqliteStore};

/// Outcome of syncing one property.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncReport {
    pub property_id: String,
    /// Bookings created across all sources.
    pub imported: usize,
    pub sources: Vec<SourceReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceReport {
    pub source: BookingSource,
    pub url: String,
    #[serde(flatten)]
    pub outcome: SourceOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SourceOutcome {
    Synced(SourceStats),
    Failed { stage: SyncStage, error: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStage {
    Fetch,
    Parse,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SourceStats {
    /// Events parsed from the feed.
    pub events: usize,
    /// Events classified as availability blocks.
    pub placeholders: usize,
    /// Bookings that were already imported.
    pub existing: usize,
    pub imported: usize,
    /// Events whose lookup or insert failed.
    pub failed: usize,
}

impl SourceReport {
    pub fn imported(&self) -> usize {
        match &self.outcome {
            SourceOutcome::Synced(stats) => stats.imported,
            SourceOutcome::Failed { .. } => 0,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, SourceOutcome::Failed { .. })
    }
}

/// Runs the import pipeline against a booking store.
pub struct Syncer<S> {
    fetcher: FeedFetcher,
    classifier: Classifier,
    store: S,
}

impl<S: BookingStore> Syncer<S> {
    pub fn new(fetcher: FeedFetcher, classifier: Classifier, store: S) -> Self {
        Syncer {
            fetcher,
            classifier,
            store,
        }
    }

    pub fn from_settings(settings: &Settings, store: S) -> Result<Self> {
        Ok(Self::new(
            FeedFetcher::new(&settings.fetch)?,
            settings.classifier.classifier(),
            store,
        ))
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Import every feed configured on `property`, one after another.
    ///
    /// Fails only when the property has no feeds; source and event level
    /// failures end up in the report.
    pub async fn sync_property(&self, property: &Property) -> Result<SyncReport> {
        let feeds = property.feed_sources();
        if feeds.is_empty() {
            return Err(Error::NoFeedSources(property.id.clone()));
        }

        info!(property_id = %property.id, feeds = feeds.len(), "Syncing property");

        let mut sources = Vec::with_capacity(feeds.len());
        for feed in feeds {
            let outcome = match self.sync_source(&property.id, &feed).await {
                Ok(stats) => SourceOutcome::Synced(stats),
                Err((stage, e)) => {
                    warn!(
                        property_id = %property.id,
                        source = %feed.source,
                        ?stage,
                        "Abandoning feed: {e}"
                    );
                    SourceOutcome::Failed {
                        stage,
                        error: e.to_string(),
                    }
                }
            };
            sources.push(SourceReport {
                source: feed.source,
                url: feed.url,
                outcome,
            });
        }

        let imported = sources.iter().map(SourceReport::imported).sum();
        info!(property_id = %property.id, imported, "Sync finished");

        Ok(SyncReport {
            property_id: property.id.clone(),
            imported,
            sources,
        })
    }

    async fn sync_source(
        &self,
        property_id: &str,
        feed: &FeedSource,
    ) -> std::result::Result<SourceStats, (SyncStage, Error)> {
        let body = self
            .fetcher
            .fetch(&feed.url)
            .await
            .map_err(|e| (SyncStage::Fetch, e))?;
        let events = parse_feed(&body).map_err(|e| (SyncStage::Parse, e))?;

        let mut stats = SourceStats {
            events: events.len(),
            ..Default::default()
        };

        for event in &events {
            if self.classifier.is_placeholder(feed.source, &event.summary) {
                debug!(
                    external_id = %event.external_id,
                    summary = %event.summary,
                    "Skipping placeholder"
                );
                stats.placeholders += 1;
                continue;
            }

            match reconcile(&self.store, property_id, event, feed.source).await {
                Ok(Reconciled::Imported(_)) => stats.imported += 1,
                Ok(Reconciled::Existing) => stats.existing += 1,
                Err(e) => {
                    warn!(
                        property_id,
                        external_id = %event.external_id,
                        "Could not store booking: {e}"
                    );
                    stats.failed += 1;
                }
            }
        }

        Ok(stats)
    }
}

impl Syncer<SqliteStore> {
    pub async fn sync_by_id(&self, property_id: &str) -> Result<SyncReport> {
        let property = self
            .store
            .get_property(property_id)
            .await?
            .ok_or_else(|| Error::PropertyNotFound(property_id.to_string()))?;
        self.sync_property(&property).await
    }

    /// Sync every stored property. Properties without feeds are skipped,
    /// other failures are logged and skipped.
    pub async fn sync_all(&self) -> Result<Vec<SyncReport>> {
        let mut reports = Vec::new();
        for property in self.store.list_properties().await? {
            match self.sync_property(&property).await {
                Ok(report) => reports.push(report),
                Err(Error::NoFeedSources(id)) => {
                    debug!(property_id = %id, "No feeds configured");
                }
                Err(e) => warn!(property_id = %property.id, "Sync failed: {e}"),
            }
        }
        Ok(reports)
    }
}
