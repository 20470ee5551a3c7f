//! Sweep coordinator
//!
//! Lists the collections once per sweep and runs the sync engine for each of
//! them in turn. A failed collection is recorded and the sweep moves on; its
//! watermark is untouched so the next sweep retries it.

use crate::adapters::traits::SourceClient;
use crate::core::sync::engine::SyncEngine;
use crate::core::sync::summary::SweepSummary;
use crate::domain::{Collection, Result};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;

/// Runs sweeps over all selected collections
pub struct SweepCoordinator {
    source: Arc<dyn SourceClient + Send + Sync>,
    engine: Arc<SyncEngine>,

    /// Only sync these list IDs; empty means every list
    list_ids: Vec<String>,

    /// Set to `true` to stop between collections
    shutdown_signal: watch::Receiver<bool>,
}

impl SweepCoordinator {
    /// Create a new coordinator
    pub fn new(
        source: Arc<dyn SourceClient + Send + Sync>,
        engine: Arc<SyncEngine>,
        list_ids: Vec<String>,
        shutdown_signal: watch::Receiver<bool>,
    ) -> Self {
        Self {
            source,
            engine,
            list_ids,
            shutdown_signal,
        }
    }

    /// Run one sweep
    ///
    /// # Errors
    ///
    /// Returns an error only if the collections cannot be listed. Per
    /// collection failures are reported in the summary.
    pub async fn run_sweep(&self) -> Result<SweepSummary> {
        let start_time = Instant::now();

        let collections = self.select(self.source.list_collections().await?);
        let mut summary = SweepSummary::new(collections.len());

        tracing::info!(collections = collections.len(), "Starting sweep");

        for (index, collection) in collections.iter().enumerate() {
            if *self.shutdown_signal.borrow() {
                summary.skipped = collections.len() - index;
                tracing::warn!(
                    remaining = summary.skipped,
                    "Shutdown requested, stopping sweep between collections"
                );
                break;
            }

            tracing::info!(
                list_id = %collection.id,
                name = %collection.name,
                "Syncing collection"
            );

            match self.engine.sync_collection(&collection.id).await {
                Ok(report) => summary.record_success(report),
                Err(e) => {
                    tracing::error!(
                        list_id = %collection.id,
                        error = %e,
                        "Collection sync failed, watermark unchanged"
                    );
                    summary.record_failure(collection.id.clone(), &e);
                }
            }
        }

        let summary = summary.with_duration(start_time.elapsed());
        summary.log_summary();
        Ok(summary)
    }

    /// Apply the configured allow-list
    fn select(&self, collections: Vec<Collection>) -> Vec<Collection> {
        if self.list_ids.is_empty() {
            return collections;
        }

        for wanted in &self.list_ids {
            if !collections.iter().any(|c| c.id.as_str() == wanted) {
                tracing::warn!(list_id = %wanted, "Configured list not visible to the source key");
            }
        }

        collections
            .into_iter()
            .filter(|c| self.list_ids.iter().any(|id| id == c.id.as_str()))
            .collect()
    }
}
