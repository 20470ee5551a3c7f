//! Sweep summary and reporting
//!
//! This module defines structures for tracking and reporting sweep results.

use crate::core::sync::engine::CollectionSyncReport;
use crate::domain::ids::CollectionId;
use crate::domain::{SyncError, SyncStage};
use std::time::Duration;

/// Summary of one sweep over all collections
#[derive(Debug, Clone, Default)]
pub struct SweepSummary {
    /// Collections selected for this sweep
    pub total_collections: usize,

    /// Reports of collections whose cycle succeeded
    pub completed: Vec<CollectionSyncReport>,

    /// Collections whose cycle failed
    pub failures: Vec<CollectionFailure>,

    /// Collections not attempted because shutdown was requested
    pub skipped: usize,

    /// Duration of the sweep
    pub duration: Duration,
}

impl SweepSummary {
    /// Create a new empty summary
    pub fn new(total_collections: usize) -> Self {
        Self {
            total_collections,
            ..Self::default()
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Record a successful cycle
    pub fn record_success(&mut self, report: CollectionSyncReport) {
        self.completed.push(report);
    }

    /// Record a failed cycle
    pub fn record_failure(&mut self, collection_id: CollectionId, error: &SyncError) {
        self.failures.push(CollectionFailure {
            collection_id,
            stage: error.stage().copied(),
            message: error.to_string(),
        });
    }

    /// True when no collection failed
    pub fn is_successful(&self) -> bool {
        self.failures.is_empty()
    }

    /// True when shutdown cut the sweep short
    pub fn was_interrupted(&self) -> bool {
        self.skipped > 0
    }

    /// Members pushed across all successful cycles
    pub fn total_processed(&self) -> usize {
        self.completed.iter().map(|r| r.processed).sum()
    }

    /// Successful cycles that advanced their watermark
    pub fn watermarks_committed(&self) -> usize {
        self.completed.iter().filter(|r| r.watermark_committed).count()
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            collections = self.total_collections,
            succeeded = self.completed.len(),
            failed = self.failures.len(),
            skipped = self.skipped,
            members_processed = self.total_processed(),
            watermarks_committed = self.watermarks_committed(),
            duration_secs = self.duration.as_secs(),
            "Sweep completed"
        );

        for failure in &self.failures {
            tracing::warn!(
                list_id = %failure.collection_id,
                stage = ?failure.stage,
                error = %failure.message,
                "Collection sync failed"
            );
        }
    }
}

/// A failed collection cycle
#[derive(Debug, Clone)]
pub struct CollectionFailure {
    /// Collection whose cycle failed
    pub collection_id: CollectionId,

    /// Stage the cycle failed in, when known
    pub stage: Option<SyncStage>,

    /// Rendered error
    pub message: String,
}
