//! Incremental paginated sync engine
//!
//! One call to [`SyncEngine::sync_collection`] is one cycle: read the
//! watermark, fetch every page changed since it, push each page as it
//! arrives, and advance the watermark only when every member was pushed.
//!
//! Page 0 runs on the caller's task because its `total_items` decides how
//! many pages exist. Pages `1..n` run as detached tasks and report through a
//! bounded channel to a single consumer, which owns the processed counter
//! and stops at the first error.
//!
//! Every page, page 0 included, holds a permit of one limiter owned by the
//! engine. Tasks of an aborted cycle that are still running keep their
//! permits, so the next collection cannot push the source above the cap.
//! Tasks still waiting for a permit when a cycle aborts give it back
//! without making a request.

use crate::adapters::traits::{DestinationClient, SourceClient};
use crate::config::schema::SOURCE_CONCURRENCY_CEILING;
use crate::config::ListSyncConfig;
use crate::core::state::{StateManager, Watermark};
use crate::core::transform::to_contacts;
use crate::domain::ids::CollectionId;
use crate::domain::{Member, MembersPage, Result, StageContext, SyncError, SyncStage};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, watch, OwnedSemaphorePermit, Semaphore};

/// Hard upper bound on concurrent page tasks per collection
pub const MAX_CONCURRENCY: usize = SOURCE_CONCURRENCY_CEILING - 1;

/// Tuning for a sync cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOptions {
    /// Members requested per page
    pub page_size: usize,

    /// Maximum page tasks in flight, clamped to `1..=MAX_CONCURRENCY`
    pub max_concurrency: usize,

    /// Fetch and transform, but skip pushes and watermark commits
    pub dry_run: bool,
}

impl SyncOptions {
    /// Build options from configuration
    pub fn from_config(config: &ListSyncConfig) -> Self {
        Self {
            page_size: config.source.page_size,
            max_concurrency: config.source.max_concurrency,
            dry_run: config.application.dry_run,
        }
    }
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            page_size: 900,
            max_concurrency: MAX_CONCURRENCY,
            dry_run: false,
        }
    }
}

/// Outcome of a successful cycle
#[derive(Debug, Clone)]
pub struct CollectionSyncReport {
    /// Collection that was synced
    pub collection_id: CollectionId,

    /// `total_items` reported by page 0
    pub total_items: usize,

    /// Members fetched and pushed during the cycle
    pub processed: usize,

    /// Number of pages the cycle planned
    pub pages: usize,

    /// Whether the cycle ran without a watermark
    pub full_sync: bool,

    /// Whether the watermark was advanced to `cycle_start`
    pub watermark_committed: bool,

    /// Instant captured before the first fetch
    pub cycle_start: DateTime<Utc>,

    /// Wall-clock time of the cycle
    pub duration: Duration,
}

/// Number of pages to request for `total` members
///
/// Always one more than the number of full pages, so an exact multiple of
/// `page_size` costs one trailing empty request.
pub fn page_count(total: usize, page_size: usize) -> usize {
    total / page_size.max(1) + 1
}

/// Orchestrates fetch, transform and push for one collection at a time
pub struct SyncEngine {
    source: Arc<dyn SourceClient + Send + Sync>,
    destination: Arc<dyn DestinationClient + Send + Sync>,
    state: Arc<StateManager>,
    options: SyncOptions,

    /// Page slots shared by every cycle of this engine
    limiter: Arc<Semaphore>,
}

impl SyncEngine {
    /// Create a new engine
    ///
    /// `page_size` is raised to at least 1 and `max_concurrency` is clamped
    /// to `1..=MAX_CONCURRENCY`.
    pub fn new(
        source: Arc<dyn SourceClient + Send + Sync>,
        destination: Arc<dyn DestinationClient + Send + Sync>,
        state: Arc<StateManager>,
        mut options: SyncOptions,
    ) -> Self {
        if options.max_concurrency > MAX_CONCURRENCY {
            tracing::warn!(
                requested = options.max_concurrency,
                limit = MAX_CONCURRENCY,
                "max_concurrency above the source limit, clamping"
            );
        }
        options.max_concurrency = options.max_concurrency.clamp(1, MAX_CONCURRENCY);
        options.page_size = options.page_size.max(1);
        let limiter = Arc::new(Semaphore::new(options.max_concurrency));

        Self {
            source,
            destination,
            state,
            options,
            limiter,
        }
    }

    /// Options in effect after clamping
    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    /// Run one sync cycle for a collection
    ///
    /// # Errors
    ///
    /// Returns the first failure of the cycle wrapped in
    /// [`SyncError::Stage`]. The watermark is left untouched on error.
    pub async fn sync_collection(&self, collection_id: &CollectionId) -> Result<CollectionSyncReport> {
        let started = Instant::now();

        let watermark = self
            .state
            .load_watermark(collection_id)
            .await
            .at_stage(SyncStage::ReadWatermark)?;

        let cycle_start = Utc::now();
        let since = watermark.as_ref().map(Watermark::filter_value);

        match &since {
            Some(since) => tracing::info!(
                list_id = %collection_id,
                since = %since,
                "Starting incremental sync"
            ),
            None => tracing::info!(list_id = %collection_id, "No watermark found - full sync"),
        }

        let worker = PageWorker {
            source: self.source.clone(),
            destination: self.destination.clone(),
            collection_id: collection_id.clone(),
            since,
            page_size: self.options.page_size,
            dry_run: self.options.dry_run,
        };

        let mut report = CollectionSyncReport {
            collection_id: collection_id.clone(),
            total_items: 0,
            processed: 0,
            pages: 1,
            full_sync: watermark.is_none(),
            watermark_committed: false,
            cycle_start,
            duration: Duration::ZERO,
        };

        let page_zero = acquire(&self.limiter, 0).await?;
        let first = worker.fetch(0).await?;
        let total = first.total_items;
        report.total_items = total;

        if total == 0 {
            drop(page_zero);
            tracing::info!(list_id = %collection_id, "No changed members since last run");
            report.watermark_committed = self.commit(collection_id, cycle_start).await?;
            report.duration = started.elapsed();
            return Ok(report);
        }

        let pages = page_count(total, self.options.page_size);
        report.pages = pages;

        tracing::info!(
            list_id = %collection_id,
            total_items = total,
            pages = pages,
            page_size = self.options.page_size,
            "Syncing changed members"
        );

        worker.push(0, &first.members).await?;
        drop(page_zero);
        let mut processed = first.members.len();

        if pages > 1 {
            processed = self.drain_pages(&worker, pages, processed, total).await?;
        }
        report.processed = processed;

        if pages == 1 || processed >= total {
            report.watermark_committed = self.commit(collection_id, cycle_start).await?;
        } else {
            tracing::warn!(
                list_id = %collection_id,
                processed = processed,
                total_items = total,
                "Every page reported but fewer members than announced were seen, keeping watermark"
            );
        }

        report.duration = started.elapsed();

        tracing::info!(
            list_id = %collection_id,
            processed = report.processed,
            total_items = report.total_items,
            watermark_committed = report.watermark_committed,
            duration_ms = report.duration.as_millis() as u64,
            "Sync cycle completed"
        );

        Ok(report)
    }

    /// Fan out pages `1..pages` and consume their outcomes
    ///
    /// Returns the processed count once it reaches `total` or every task
    /// has reported. Tasks still running when this returns are left to
    /// finish; their reports are dropped with the receiver. On the first
    /// error, tasks that have not started yet are told to stand down.
    async fn drain_pages(
        &self,
        worker: &PageWorker,
        pages: usize,
        mut processed: usize,
        total: usize,
    ) -> Result<usize> {
        let (tx, mut rx) = mpsc::channel::<PageOutcome>(1);
        let (abort_tx, abort_rx) = watch::channel(false);

        for page in 1..pages {
            let worker = worker.clone();
            let limiter = self.limiter.clone();
            let tx = tx.clone();
            let abort = abort_rx.clone();

            tokio::spawn(async move {
                let result = match acquire(&limiter, page).await {
                    Ok(permit) => {
                        if *abort.borrow() {
                            tracing::debug!(
                                list_id = %worker.collection_id,
                                page = page,
                                "Cycle aborted, skipping page"
                            );
                            return;
                        }
                        let result = worker.run(page).await;
                        drop(permit);
                        result
                    }
                    Err(e) => Err(e),
                };

                // The consumer may already be gone; the outcome no longer matters then.
                let _ = tx.send(PageOutcome { page, result }).await;
            });
        }
        drop(tx);

        let expected = pages - 1;
        let mut reported = 0;

        while processed < total {
            let Some(outcome) = rx.recv().await else {
                if reported < expected {
                    return Err(SyncError::Other(format!(
                        "{} of {expected} page tasks exited without reporting",
                        expected - reported
                    ))
                    .at(SyncStage::DrainResults));
                }
                break;
            };

            reported += 1;
            match outcome.result {
                Ok(count) => {
                    processed += count;
                    tracing::debug!(
                        list_id = %worker.collection_id,
                        page = outcome.page,
                        count = count,
                        processed = processed,
                        total_items = total,
                        "Page synced"
                    );
                }
                Err(e) => {
                    let _ = abort_tx.send(true);
                    tracing::error!(
                        list_id = %worker.collection_id,
                        page = outcome.page,
                        error = %e,
                        "Page failed, aborting cycle"
                    );
                    return Err(e);
                }
            }
        }

        Ok(processed)
    }

    async fn commit(&self, collection_id: &CollectionId, cycle_start: DateTime<Utc>) -> Result<bool> {
        if self.options.dry_run {
            tracing::info!(list_id = %collection_id, "Dry run: watermark not committed");
            return Ok(false);
        }

        let watermark = Watermark::new(collection_id.clone(), cycle_start);
        self.state
            .commit_watermark(&watermark)
            .await
            .at_stage(SyncStage::CommitWatermark)?;
        Ok(true)
    }
}

/// Wait for a page slot
async fn acquire(limiter: &Arc<Semaphore>, page: usize) -> Result<OwnedSemaphorePermit> {
    limiter
        .clone()
        .acquire_owned()
        .await
        .map_err(|_| SyncError::Other("page limiter closed".to_string()).at(SyncStage::FetchPage(page)))
}

/// Report of one page task
struct PageOutcome {
    page: usize,
    result: Result<usize>,
}

/// Everything a page task needs, cheap to clone into each task
#[derive(Clone)]
struct PageWorker {
    source: Arc<dyn SourceClient + Send + Sync>,
    destination: Arc<dyn DestinationClient + Send + Sync>,
    collection_id: CollectionId,
    since: Option<String>,
    page_size: usize,
    dry_run: bool,
}

impl PageWorker {
    async fn fetch(&self, page: usize) -> Result<MembersPage> {
        self.source
            .fetch_page(
                &self.collection_id,
                page * self.page_size,
                self.page_size,
                self.since.as_deref(),
            )
            .await
            .at_stage(SyncStage::FetchPage(page))
    }

    async fn push(&self, page: usize, members: &[Member]) -> Result<()> {
        if members.is_empty() {
            return Ok(());
        }

        let contacts = to_contacts(members);

        if self.dry_run {
            tracing::debug!(
                list_id = %self.collection_id,
                page = page,
                contacts = contacts.len(),
                "Dry run: skipping push"
            );
            return Ok(());
        }

        self.destination
            .push_batch(&contacts)
            .await
            .at_stage(SyncStage::PushPage(page))
    }

    async fn run(&self, page: usize) -> Result<usize> {
        let fetched = self.fetch(page).await?;
        self.push(page, &fetched.members).await?;
        Ok(fetched.members.len())
    }
}
