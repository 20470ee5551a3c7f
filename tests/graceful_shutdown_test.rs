//! Integration tests for sweeps and graceful shutdown
//!
//! These tests verify that:
//! - A sweep visits every selected list in turn
//! - A failing list is recorded and the sweep moves on
//! - A shutdown request stops the sweep between lists

mod common;

use common::*;
use listsync::adapters::state::MemoryWatermarkStore;
use listsync::adapters::traits::WatermarkStore;
use listsync::core::state::StateManager;
use listsync::core::sync::{SweepCoordinator, SyncEngine, SyncOptions};
use listsync::domain::SyncStage;
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::watch;

struct Sweep {
    source: Arc<FakeSource>,
    store: Arc<MemoryWatermarkStore>,
    coordinator: SweepCoordinator,
    shutdown_tx: watch::Sender<bool>,
}

fn sweep(list_ids: &[&str], allow_list: Vec<String>) -> Sweep {
    let source = Arc::new(FakeSource::with_members(generate_members(20)).with_collections(list_ids));
    let store = Arc::new(MemoryWatermarkStore::new());
    let state = Arc::new(StateManager::new(store.clone(), Some("ls".to_string())));
    let engine = Arc::new(SyncEngine::new(
        source.clone(),
        Arc::new(FakeDestination::new()),
        state,
        SyncOptions {
            page_size: 10,
            ..SyncOptions::default()
        },
    ));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let coordinator = SweepCoordinator::new(source.clone(), engine, allow_list, shutdown_rx);

    Sweep {
        source,
        store,
        coordinator,
        shutdown_tx,
    }
}

fn set(ids: &[&str]) -> BTreeSet<String> {
    ids.iter().map(|s| s.to_string()).collect()
}

fn fetched_lists(source: &FakeSource) -> BTreeSet<String> {
    source.calls().into_iter().map(|c| c.list_id).collect()
}

#[tokio::test]
async fn test_shutdown_signal_propagation() {
    let (shutdown_tx, shutdown_rx1) = watch::channel(false);
    let shutdown_rx2 = shutdown_rx1.clone();

    assert!(!*shutdown_rx1.borrow());
    assert!(!*shutdown_rx2.borrow());

    shutdown_tx.send(true).unwrap();

    assert!(*shutdown_rx1.borrow());
    assert!(*shutdown_rx2.borrow());
}

#[tokio::test]
async fn test_sweep_syncs_every_list() {
    let sweep = sweep(&["a", "b", "c"], vec![]);

    let summary = sweep.coordinator.run_sweep().await.unwrap();

    assert_eq!(summary.total_collections, 3);
    assert_eq!(summary.completed.len(), 3);
    assert!(summary.is_successful());
    assert_eq!(summary.total_processed(), 60);
    assert_eq!(summary.watermarks_committed(), 3);
    assert_eq!(
        fetched_lists(&sweep.source),
        set(&["a", "b", "c"])
    );
    assert!(sweep.store.get("ls:b").await.unwrap().is_some());
}

#[tokio::test]
async fn test_allow_list_limits_sweep() {
    let sweep = sweep(&["a", "b", "c"], vec!["b".to_string(), "missing".to_string()]);

    let summary = sweep.coordinator.run_sweep().await.unwrap();

    assert_eq!(summary.total_collections, 1);
    assert_eq!(
        fetched_lists(&sweep.source),
        set(&["b"])
    );
}

#[tokio::test]
async fn test_failed_list_does_not_stop_sweep() {
    let sweep = sweep(&["a", "b", "c"], vec![]);
    sweep.store.set("ls:b", "not-a-timestamp").await.unwrap();

    let summary = sweep.coordinator.run_sweep().await.unwrap();

    assert!(!summary.is_successful());
    assert_eq!(summary.completed.len(), 2);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].collection_id.as_str(), "b");
    assert_eq!(summary.failures[0].stage, Some(SyncStage::ReadWatermark));

    // The broken watermark is left for an operator to inspect
    assert_eq!(
        sweep.store.get("ls:b").await.unwrap().as_deref(),
        Some("not-a-timestamp")
    );
    assert!(sweep.store.get("ls:c").await.unwrap().is_some());
}

#[tokio::test]
async fn test_shutdown_before_sweep_skips_every_list() {
    let sweep = sweep(&["a", "b"], vec![]);
    sweep.shutdown_tx.send(true).unwrap();

    let summary = sweep.coordinator.run_sweep().await.unwrap();

    assert!(summary.was_interrupted());
    assert_eq!(summary.skipped, 2);
    assert!(summary.completed.is_empty());
    assert_eq!(sweep.source.call_count(), 0);
    assert!(sweep.store.is_empty());
}
