//! Run command implementation
//!
//! This module implements the `run` command: one sweep over every selected
//! list per scheduler tick, or a single sweep with `--once`.

use crate::adapters::mailchimp::MailchimpClient;
use crate::adapters::ometria::OmetriaClient;
use crate::adapters::state::create_watermark_store;
use crate::cli::exit_code_for;
use crate::config::loader::split_list;
use crate::config::{load_config, ListSyncConfig};
use crate::core::state::StateManager;
use crate::core::sync::{SweepCoordinator, SweepSummary, SyncEngine, SyncOptions};
use clap::Args;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Run a single sweep and exit
    #[arg(long)]
    pub once: bool,

    /// Fetch and transform without pushing contacts or committing watermarks
    #[arg(long)]
    pub dry_run: bool,

    /// Override list ID(s) to sync (comma-separated)
    #[arg(long)]
    pub list_id: Option<String>,
}

impl RunArgs {
    /// Execute the run command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting run command");

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(2); // Configuration error exit code
            }
        };
        self.apply_overrides(&mut config);

        if config.application.dry_run {
            tracing::info!("Dry run mode enabled - nothing will be pushed or committed");
            println!("🔍 DRY RUN MODE - No contacts will be pushed and no watermarks saved");
            println!();
        }

        let coordinator = match build_coordinator(&config, shutdown_signal.clone()).await {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to initialize sync");
                eprintln!("Failed to initialize sync: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        if self.once {
            return Ok(match coordinator.run_sweep().await {
                Ok(summary) => {
                    print_summary(&summary);
                    if summary.is_successful() {
                        0
                    } else {
                        1 // Partial failure exit code
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "Sweep failed");
                    eprintln!("Sweep failed: {e}");
                    exit_code_for(&e)
                }
            });
        }

        run_scheduled(
            &coordinator,
            Duration::from_secs(config.schedule.run_interval_seconds),
            shutdown_signal,
        )
        .await;

        Ok(0)
    }

    fn apply_overrides(&self, config: &mut ListSyncConfig) {
        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.application.dry_run = true;
        }

        if let Some(list_ids) = &self.list_id {
            let ids = split_list(list_ids);
            tracing::info!(list_ids = ?ids, "Overriding list IDs from CLI");
            config.source.list_ids = ids;
        }
    }
}

/// Wire the clients, the watermark store and the engine together
///
/// The watermark store is probed once here so an unreachable store stops
/// the process before the first cycle.
async fn build_coordinator(
    config: &ListSyncConfig,
    shutdown_signal: watch::Receiver<bool>,
) -> crate::domain::Result<SweepCoordinator> {
    let source = Arc::new(MailchimpClient::new(&config.source)?);
    let destination = Arc::new(OmetriaClient::new(&config.destination)?);

    let store = create_watermark_store(config).await?;
    let state = Arc::new(StateManager::new(store, config.state.key_prefix.clone()));
    state.ping().await?;

    tracing::info!(
        source = %source.base_url(),
        destination = %destination.endpoint(),
        state_backend = state.backend_name(),
        "Sync components ready"
    );

    let engine = Arc::new(SyncEngine::new(
        source.clone(),
        destination,
        state,
        SyncOptions::from_config(config),
    ));

    Ok(SweepCoordinator::new(
        source,
        engine,
        config.source.list_ids.clone(),
        shutdown_signal,
    ))
}

/// Sweep on every tick until shutdown is requested
///
/// The first sweep starts immediately. A sweep that overruns the interval
/// delays the next tick instead of bunching missed ones.
async fn run_scheduled(
    coordinator: &SweepCoordinator,
    interval: Duration,
    mut shutdown_signal: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tracing::info!(interval_secs = interval.as_secs(), "Scheduler started");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match coordinator.run_sweep().await {
                    Ok(summary) if !summary.is_successful() => {
                        tracing::warn!(failed = summary.failures.len(), "Sweep finished with failures");
                    }
                    Ok(_) => {}
                    Err(e) => tracing::error!(error = %e, "Sweep failed, retrying on next tick"),
                }

                if *shutdown_signal.borrow() {
                    break;
                }
            }
            changed = shutdown_signal.changed() => {
                if changed.is_err() || *shutdown_signal.borrow() {
                    break;
                }
            }
        }
    }

    tracing::info!("Scheduler stopped");
}

fn print_summary(summary: &SweepSummary) {
    println!();
    println!("📊 Sweep Summary:");
    println!("  Lists: {}", summary.total_collections);
    println!("  Succeeded: {}", summary.completed.len());
    println!("  Failed: {}", summary.failures.len());
    if summary.was_interrupted() {
        println!("  Skipped (shutdown): {}", summary.skipped);
    }
    println!("  Members processed: {}", summary.total_processed());
    println!("  Watermarks committed: {}", summary.watermarks_committed());
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());

    if !summary.failures.is_empty() {
        println!();
        println!("  ⚠️  Failures:");
        for failure in &summary.failures {
            println!("    - {}: {}", failure.collection_id, failure.message);
        }
    }
    println!();
}
