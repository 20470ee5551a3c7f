//! Core business logic for listsync.
//!
//! # Modules
//!
//! - [`state`] - Watermarks and the state manager that persists them
//! - [`sync`] - The per-collection sync engine and the sweep coordinator
//! - [`transform`] - Member to contact mapping
//!
//! # Sync Workflow
//!
//! For every collection of a sweep:
//!
//! 1. **Load State**: Read the collection's watermark
//! 2. **Fetch**: Page 0 with the changed-since filter, which announces the total
//! 3. **Fan Out**: Remaining pages under a concurrency cap
//! 4. **Transform and Push**: Each page as soon as it arrives
//! 5. **Commit**: Advance the watermark to the cycle start once every member is pushed
//! 6. **Report**: Collect a sweep summary
//!
//! # Example
//!
//! ```rust,no_run
//! use listsync::adapters::mailchimp::MailchimpClient;
//! use listsync::adapters::ometria::OmetriaClient;
//! use listsync::adapters::state::create_watermark_store;
//! use listsync::config::load_config;
//! use listsync::core::state::StateManager;
//! use listsync::core::sync::{SweepCoordinator, SyncEngine, SyncOptions};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("listsync.toml")?;
//!
//! let source = Arc::new(MailchimpClient::new(&config.source)?);
//! let destination = Arc::new(OmetriaClient::new(&config.destination)?);
//! let store = create_watermark_store(&config).await?;
//! let state = Arc::new(StateManager::new(store, config.state.key_prefix.clone()));
//!
//! let engine = Arc::new(SyncEngine::new(
//!     source.clone(),
//!     destination,
//!     state,
//!     SyncOptions::from_config(&config),
//! ));
//!
//! let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//! let coordinator = SweepCoordinator::new(source, engine, config.source.list_ids.clone(), shutdown_rx);
//!
//! let summary = coordinator.run_sweep().await?;
//! println!("Processed: {}", summary.total_processed());
//! # Ok(())
//! # }
//! ```

pub mod state;
pub mod sync;
pub mod transform;
