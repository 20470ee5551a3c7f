//! # listsync - incremental list to contact sync
//!
//! listsync periodically copies changed contacts from a Mailchimp-style CRM
//! into an Ometria-style marketing-data API. Every list carries a watermark:
//! the start time of its last fully successful sync cycle. The next cycle
//! asks the source only for members changed since then.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Sync engine, sweep coordinator, state and transformation
//! - [`adapters`] - Source, destination and watermark store integrations
//! - [`domain`] - Domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Sync cycle
//!
//! A cycle reads the watermark, fetches page 0 with the changed-since
//! filter, then fetches the remaining pages concurrently (never more than
//! nine at once) and pushes each page as soon as it arrives. The watermark
//! only moves when every member was pushed; any failure leaves it where it
//! was, so the next cycle retries the same window. Delivery is
//! at-least-once.
//!
//! ## Error Handling
//!
//! Library functions return [`domain::Result`], whose error is
//! [`domain::SyncError`]. Cycle failures carry the stage they happened in:
//!
//! ```rust
//! use listsync::domain::{SourceError, StageContext, SyncError, SyncStage};
//!
//! let fetched: Result<(), SourceError> = Err(SourceError::Timeout("30s".to_string()));
//! let err = fetched.at_stage(SyncStage::FetchPage(4)).unwrap_err();
//!
//! assert_eq!(err.stage(), Some(&SyncStage::FetchPage(4)));
//! assert!(matches!(err.root(), SyncError::Source(_)));
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
