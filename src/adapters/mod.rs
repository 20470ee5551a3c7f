//! External system integrations for listsync.
//!
//! - [`mailchimp`] - source CRM API (lists and member pages)
//! - [`ometria`] - destination contact import API
//! - [`state`] - watermark stores (Redis, in-memory)
//! - [`traits`] - the seams the sync engine depends on
//!
//! The engine only sees the traits, so tests swap in instrumented fakes.

pub mod mailchimp;
pub mod ometria;
pub mod state;
pub mod traits;

pub use traits::{DestinationClient, SourceClient, WatermarkStore};
