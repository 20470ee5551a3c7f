//! Domain models and types for listsync.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`CollectionId`])
//! - **Source records** ([`Collection`], [`Member`], [`MembersPage`])
//! - **Destination records** ([`Contact`])
//! - **Error types** ([`SyncError`], [`SourceError`], [`DestinationError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, SyncError>`]. Errors raised
//! inside a sync cycle carry the [`SyncStage`] they happened in:
//!
//! ```rust
//! use listsync::domain::{SourceError, StageContext, SyncStage};
//!
//! let fetched: Result<(), SourceError> =
//!     Err(SourceError::Timeout("30s".to_string()));
//! let err = fetched.at_stage(SyncStage::FetchPage(0)).unwrap_err();
//! assert_eq!(err.stage(), Some(&SyncStage::FetchPage(0)));
//! ```

pub mod collection;
pub mod contact;
pub mod errors;
pub mod ids;
pub mod member;
pub mod result;

pub use collection::{Collection, CollectionStats};
pub use contact::Contact;
pub use errors::{DestinationError, SourceError, StageContext, SyncError, SyncStage};
pub use ids::CollectionId;
pub use member::{Member, MembersPage, MergeFields};
pub use result::Result;
