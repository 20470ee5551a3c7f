//! Adapter traits
//!
//! This module defines the traits the sync engine depends on. Each trait is
//! implemented by an HTTP or storage adapter and by the fakes used in tests.

use crate::domain::ids::CollectionId;
use crate::domain::{Collection, Contact, MembersPage, Result};
use async_trait::async_trait;

/// Read side: the source CRM API
///
/// Implementations are stateless per call and safe to call concurrently.
#[async_trait]
pub trait SourceClient: Send + Sync {
    /// Fetch one page of members
    ///
    /// # Arguments
    ///
    /// * `collection_id` - List to read from
    /// * `offset` - Number of members to skip
    /// * `count` - Page size
    /// * `since` - Only members changed since this RFC 3339 timestamp; `None`
    ///   fetches everything
    ///
    /// # Errors
    ///
    /// Returns an error on connection failure, non-success status or an
    /// undecodable body. An offset past the end yields an empty page, not an
    /// error.
    async fn fetch_page(
        &self,
        collection_id: &CollectionId,
        offset: usize,
        count: usize,
        since: Option<&str>,
    ) -> Result<MembersPage>;

    /// List all collections visible to the configured credential
    async fn list_collections(&self) -> Result<Vec<Collection>>;
}

/// Write side: the destination marketing-data API
#[async_trait]
pub trait DestinationClient: Send + Sync {
    /// Push one batch of contacts
    ///
    /// The batch is atomic from the caller's point of view: any outcome other
    /// than the destination's "created" status is an error for the whole batch.
    async fn push_batch(&self, contacts: &[Contact]) -> Result<()>;
}

/// Durable key-value storage for run watermarks
///
/// Values are opaque strings to the store; [`crate::core::state::StateManager`]
/// owns their format.
#[async_trait]
pub trait WatermarkStore: Send + Sync {
    /// Check connectivity to the store
    async fn ping(&self) -> Result<()>;

    /// Read the value stored under `key`, `Ok(None)` when absent
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Short backend name for logs
    fn backend_name(&self) -> &'static str;
}
