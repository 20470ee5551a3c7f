//! State manager for watermark persistence
//!
//! This module provides the StateManager for loading and saving watermarks
//! through a [`WatermarkStore`] backend.

use crate::adapters::traits::WatermarkStore;
use crate::core::state::watermark::Watermark;
use crate::domain::ids::CollectionId;
use crate::domain::Result;
use std::sync::Arc;

/// State manager for watermark persistence
///
/// Owns the key layout and value format; the store only sees strings.
pub struct StateManager {
    /// Watermark storage backend
    store: Arc<dyn WatermarkStore + Send + Sync>,

    /// Optional key prefix, joined to the collection id with `:`
    key_prefix: Option<String>,
}

impl StateManager {
    /// Create a new StateManager over a store
    ///
    /// # Arguments
    ///
    /// * `store` - Watermark store implementation
    /// * `key_prefix` - Optional namespace for keys; blank prefixes are ignored
    pub fn new(store: Arc<dyn WatermarkStore + Send + Sync>, key_prefix: Option<String>) -> Self {
        Self {
            store,
            key_prefix: key_prefix.filter(|p| !p.trim().is_empty()),
        }
    }

    /// Store key for a collection
    pub fn key_for(&self, collection_id: &CollectionId) -> String {
        match &self.key_prefix {
            Some(prefix) => format!("{prefix}:{collection_id}"),
            None => collection_id.to_string(),
        }
    }

    /// Load the watermark of a collection
    ///
    /// # Returns
    ///
    /// `Ok(None)` if the collection was never synced successfully.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or holds an unparseable value.
    pub async fn load_watermark(&self, collection_id: &CollectionId) -> Result<Option<Watermark>> {
        let key = self.key_for(collection_id);

        match self.store.get(&key).await? {
            Some(value) => Watermark::parse(collection_id.clone(), &value).map(Some),
            None => Ok(None),
        }
    }

    /// Persist a watermark, replacing the previous one
    pub async fn commit_watermark(&self, watermark: &Watermark) -> Result<()> {
        let key = self.key_for(&watermark.collection_id);

        tracing::debug!(
            list_id = %watermark.collection_id,
            key = %key,
            last_completed_at = %watermark.filter_value(),
            "Committing watermark"
        );

        self.store.set(&key, &watermark.to_stored()).await
    }

    /// Check connectivity to the backing store
    pub async fn ping(&self) -> Result<()> {
        self.store.ping().await
    }

    /// Name of the backing store
    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }
}
