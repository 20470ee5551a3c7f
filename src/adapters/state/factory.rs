//! Watermark store factory
//!
//! This module creates the watermark store selected by configuration.

use crate::adapters::state::{MemoryWatermarkStore, RedisWatermarkStore};
use crate::adapters::traits::WatermarkStore;
use crate::config::{ListSyncConfig, StateBackend};
use crate::domain::{Result, SyncError};
use std::sync::Arc;

/// Create a watermark store based on the configuration
///
/// # Errors
///
/// Returns an error if the Redis section is missing or the server is unreachable
pub async fn create_watermark_store(
    config: &ListSyncConfig,
) -> Result<Arc<dyn WatermarkStore + Send + Sync>> {
    match config.state.backend {
        StateBackend::Redis => {
            let redis_config = config.state.redis.as_ref().ok_or_else(|| {
                SyncError::Configuration(
                    "state.redis configuration is required when state.backend = 'redis'"
                        .to_string(),
                )
            })?;

            tracing::info!("Creating Redis watermark store");
            let store = RedisWatermarkStore::connect(redis_config).await?;

            Ok(Arc::new(store) as Arc<dyn WatermarkStore + Send + Sync>)
        }
        StateBackend::Memory => {
            tracing::warn!("Using in-memory watermark store; watermarks are lost on exit");
            Ok(Arc::new(MemoryWatermarkStore::new()) as Arc<dyn WatermarkStore + Send + Sync>)
        }
    }
}
