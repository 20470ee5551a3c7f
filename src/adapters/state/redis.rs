//! Redis watermark store
//!
//! Watermarks are plain string keys. The connection manager reconnects on
//! its own, so one store is shared by every cycle of the process.

use crate::adapters::traits::WatermarkStore;
use crate::config::RedisConfig;
use crate::domain::{Result, SyncError};
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use secrecy::ExposeSecret;

/// Watermark store backed by a Redis server
#[derive(Clone)]
pub struct RedisWatermarkStore {
    manager: ConnectionManager,
}

impl RedisWatermarkStore {
    /// Connect to Redis
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::State`] if the URL is invalid or the first
    /// connection cannot be established.
    pub async fn connect(config: &RedisConfig) -> Result<Self> {
        let client = redis::Client::open(config.url.expose_secret().as_str())
            .map_err(|e| backend_error("redis client open", e))?;
        let manager = ConnectionManager::new(client)
            .await
            .map_err(|e| backend_error("redis connect", e))?;

        tracing::info!("Connected to Redis watermark store");
        Ok(Self { manager })
    }
}

#[async_trait]
impl WatermarkStore for RedisWatermarkStore {
    async fn ping(&self) -> Result<()> {
        let mut conn = self.manager.clone();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| backend_error("redis ping", e))?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.manager.clone();
        let val: Option<String> = conn
            .get(key)
            .await
            .map_err(|e| backend_error("redis get", e))?;
        Ok(val)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut conn = self.manager.clone();
        let _: () = conn
            .set(key, value)
            .await
            .map_err(|e| backend_error("redis set", e))?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}

fn backend_error(op: &str, err: redis::RedisError) -> SyncError {
    SyncError::State(format!("{op} failed: {err}"))
}
