//! Ometria destination client

use crate::adapters::traits::DestinationClient;
use crate::config::{DestinationConfig, SecretString};
use crate::domain::{Contact, DestinationError, Result, SyncError};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, StatusCode};
use secrecy::ExposeSecret;
use std::time::Duration;

/// HTTP client for the Ometria contact import endpoint
///
/// A batch is posted as one JSON array. The endpoint answers `201 Created`
/// when it accepted the whole batch; anything else rejects it.
pub struct OmetriaClient {
    endpoint: String,
    api_key: SecretString,
    client: Client,
}

impl OmetriaClient {
    /// Create a new client from configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    pub fn new(config: &DestinationConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| SyncError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            client,
        })
    }

    /// Endpoint batches are posted to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl DestinationClient for OmetriaClient {
    async fn push_batch(&self, contacts: &[Contact]) -> Result<()> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", self.api_key.expose_secret().as_str())
            .json(contacts)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DestinationError::Timeout(e.to_string())
                } else {
                    DestinationError::ConnectionFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if status != StatusCode::CREATED {
            let message = response.text().await.unwrap_or_default();
            return Err(DestinationError::Rejected {
                status: status.as_u16(),
                message: message.chars().take(512).collect(),
            }
            .into());
        }

        tracing::debug!(contacts = contacts.len(), "Batch accepted by destination");
        Ok(())
    }
}
