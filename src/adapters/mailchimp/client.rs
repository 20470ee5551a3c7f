//! Mailchimp source client
//!
//! One stateless HTTP call per operation, authenticated with basic auth on
//! every request. No retries: a failed page fails the cycle, and the next
//! scheduled cycle re-reads from the same watermark.

use super::models::{member_page_query, ListsResponse, BASIC_AUTH_USER, LIST_PAGE_SIZE};
use crate::adapters::traits::SourceClient;
use crate::config::{SecretString, SourceConfig};
use crate::domain::ids::CollectionId;
use crate::domain::{Collection, MembersPage, Result, SourceError, SyncError};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// HTTP client for the Mailchimp marketing API
///
/// # Example
///
/// ```no_run
/// use listsync::adapters::mailchimp::MailchimpClient;
/// use listsync::adapters::traits::SourceClient;
/// use listsync::config::{secret_string, SourceConfig};
///
/// # async fn example() -> listsync::domain::Result<()> {
/// let config = SourceConfig {
///     base_url: "https://us1.api.mailchimp.com/3.0".to_string(),
///     api_key: secret_string("key-us1".to_string()),
///     timeout_seconds: 60,
///     page_size: 900,
///     max_concurrency: 9,
///     list_ids: vec![],
/// };
///
/// let client = MailchimpClient::new(&config)?;
/// let lists = client.list_collections().await?;
/// # Ok(())
/// # }
/// ```
pub struct MailchimpClient {
    /// API base URL without trailing slash
    base_url: String,

    api_key: SecretString,

    client: Client,
}

impl MailchimpClient {
    /// Create a new client from configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| SyncError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            client,
        })
    }

    /// Base URL of the API
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> std::result::Result<T, SourceError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .basic_auth(BASIC_AUTH_USER, Some(self.api_key.expose_secret().as_str()))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(map_transport_error)?;

        if !status.is_success() {
            let message = truncate(&body, 512);
            return Err(if status.is_server_error() {
                SourceError::ServerError {
                    status: status.as_u16(),
                    message,
                }
            } else {
                SourceError::ClientError {
                    status: status.as_u16(),
                    message,
                }
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            SourceError::InvalidResponse(format!("unable to decode response body: {e}"))
        })
    }
}

#[async_trait]
impl SourceClient for MailchimpClient {
    async fn fetch_page(
        &self,
        collection_id: &CollectionId,
        offset: usize,
        count: usize,
        since: Option<&str>,
    ) -> Result<MembersPage> {
        let url = format!("{}/lists/{}/members", self.base_url, collection_id);
        let query = member_page_query(offset, count, since);

        tracing::debug!(
            list_id = %collection_id,
            offset = offset,
            count = count,
            since = since.unwrap_or(""),
            "Fetching members page"
        );

        let page: MembersPage = self.get_json(&url, &query).await?;
        Ok(page)
    }

    async fn list_collections(&self) -> Result<Vec<Collection>> {
        let url = format!("{}/lists", self.base_url);
        let query = [
            ("count", LIST_PAGE_SIZE.to_string()),
            ("include_total_contacts", "true".to_string()),
        ];

        let response: ListsResponse = self.get_json(&url, &query).await?;

        tracing::info!(count = response.lists.len(), "Fetched lists from source");
        Ok(response.lists)
    }
}

fn map_transport_error(e: reqwest::Error) -> SourceError {
    if e.is_timeout() {
        SourceError::Timeout(e.to_string())
    } else {
        SourceError::ConnectionFailed(e.to_string())
    }
}

fn truncate(body: &str, max_chars: usize) -> String {
    match body.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
