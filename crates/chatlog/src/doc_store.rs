//! HTTP client for the remote document store.
//!
//! Records go to `POST {endpoint}/dbs/{database}/colls/{container}/docs`;
//! the store assigns each document's identifier and echoes it back.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use ragline_core::error::StoreError;
use ragline_core::message::ChatLogRecord;
use ragline_core::service::ChatLogStore;

pub struct DocStoreClient {
    endpoint: String,
    api_key: String,
    database: String,
    container: String,
    client: reqwest::Client,
}

impl DocStoreClient {
    /// Create a new client with a bounded per-request timeout.
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        database: impl Into<String>,
        container: impl Into<String>,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            database: database.into(),
            container: container.into(),
            client,
        }
    }

    fn docs_url(&self) -> String {
        format!(
            "{}/dbs/{}/colls/{}/docs",
            self.endpoint, self.database, self.container
        )
    }
}

#[async_trait]
impl ChatLogStore for DocStoreClient {
    async fn insert(&self, record: &ChatLogRecord) -> Result<String, StoreError> {
        let url = self.docs_url();

        debug!(user = %record.user, "Writing chat log record");

        let response = self
            .client
            .post(&url)
            .header("api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(record)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    StoreError::Timeout(e.to_string())
                } else {
                    StoreError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        if status != 200 && status != 201 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Store returned error");
            return Err(StoreError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let created: CreatedDocument = response.json().await.map_err(|e| StoreError::ApiError {
            status_code: status,
            message: format!("Failed to parse store response: {e}"),
        })?;

        Ok(created.id)
    }
}

#[derive(Debug, Deserialize)]
struct CreatedDocument {
    id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn docs_url_shape() {
        let client =
            DocStoreClient::new("https://logs.example.net/", "key", "chat", "messages");
        assert_eq!(
            client.docs_url(),
            "https://logs.example.net/dbs/chat/colls/messages/docs"
        );
    }

    #[test]
    fn parse_created_document() {
        let created: CreatedDocument =
            serde_json::from_str(r#"{"id": "8b7c", "_etag": "x"}"#).unwrap();
        assert_eq!(created.id, "8b7c");
    }
}
