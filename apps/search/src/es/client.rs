//! Elasticsearch transport

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value as JsonValue;

use crate::config::ElasticsearchConfig;
use crate::error::{Error, Result};

/// Sends a search body to an index and returns the raw response
#[async_trait]
pub trait EsTransport: Send + Sync {
    async fn search(&self, index: &str, body: &JsonValue) -> Result<JsonValue>;
}

/// `EsTransport` over HTTP
pub struct EsClient {
    client: Client,
    base_url: String,
}

impl EsClient {
    pub fn new(config: &ElasticsearchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl EsTransport for EsClient {
    async fn search(&self, index: &str, body: &JsonValue) -> Result<JsonValue> {
        let url = format!("{}/{}/_search", self.base_url, index);
        tracing::trace!(url = %url, "Sending Elasticsearch search");

        let response = self.client.post(&url).json(body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(Error::ElasticsearchResponse {
                status: status.as_u16(),
                message,
            });
        }

        let json: JsonValue = response.json().await?;
        if !json.is_object() {
            return Err(Error::ElasticsearchResponse {
                status: status.as_u16(),
                message: "response body is not an object".to_string(),
            });
        }
        Ok(json)
    }
}
