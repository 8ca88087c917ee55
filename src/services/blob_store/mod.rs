//! Blob store collaborator.
//!
//! Hosts the off-chain metadata JSON a mint's URI points at. The provider
//! behind the endpoint is deliberately opaque: upload a document, get back a
//! public URL.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("upload request failed: {0}")]
    Request(String),

    #[error("blob store returned no URL")]
    MissingUrl,

    #[error("fetching {url} failed: {reason}")]
    Fetch { url: String, reason: String },
}

#[async_trait]
#[cfg_attr(test, automock)]
pub trait BlobStoreTrait: Send + Sync {
    /// Uploads a JSON document, returning the public URL it is served from.
    async fn upload_json(&self, file_name: &str, document: &Value) -> Result<String, UploadError>;

    /// Fetches a hosted JSON document (e.g. to resolve a token's image).
    async fn fetch_json(&self, url: &str) -> Result<Value, UploadError>;
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    url: Option<String>,
}

/// HTTP blob store client.
pub struct HttpBlobStore {
    base_url: String,
    client: Client,
}

impl HttpBlobStore {
    pub fn new(base_url: String) -> Result<Self, UploadError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| UploadError::Request(e.to_string()))?;

        Ok(Self { base_url, client })
    }
}

#[async_trait]
impl BlobStoreTrait for HttpBlobStore {
    async fn upload_json(&self, file_name: &str, document: &Value) -> Result<String, UploadError> {
        let response = self
            .client
            .post(format!("{}/upload", self.base_url))
            .json(&serde_json::json!({
                "file_name": file_name,
                "content": document,
            }))
            .send()
            .await
            .map_err(|e| UploadError::Request(e.to_string()))?
            .error_for_status()
            .map_err(|e| UploadError::Request(e.to_string()))?;

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| UploadError::Request(e.to_string()))?;

        body.url.ok_or(UploadError::MissingUrl)
    }

    async fn fetch_json(&self, url: &str) -> Result<Value, UploadError> {
        self.client
            .get(url)
            .send()
            .await
            .map_err(|e| UploadError::Fetch {
                url: url.to_string(),
                reason: e.to_string(),
            })?
            .error_for_status()
            .map_err(|e| UploadError::Fetch {
                url: url.to_string(),
                reason: e.to_string(),
            })?
            .json()
            .await
            .map_err(|e| UploadError::Fetch {
                url: url.to_string(),
                reason: e.to_string(),
            })
    }
}
