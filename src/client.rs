//! Typed HTTP client for the summarizer API, used by the [`Workbench`].
//!
//! [`Workbench`]: crate::workbench::Workbench

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use crate::api::models::{
    BlogRequest, BlogResponse, BulkDeleteRequest, BulkDeleteResponse, DeleteRequest,
    DeleteResponse, HistoryEntry, SaveBlogRequest, SaveBlogResponse,
};
use crate::error::ErrorResponse;
use crate::history::SummaryRecord;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("server reported the operation as unsuccessful")]
    Unsuccessful,
}

/// The operations the workbench needs from the summarizer service.
#[async_trait]
pub trait BlogBackend: Send + Sync {
    /// Runs the full summarize cycle; the returned record is already persisted.
    async fn summarize(&self, url: &str) -> Result<SummaryRecord, ClientError>;

    async fn history(&self) -> Result<Vec<SummaryRecord>, ClientError>;

    async fn delete(&self, id: i64) -> Result<(), ClientError>;

    async fn delete_many(&self, ids: &[i64]) -> Result<u64, ClientError>;
}

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Full response of `POST /blog`, including the source text.
    pub async fn digest(&self, url: &str) -> Result<BlogResponse, ClientError> {
        let res = self
            .client
            .post(self.url("/blog"))
            .json(&BlogRequest { url: url.to_string() })
            .send()
            .await?;
        decode(res).await
    }

    pub async fn save_blog(&self, url: &str, full_text: &str) -> Result<i64, ClientError> {
        let res = self
            .client
            .post(self.url("/saveBlog"))
            .json(&SaveBlogRequest {
                url: url.to_string(),
                full_text: full_text.to_string(),
            })
            .send()
            .await?;
        let body: SaveBlogResponse = decode(res).await?;
        match (body.success, body.id) {
            (true, Some(id)) => Ok(id),
            _ => Err(ClientError::Unsuccessful),
        }
    }
}

#[async_trait]
impl BlogBackend for ApiClient {
    async fn summarize(&self, url: &str) -> Result<SummaryRecord, ClientError> {
        Ok(self.digest(url).await?.record.into())
    }

    async fn history(&self) -> Result<Vec<SummaryRecord>, ClientError> {
        let res = self.client.get(self.url("/history")).send().await?;
        let entries: Vec<HistoryEntry> = decode(res).await?;
        Ok(entries.into_iter().map(SummaryRecord::from).collect())
    }

    async fn delete(&self, id: i64) -> Result<(), ClientError> {
        let res = self
            .client
            .delete(self.url("/history"))
            .json(&DeleteRequest { id })
            .send()
            .await?;
        let body: DeleteResponse = decode(res).await?;
        if body.success { Ok(()) } else { Err(ClientError::Unsuccessful) }
    }

    async fn delete_many(&self, ids: &[i64]) -> Result<u64, ClientError> {
        let res = self
            .client
            .delete(self.url("/history/bulk"))
            .json(&BulkDeleteRequest { ids: ids.to_vec() })
            .send()
            .await?;
        let body: BulkDeleteResponse = decode(res).await?;
        if body.success { Ok(body.deleted) } else { Err(ClientError::Unsuccessful) }
    }
}

async fn decode<T: DeserializeOwned>(res: Response) -> Result<T, ClientError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res.json().await?);
    }

    let raw = res.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorResponse>(&raw)
        .map(|body| body.error)
        .unwrap_or(raw);
    Err(ClientError::Status {
        status: status.as_u16(),
        message,
    })
}
