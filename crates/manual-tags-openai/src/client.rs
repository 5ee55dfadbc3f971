use std::collections::HashMap;
use std::time::Duration;

use futures::{StreamExt, TryStreamExt};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};

use manual_tags::{
    FileId, FileRecord, FileStream, TagError, VectorStore, VectorStoreApi, VectorStoreId,
};

use crate::wire::{
    ApiErrorResponse, FileListResponse, FileObjectResponse, UpdateAttributesRequest,
    VectorStoreFileResponse, VectorStoreResponse,
};

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
const MAX_PAGE_SIZE: u32 = 100;

/// Configuration for the hosted vector-store client.
#[derive(Debug, Clone)]
pub struct OpenAiClientConfig {
    pub api_key: String,
    pub api_base_url: Option<String>,
    pub request_timeout: Duration,
    pub page_size: u32,
}

impl OpenAiClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base_url: None,
            request_timeout: DEFAULT_TIMEOUT,
            page_size: MAX_PAGE_SIZE,
        }
    }
}

/// Talks to the OpenAI vector-store REST API.
pub struct OpenAiVectorStoreClient {
    config: OpenAiClientConfig,
    client: reqwest::Client,
}

impl OpenAiVectorStoreClient {
    pub fn new(config: OpenAiClientConfig) -> Result<Self, TagError> {
        let api_key = config.api_key.trim();
        if api_key.is_empty() {
            return Err(TagError::MissingApiKey);
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {api_key}"))
                .map_err(|e| TagError::Parse(format!("invalid API key header: {e}")))?,
        );
        headers.insert("OpenAI-Beta", HeaderValue::from_static("assistants=v2"));
        headers.insert(USER_AGENT, HeaderValue::from_static("manual-tagger"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| TagError::Transport(e.to_string()))?;

        Ok(Self { config, client })
    }

    fn api_base(&self) -> &str {
        self.config
            .api_base_url
            .as_deref()
            .unwrap_or(DEFAULT_API_BASE)
            .trim_end_matches('/')
    }

    fn page_size(&self) -> u32 {
        self.config.page_size.clamp(1, MAX_PAGE_SIZE)
    }

    async fn fetch_page(
        &self,
        store_id: &VectorStoreId,
        after: Option<&str>,
    ) -> Result<FileListResponse, TagError> {
        let mut url = format!(
            "{}/vector_stores/{}/files?limit={}",
            self.api_base(),
            store_id,
            self.page_size()
        );
        if let Some(cursor) = after {
            url.push_str(&format!("&after={cursor}"));
        }

        tracing::debug!(%url, "listing vector store files");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| TagError::Transport(e.to_string()))?;

        if response.status().as_u16() == 404 {
            return Err(TagError::CollectionNotFound(store_id.clone()));
        }

        if !response.status().is_success() {
            let status = response.status();
            let message = error_message(response).await;
            return Err(TagError::Transport(format!("HTTP {status}: {message}")));
        }

        response
            .json()
            .await
            .map_err(|e| TagError::Parse(format!("failed to parse file list: {e}")))
    }

    /// Look up the uploaded file behind a vector-store entry to get its name.
    async fn fetch_file(&self, file_id: &str) -> Result<FileRecord, TagError> {
        let url = format!("{}/files/{}", self.api_base(), file_id);
        tracing::debug!(%url, "resolving file name");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| TagError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let message = error_message(response).await;
            return Err(TagError::Transport(format!(
                "file lookup for {file_id} returned HTTP {status}: {message}"
            )));
        }

        let file: FileObjectResponse = response
            .json()
            .await
            .map_err(|e| TagError::Parse(format!("failed to parse file {file_id}: {e}")))?;

        Ok(file.into())
    }
}

/// Pull the service's error message out of a failed response, falling back
/// to the raw body.
async fn error_message(response: reqwest::Response) -> String {
    let body = response.text().await.unwrap_or_else(|_| "unknown".into());
    match serde_json::from_str::<ApiErrorResponse>(&body) {
        Ok(parsed) => parsed.error.message,
        Err(_) => body,
    }
}

#[async_trait::async_trait]
impl VectorStoreApi for OpenAiVectorStoreClient {
    async fn retrieve(&self, store_id: &VectorStoreId) -> Result<VectorStore, TagError> {
        let url = format!("{}/vector_stores/{}", self.api_base(), store_id);
        tracing::debug!(%url, "retrieving vector store");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| TagError::Transport(e.to_string()))?;

        if response.status().as_u16() == 404 {
            return Err(TagError::CollectionNotFound(store_id.clone()));
        }

        if !response.status().is_success() {
            let status = response.status();
            let message = error_message(response).await;
            return Err(TagError::Transport(format!("HTTP {status}: {message}")));
        }

        let store: VectorStoreResponse = response
            .json()
            .await
            .map_err(|e| TagError::Parse(format!("failed to parse vector store: {e}")))?;

        Ok(store.into())
    }

    fn list_files<'a>(&'a self, store_id: &'a VectorStoreId) -> FileStream<'a> {
        // State: `None` once the last page has been read, otherwise the
        // cursor for the next request (`Some(None)` for the first page).
        futures::stream::try_unfold(Some(None::<String>), move |state| async move {
            let Some(after) = state else {
                return Ok(None);
            };

            let page = self.fetch_page(store_id, after.as_deref()).await?;
            let next = page.next_cursor().map(Some);
            let ids = page
                .data
                .into_iter()
                .map(|f: VectorStoreFileResponse| Ok::<_, TagError>(f.id));

            Ok::<_, TagError>(Some((futures::stream::iter(ids), next)))
        })
        .try_flatten()
        // Names are resolved one entry at a time, as the consumer pulls.
        .and_then(move |file_id| async move { self.fetch_file(&file_id).await })
        .boxed()
    }

    async fn update_metadata(
        &self,
        store_id: &VectorStoreId,
        file_id: &FileId,
        metadata: &HashMap<String, String>,
    ) -> Result<(), TagError> {
        let url = format!(
            "{}/vector_stores/{}/files/{}",
            self.api_base(),
            store_id,
            file_id
        );
        tracing::debug!(%url, "updating file attributes");

        let response = self
            .client
            .post(&url)
            .json(&UpdateAttributesRequest {
                attributes: metadata,
            })
            .send()
            .await
            .map_err(|e| TagError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = error_message(response).await;
            return Err(TagError::UpdateRejected {
                file_id: file_id.clone(),
                status,
                message,
            });
        }

        Ok(())
    }
}
