use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use manual_tags::{FileCounts, FileRecord, VectorStore, VectorStoreId};

/// Response from `GET /vector_stores/{id}`.
#[derive(Debug, Deserialize)]
pub struct VectorStoreResponse {
    pub id: String,
    pub name: Option<String>,
    #[serde(default)]
    pub file_counts: FileCountsResponse,
}

#[derive(Debug, Default, Deserialize)]
pub struct FileCountsResponse {
    #[serde(default)]
    pub in_progress: u64,
    #[serde(default)]
    pub completed: u64,
    #[serde(default)]
    pub failed: u64,
    #[serde(default)]
    pub cancelled: u64,
    #[serde(default)]
    pub total: u64,
}

impl From<VectorStoreResponse> for VectorStore {
    fn from(response: VectorStoreResponse) -> Self {
        let counts = response.file_counts;
        Self {
            id: VectorStoreId::new(response.id),
            name: response.name,
            file_counts: FileCounts {
                in_progress: counts.in_progress,
                completed: counts.completed,
                failed: counts.failed,
                cancelled: counts.cancelled,
                total: counts.total,
            },
        }
    }
}

/// One page from `GET /vector_stores/{id}/files`.
#[derive(Debug, Deserialize)]
pub struct FileListResponse {
    pub data: Vec<VectorStoreFileResponse>,
    pub first_id: Option<String>,
    pub last_id: Option<String>,
    #[serde(default)]
    pub has_more: bool,
}

impl FileListResponse {
    /// Cursor for the following page, or `None` when this is the last one.
    pub fn next_cursor(&self) -> Option<String> {
        if !self.has_more {
            return None;
        }
        self.last_id
            .clone()
            .or_else(|| self.data.last().map(|f| f.id.clone()))
    }
}

/// A vector-store file entry. Carries no file name; that lives on the
/// underlying file object.
#[derive(Debug, Deserialize)]
pub struct VectorStoreFileResponse {
    pub id: String,
    pub status: Option<String>,
}

/// Response from `GET /files/{file_id}`.
#[derive(Debug, Deserialize)]
pub struct FileObjectResponse {
    pub id: String,
    pub filename: String,
}

impl From<FileObjectResponse> for FileRecord {
    fn from(file: FileObjectResponse) -> Self {
        FileRecord::new(file.id, file.filename)
    }
}

/// Body of `POST /vector_stores/{id}/files/{file_id}`.
#[derive(Debug, Serialize)]
pub struct UpdateAttributesRequest<'a> {
    pub attributes: &'a HashMap<String, String>,
}

/// Error envelope returned on non-success responses.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    pub message: String,
}
