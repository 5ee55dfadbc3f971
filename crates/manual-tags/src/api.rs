use std::collections::HashMap;

use futures::stream::BoxStream;

use crate::record::{FileId, FileRecord, VectorStore, VectorStoreId};

/// Errors that can occur when talking to the vector-store service.
#[derive(Debug, thiserror::Error)]
pub enum TagError {
    #[error("vector store not found: {0}")]
    CollectionNotFound(VectorStoreId),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("update rejected for file {file_id} (HTTP {status}): {message}")]
    UpdateRejected {
        file_id: FileId,
        status: u16,
        message: String,
    },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("missing API key: set OPENAI_API_KEY")]
    MissingApiKey,

    #[error("output error: {0}")]
    Output(String),
}

/// Lazy, forward-only listing of a vector store's files.
///
/// Items are pulled one at a time; implementations fetch further pages
/// only when the consumer asks for the next record.
pub type FileStream<'a> = BoxStream<'a, Result<FileRecord, TagError>>;

/// The remote vector-store operations the tagger depends on.
#[async_trait::async_trait]
pub trait VectorStoreApi: Send + Sync {
    /// Resolve a vector store by id.
    async fn retrieve(&self, store_id: &VectorStoreId) -> Result<VectorStore, TagError>;

    /// Stream every file currently in the store, in service order.
    fn list_files<'a>(&'a self, store_id: &'a VectorStoreId) -> FileStream<'a>;

    /// Replace the metadata attributes of one file within one store.
    async fn update_metadata(
        &self,
        store_id: &VectorStoreId,
        file_id: &FileId,
        metadata: &HashMap<String, String>,
    ) -> Result<(), TagError>;
}

#[async_trait::async_trait]
impl<T: VectorStoreApi + ?Sized> VectorStoreApi for &T {
    async fn retrieve(&self, store_id: &VectorStoreId) -> Result<VectorStore, TagError> {
        (**self).retrieve(store_id).await
    }

    fn list_files<'a>(&'a self, store_id: &'a VectorStoreId) -> FileStream<'a> {
        (**self).list_files(store_id)
    }

    async fn update_metadata(
        &self,
        store_id: &VectorStoreId,
        file_id: &FileId,
        metadata: &HashMap<String, String>,
    ) -> Result<(), TagError> {
        (**self).update_metadata(store_id, file_id, metadata).await
    }
}
