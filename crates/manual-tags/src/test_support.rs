use std::collections::HashMap;
use std::sync::Mutex;

use futures::StreamExt;

use crate::{
    FileCounts, FileId, FileRecord, FileStream, TagError, VectorStore, VectorStoreApi,
    VectorStoreId,
};

/// A metadata update captured by [`InMemoryVectorStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedUpdate {
    pub store_id: VectorStoreId,
    pub file_id: FileId,
    pub metadata: HashMap<String, String>,
}

/// In-memory vector-store service for testing. Records every update request.
pub struct InMemoryVectorStore {
    stores: HashMap<VectorStoreId, Vec<FileRecord>>,
    updates: Mutex<Vec<RecordedUpdate>>,
    listing_fails_after: Option<usize>,
    rejected_file: Option<FileId>,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self {
            stores: HashMap::new(),
            updates: Mutex::new(Vec::new()),
            listing_fails_after: None,
            rejected_file: None,
        }
    }

    /// Add (or replace) a store with the given files, in listing order.
    pub fn with_store(mut self, id: &str, files: Vec<FileRecord>) -> Self {
        self.stores.insert(VectorStoreId::new(id), files);
        self
    }

    /// Make the listing yield a transport error after `count` records.
    pub fn fail_listing_after(mut self, count: usize) -> Self {
        self.listing_fails_after = Some(count);
        self
    }

    /// Make updates for this file id fail with `UpdateRejected`.
    pub fn reject_updates_for(mut self, file_id: &str) -> Self {
        self.rejected_file = Some(FileId::new(file_id));
        self
    }

    /// All update requests received so far, in order.
    pub fn updates(&self) -> Vec<RecordedUpdate> {
        self.updates.lock().unwrap().clone()
    }
}

impl Default for InMemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl VectorStoreApi for InMemoryVectorStore {
    async fn retrieve(&self, store_id: &VectorStoreId) -> Result<VectorStore, TagError> {
        let files = self
            .stores
            .get(store_id)
            .ok_or_else(|| TagError::CollectionNotFound(store_id.clone()))?;

        let total = files.len() as u64;
        Ok(VectorStore {
            id: store_id.clone(),
            name: None,
            file_counts: FileCounts {
                completed: total,
                total,
                ..FileCounts::default()
            },
        })
    }

    fn list_files<'a>(&'a self, store_id: &'a VectorStoreId) -> FileStream<'a> {
        let Some(files) = self.stores.get(store_id) else {
            let missing = TagError::CollectionNotFound(store_id.clone());
            return futures::stream::once(async move { Err(missing) }).boxed();
        };

        let mut items: Vec<Result<FileRecord, TagError>> = files.iter().cloned().map(Ok).collect();
        if let Some(count) = self.listing_fails_after {
            items.truncate(count);
            items.push(Err(TagError::Transport("connection reset".into())));
        }

        futures::stream::iter(items).boxed()
    }

    async fn update_metadata(
        &self,
        store_id: &VectorStoreId,
        file_id: &FileId,
        metadata: &HashMap<String, String>,
    ) -> Result<(), TagError> {
        if self.rejected_file.as_ref() == Some(file_id) {
            return Err(TagError::UpdateRejected {
                file_id: file_id.clone(),
                status: 404,
                message: "No such file".into(),
            });
        }

        self.updates.lock().unwrap().push(RecordedUpdate {
            store_id: store_id.clone(),
            file_id: file_id.clone(),
            metadata: metadata.clone(),
        });
        Ok(())
    }
}
