use std::fmt;

/// Identifier of a remote vector store (e.g. `vs_6910...`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VectorStoreId(String);

impl VectorStoreId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for VectorStoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Service-assigned identifier of a file inside a vector store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileId(String);

impl FileId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Per-status file counts reported by the service for a vector store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileCounts {
    pub in_progress: u64,
    pub completed: u64,
    pub failed: u64,
    pub cancelled: u64,
    pub total: u64,
}

/// Handle for a vector store as returned by the retrieve call.
#[derive(Debug, Clone)]
pub struct VectorStore {
    pub id: VectorStoreId,
    pub name: Option<String>,
    pub file_counts: FileCounts,
}

/// A file that belongs to a vector store. Owned by the remote service;
/// the tagger only reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub id: FileId,
    pub name: String,
}

impl FileRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: FileId::new(id),
            name: name.into(),
        }
    }
}
