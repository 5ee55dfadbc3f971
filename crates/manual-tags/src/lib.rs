pub mod api;
pub mod event;
pub mod mapping;
pub mod record;
pub mod tagger;

pub use api::{FileStream, TagError, VectorStoreApi};
pub use event::TagEvent;
pub use mapping::{DEVICE_ID_KEY, DeviceMapping, device_metadata};
pub use record::{FileCounts, FileId, FileRecord, VectorStore, VectorStoreId};
pub use tagger::{TagReport, Tagger};

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
