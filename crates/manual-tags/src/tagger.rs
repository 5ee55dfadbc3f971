use futures::TryStreamExt;

use crate::api::{TagError, VectorStoreApi};
use crate::event::TagEvent;
use crate::mapping::{DeviceMapping, device_metadata};
use crate::record::VectorStoreId;

/// Counts from a completed tagging pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TagReport {
    pub tagged: u64,
    pub skipped: u64,
}

/// Annotates every file in a vector store whose name appears in a
/// [`DeviceMapping`] with a `device_id` metadata attribute.
pub struct Tagger<A> {
    api: A,
    mapping: DeviceMapping,
}

impl<A: VectorStoreApi> Tagger<A> {
    pub fn new(api: A, mapping: DeviceMapping) -> Self {
        Self { api, mapping }
    }

    pub fn mapping(&self) -> &DeviceMapping {
        &self.mapping
    }

    /// Walk the store's files once, in listing order, issuing one metadata
    /// update per file whose name is in the mapping.
    ///
    /// `on_event` is called for every file before any request is made for
    /// it. The first error, from the service or from `on_event`, aborts the
    /// pass: files already tagged stay tagged and the rest are never visited.
    pub async fn run<F>(&self, store_id: &VectorStoreId, mut on_event: F) -> Result<TagReport, TagError>
    where
        F: FnMut(&TagEvent) -> Result<(), TagError>,
    {
        if store_id.is_empty() {
            return Err(TagError::CollectionNotFound(store_id.clone()));
        }

        // The counts are informational only; they do not drive the loop.
        let store = self.api.retrieve(store_id).await?;
        tracing::debug!(
            store = %store.id,
            total = store.file_counts.total,
            completed = store.file_counts.completed,
            "resolved vector store"
        );

        let mut report = TagReport::default();
        let mut files = self.api.list_files(store_id);

        while let Some(file) = files.try_next().await? {
            let Some(device_id) = self.mapping.device_for(&file.name) else {
                on_event(&TagEvent::skipped(&file.name))?;
                report.skipped += 1;
                continue;
            };

            on_event(&TagEvent::tagging(&file.name, device_id))?;

            self.api
                .update_metadata(store_id, &file.id, &device_metadata(device_id))
                .await?;
            tracing::debug!(file_id = %file.id, device_id, "updated file metadata");
            report.tagged += 1;
        }

        tracing::info!(
            tagged = report.tagged,
            skipped = report.skipped,
            "tagging pass complete"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use crate::DEVICE_ID_KEY;
    use crate::record::FileRecord;
    use crate::test_support::InMemoryVectorStore;

    use super::*;

    const STORE: &str = "vs_test";

    fn foresight_mapping() -> DeviceMapping {
        DeviceMapping::from_iter([("foresight_elite.pdf", "CASMED-FORESIGHT-ELITE")])
    }

    async fn run_collecting(
        tagger: &Tagger<&InMemoryVectorStore>,
    ) -> (Result<TagReport, TagError>, Vec<TagEvent>) {
        let mut events = Vec::new();
        let result = tagger
            .run(&VectorStoreId::new(STORE), |e| {
                events.push(e.clone());
                Ok(())
            })
            .await;
        (result, events)
    }

    #[tokio::test]
    async fn tags_mapped_file_and_skips_unknown() {
        let api = InMemoryVectorStore::new().with_store(
            STORE,
            vec![
                FileRecord::new("file-1", "foresight_elite.pdf"),
                FileRecord::new("file-2", "unknown.pdf"),
            ],
        );
        let tagger = Tagger::new(&api, foresight_mapping());

        let (result, events) = run_collecting(&tagger).await;

        assert_eq!(result.unwrap(), TagReport { tagged: 1, skipped: 1 });

        let updates = api.updates();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].store_id.as_str(), STORE);
        assert_eq!(updates[0].file_id.as_str(), "file-1");
        assert_eq!(
            updates[0].metadata.get(DEVICE_ID_KEY).map(String::as_str),
            Some("CASMED-FORESIGHT-ELITE")
        );
        assert_eq!(updates[0].metadata.len(), 1);

        assert_eq!(
            events,
            vec![
                TagEvent::tagging("foresight_elite.pdf", "CASMED-FORESIGHT-ELITE"),
                TagEvent::skipped("unknown.pdf"),
            ]
        );
    }

    #[tokio::test]
    async fn empty_listing_issues_no_updates() {
        let api = InMemoryVectorStore::new().with_store(STORE, vec![]);
        let tagger = Tagger::new(&api, foresight_mapping());

        let (result, events) = run_collecting(&tagger).await;

        assert_eq!(result.unwrap(), TagReport::default());
        assert!(events.is_empty());
        assert!(api.updates().is_empty());
    }

    #[tokio::test]
    async fn listing_failure_aborts_without_updates() {
        let api = InMemoryVectorStore::new()
            .with_store(STORE, vec![FileRecord::new("file-1", "foresight_elite.pdf")])
            .fail_listing_after(0);
        let tagger = Tagger::new(&api, foresight_mapping());

        let (result, events) = run_collecting(&tagger).await;

        assert!(matches!(result, Err(TagError::Transport(_))));
        assert!(events.is_empty());
        assert!(api.updates().is_empty());
    }

    #[tokio::test]
    async fn listing_failure_mid_stream_keeps_earlier_updates() {
        let api = InMemoryVectorStore::new()
            .with_store(
                STORE,
                vec![
                    FileRecord::new("file-1", "foresight_elite.pdf"),
                    FileRecord::new("file-2", "foresight_elite.pdf"),
                ],
            )
            .fail_listing_after(1);
        let tagger = Tagger::new(&api, foresight_mapping());

        let (result, _) = run_collecting(&tagger).await;

        assert!(matches!(result, Err(TagError::Transport(_))));
        let updates = api.updates();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].file_id.as_str(), "file-1");
    }

    #[tokio::test]
    async fn unknown_store_is_not_found() {
        let api = InMemoryVectorStore::new();
        let tagger = Tagger::new(&api, foresight_mapping());

        let (result, events) = run_collecting(&tagger).await;

        assert!(matches!(result, Err(TagError::CollectionNotFound(_))));
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn empty_store_id_is_rejected() {
        let api = InMemoryVectorStore::new().with_store("", vec![]);
        let tagger = Tagger::new(&api, foresight_mapping());

        let result = tagger.run(&VectorStoreId::new("  "), |_| Ok(())).await;
        assert!(matches!(result, Err(TagError::CollectionNotFound(_))));
    }

    #[tokio::test]
    async fn rejected_update_stops_remaining_files() {
        let mapping = DeviceMapping::from_iter([
            ("a.pdf", "DEV-A"),
            ("b.pdf", "DEV-B"),
            ("c.pdf", "DEV-C"),
        ]);
        let api = InMemoryVectorStore::new()
            .with_store(
                STORE,
                vec![
                    FileRecord::new("file-a", "a.pdf"),
                    FileRecord::new("file-b", "b.pdf"),
                    FileRecord::new("file-c", "c.pdf"),
                ],
            )
            .reject_updates_for("file-b");
        let tagger = Tagger::new(&api, mapping);

        let (result, events) = run_collecting(&tagger).await;

        match result {
            Err(TagError::UpdateRejected { file_id, .. }) => assert_eq!(file_id.as_str(), "file-b"),
            other => panic!("expected UpdateRejected, got {other:?}"),
        }
        let tagged: Vec<String> = api.updates().into_iter().map(|u| u.file_id.to_string()).collect();
        assert_eq!(tagged, vec!["file-a"]);
        // c.pdf is never reached
        assert!(events.iter().all(|e| e.file_name() != "c.pdf"));
    }

    #[tokio::test]
    async fn observer_error_stops_before_the_update() {
        let api = InMemoryVectorStore::new().with_store(
            STORE,
            vec![
                FileRecord::new("file-1", "foresight_elite.pdf"),
                FileRecord::new("file-2", "foresight_elite.pdf"),
            ],
        );
        let tagger = Tagger::new(&api, foresight_mapping());
        let mut calls = 0;

        let result = tagger
            .run(&VectorStoreId::new(STORE), |_| {
                calls += 1;
                Err(TagError::Output("broken pipe".into()))
            })
            .await;

        assert!(matches!(result, Err(TagError::Output(_))));
        assert_eq!(calls, 1);
        assert!(api.updates().is_empty());
    }

    #[tokio::test]
    async fn empty_device_id_is_skipped() {
        let mapping = DeviceMapping::from_iter([("a.pdf", ""), ("b.pdf", "DEV-B")]);
        let api = InMemoryVectorStore::new().with_store(
            STORE,
            vec![FileRecord::new("file-a", "a.pdf"), FileRecord::new("file-b", "b.pdf")],
        );
        let tagger = Tagger::new(&api, mapping);

        let (result, events) = run_collecting(&tagger).await;

        assert_eq!(result.unwrap(), TagReport { tagged: 1, skipped: 1 });
        assert_eq!(
            events,
            vec![TagEvent::skipped("a.pdf"), TagEvent::tagging("b.pdf", "DEV-B")]
        );
        let updates = api.updates();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].file_id.as_str(), "file-b");
    }

    #[tokio::test]
    async fn updates_follow_listing_order() {
        let mapping = DeviceMapping::from_iter([
            ("Service Manual Nico2.pdf", "NICO2"),
            ("Service Manual Nellcor N-395.pdf", "Nellcor-N-395"),
            ("foresight_elite.pdf", "CASMED-FORESIGHT-ELITE"),
        ]);
        let api = InMemoryVectorStore::new().with_store(
            STORE,
            vec![
                FileRecord::new("file-3", "Service Manual Nellcor N-395.pdf"),
                FileRecord::new("file-9", "readme.txt"),
                FileRecord::new("file-1", "foresight_elite.pdf"),
                FileRecord::new("file-2", "Service Manual Nico2.pdf"),
            ],
        );
        let tagger = Tagger::new(&api, mapping);

        let (result, events) = run_collecting(&tagger).await;

        assert_eq!(result.unwrap(), TagReport { tagged: 3, skipped: 1 });
        let order: Vec<(String, String)> = api
            .updates()
            .into_iter()
            .map(|u| (u.file_id.to_string(), u.metadata[DEVICE_ID_KEY].clone()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("file-3".to_owned(), "Nellcor-N-395".to_owned()),
                ("file-1".to_owned(), "CASMED-FORESIGHT-ELITE".to_owned()),
                ("file-2".to_owned(), "NICO2".to_owned()),
            ]
        );
        assert_eq!(events.iter().filter(|e| e.is_skipped()).count(), 1);
    }

    #[tokio::test]
    async fn rerun_issues_the_same_updates() {
        let api = InMemoryVectorStore::new().with_store(
            STORE,
            vec![
                FileRecord::new("file-1", "foresight_elite.pdf"),
                FileRecord::new("file-2", "unknown.pdf"),
            ],
        );
        let tagger = Tagger::new(&api, foresight_mapping());

        run_collecting(&tagger).await.0.unwrap();
        let first = api.updates();
        run_collecting(&tagger).await.0.unwrap();
        let all = api.updates();

        assert_eq!(all.len(), 2 * first.len());
        assert_eq!(&all[first.len()..], first.as_slice());
    }
}
