use std::io::Write;

use anyhow::Result;
use manual_tags::{DeviceMapping, TagError, TagReport, Tagger, VectorStoreApi, VectorStoreId};

pub const COMPLETION_MARKER: &str = "✅ Metadata added.";

/// Tag every mapped file in the store, writing one line per file and the
/// completion marker to `out`. A failed write stops the pass before the
/// next update is sent.
pub async fn run<A, W>(
    api: A,
    mapping: DeviceMapping,
    store_id: &VectorStoreId,
    out: &mut W,
) -> Result<TagReport>
where
    A: VectorStoreApi,
    W: Write,
{
    let tagger = Tagger::new(api, mapping);

    let report = tagger
        .run(store_id, |event| {
            writeln!(out, "{event}").map_err(|e| TagError::Output(e.to_string()))
        })
        .await?;

    writeln!(out, "{COMPLETION_MARKER}")?;
    Ok(report)
}
