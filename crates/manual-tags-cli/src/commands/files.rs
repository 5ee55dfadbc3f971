use std::io::Write;

use anyhow::Result;
use futures::TryStreamExt;
use manual_tags::{DeviceMapping, FileRecord, VectorStoreApi, VectorStoreId};

use super::format;

/// Show the store's file counts and what each file would be tagged with.
/// Read-only: no update requests are issued.
pub async fn run<W: Write>(
    api: &dyn VectorStoreApi,
    mapping: &DeviceMapping,
    store_id: &VectorStoreId,
    out: &mut W,
) -> Result<()> {
    let store = api.retrieve(store_id).await?;
    let files: Vec<FileRecord> = api.list_files(store_id).try_collect().await?;

    writeln!(out, "{}", format::counts_line(&store))?;

    for row in format::file_rows(&files, |name| mapping.device_for(name)) {
        writeln!(out, "{row}")?;
    }

    let mapped = files
        .iter()
        .filter(|f| mapping.device_for(&f.name).is_some())
        .count();
    writeln!(out, "\n{mapped} of {} files mapped", files.len())?;

    Ok(())
}
