use manual_tags::{FileCounts, FileRecord, VectorStore};

const MAX_NAME_WIDTH: usize = 50;

pub fn counts_line(store: &VectorStore) -> String {
    let FileCounts {
        in_progress,
        completed,
        failed,
        cancelled,
        total,
    } = store.file_counts;

    let label = match &store.name {
        Some(name) => format!("{} ({name})", store.id),
        None => store.id.to_string(),
    };

    format!(
        "{label}: {total} files ({completed} completed, {in_progress} in progress, {failed} failed, {cancelled} cancelled)"
    )
}

/// One row per file: name, then the device id it maps to or `-`.
pub fn file_rows<'a>(
    files: &'a [FileRecord],
    device_for: impl Fn(&str) -> Option<&'a str>,
) -> Vec<String> {
    let name_width = files
        .iter()
        .map(|f| f.name.chars().count())
        .max()
        .unwrap_or(0)
        .min(MAX_NAME_WIDTH);

    files
        .iter()
        .map(|file| {
            let name = truncate(&file.name, name_width);
            let device = device_for(&file.name).unwrap_or("-");
            format!("  {:<width$}  {}", name, device, width = name_width)
        })
        .collect()
}

pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_owned()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{truncated}…")
    }
}
