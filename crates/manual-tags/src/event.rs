/// Per-file outcome emitted by the tagger while it walks a listing.
///
/// The tagger never prints; callers decide how to present these
/// (the CLI writes them to stdout, tests collect them).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagEvent {
    /// The file name has no entry in the device mapping.
    Skipped { name: String },
    /// An update is about to be issued for this file.
    Tagging { name: String, device_id: String },
}

impl TagEvent {
    pub fn skipped(name: impl Into<String>) -> Self {
        Self::Skipped { name: name.into() }
    }

    pub fn tagging(name: impl Into<String>, device_id: impl Into<String>) -> Self {
        Self::Tagging {
            name: name.into(),
            device_id: device_id.into(),
        }
    }

    /// Name of the file this event refers to.
    pub fn file_name(&self) -> &str {
        match self {
            Self::Skipped { name } | Self::Tagging { name, .. } => name,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }
}

impl std::fmt::Display for TagEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Skipped { name } => write!(f, "Skipping {name}"),
            Self::Tagging { name, device_id } => {
                write!(f, "Tagging {name} → device_id={device_id}")
            }
        }
    }
}
