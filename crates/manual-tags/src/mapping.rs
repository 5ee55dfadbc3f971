use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// Metadata key under which the device identifier is stored.
pub const DEVICE_ID_KEY: &str = "device_id";

/// Static table from exact file name to device identifier.
///
/// Built once before a run and never mutated while the run is in
/// progress, so tagging decisions depend only on the remote listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct DeviceMapping(BTreeMap<String, String>);

impl DeviceMapping {
    pub fn new(entries: BTreeMap<String, String>) -> Self {
        Self(entries)
    }

    /// Device identifier for a file name. Matching is exact and case-sensitive;
    /// an entry with an empty identifier counts as unmapped.
    pub fn device_for(&self, file_name: &str) -> Option<&str> {
        self.0
            .get(file_name)
            .map(String::as_str)
            .filter(|device_id| !device_id.is_empty())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries in file-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// The metadata map sent to the service when tagging a file.
pub fn device_metadata(device_id: &str) -> HashMap<String, String> {
    HashMap::from([(DEVICE_ID_KEY.to_owned(), device_id.to_owned())])
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for DeviceMapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
