use serde::{Deserialize, Serialize};

use super::v1::ManifestV1;

/// Adds channel tracking on top of [`ManifestV1`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestV2 {
    /// SDK versions installed into the default SDK directory.
    pub installed_versions: Vec<String>,
    /// Names of channels followed by `dnvm update` (`lts`, `latest`, ...).
    pub tracked_channels: Vec<String>,
}

impl From<ManifestV1> for ManifestV2 {
    fn from(v1: ManifestV1) -> Self {
        Self {
            installed_versions: v1.installed_versions,
            tracked_channels: Vec::new(),
        }
    }
}
