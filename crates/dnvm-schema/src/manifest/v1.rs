use serde::{Deserialize, Serialize};

/// First manifest format: a flat list of installed SDK versions.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestV1 {
    /// SDK versions installed into the default SDK directory.
    pub installed_versions: Vec<String>,
}
