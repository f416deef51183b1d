use serde::{Deserialize, Serialize};

use super::v2::ManifestV2;

/// Directory name SDKs were installed into before SDK directories existed.
pub const DEFAULT_SDK_DIR: &str = "dn";

/// Current manifest format: SDKs and channels are tied to an SDK directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestV3 {
    /// Installed SDKs and where they live.
    pub installed_sdk_versions: Vec<InstalledSdk>,
    /// Channels followed by `dnvm update`.
    pub tracked_channels: Vec<TrackedChannel>,
    /// SDK directory that `dotnet` currently resolves to.
    pub current_sdk_dir: String,
}

/// One installed SDK.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstalledSdk {
    /// SDK version string, e.g. `8.0.100`.
    pub version: String,
    /// SDK directory the version was installed into.
    pub sdk_dir_name: String,
}

/// A followed release channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedChannel {
    /// Channel name.
    pub channel_name: String,
    /// SDK directory updates for this channel are installed into.
    pub sdk_dir_name: String,
    /// Versions installed through this channel.
    pub installed_sdk_versions: Vec<String>,
}

impl Default for ManifestV3 {
    fn default() -> Self {
        Self {
            installed_sdk_versions: Vec::new(),
            tracked_channels: Vec::new(),
            current_sdk_dir: DEFAULT_SDK_DIR.to_string(),
        }
    }
}

impl From<ManifestV2> for ManifestV3 {
    fn from(v2: ManifestV2) -> Self {
        let installed_sdk_versions = v2
            .installed_versions
            .into_iter()
            .map(|version| InstalledSdk {
                version,
                sdk_dir_name: DEFAULT_SDK_DIR.to_string(),
            })
            .collect();
        let tracked_channels = v2
            .tracked_channels
            .into_iter()
            .map(|channel_name| TrackedChannel {
                channel_name,
                sdk_dir_name: DEFAULT_SDK_DIR.to_string(),
                installed_sdk_versions: Vec::new(),
            })
            .collect();
        Self {
            installed_sdk_versions,
            tracked_channels,
            current_sdk_dir: DEFAULT_SDK_DIR.to_string(),
        }
    }
}
