//! On-disk manifest formats.
//!
//! Every manifest format dnvm ever shipped lives here as its own struct,
//! together with a one-step migration to its successor. Documents carry a
//! top-level `version` tag; the oldest files predate the tag and are
//! recognised by shape instead.
//!
//! ```text
//! ManifestV1 --> ManifestV2 --> ManifestV3 (= Manifest)
//! ```

mod v1;
mod v2;
mod v3;

pub use v1::ManifestV1;
pub use v2::ManifestV2;
pub use v3::{DEFAULT_SDK_DIR, InstalledSdk, ManifestV3, TrackedChannel};

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// The in-memory manifest handed to commands. Always the latest format.
pub type Manifest = ManifestV3;

/// Version tag written by this build.
pub const LATEST_VERSION: u32 = 3;

/// Name of the top-level version discriminator.
pub const VERSION_FIELD: &str = "version";

/// Failure to interpret manifest text.
#[derive(Error, Debug)]
pub enum ManifestParseError {
    /// The file is not UTF-8 text.
    #[error("not UTF-8 text")]
    Encoding(#[source] std::io::Error),

    /// The text is not JSON at all.
    #[error("not well-formed JSON: {0}")]
    Syntax(#[source] serde_json::Error),

    /// The version tag is present but not a non-negative integer.
    #[error("invalid version tag: {0}")]
    InvalidTag(Value),

    /// Written by a newer dnvm, or garbage.
    #[error("unknown manifest version {0}")]
    UnknownVersion(u64),

    /// Tagged with a known version but the body does not fit it.
    #[error("does not match manifest version {version}: {source}")]
    Shape {
        /// Version named by the tag.
        version: u32,
        /// Underlying deserialization failure.
        #[source]
        source: serde_json::Error,
    },

    /// Untagged and no historical shape fits.
    #[error("does not match any known manifest version")]
    NoMatch,
}

/// A manifest in any supported format, as read from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnyManifest {
    /// Version 1
    V1(ManifestV1),
    /// Version 2
    V2(ManifestV2),
    /// Version 3
    V3(ManifestV3),
}

impl AnyManifest {
    /// Format version of the contained document.
    pub fn version(&self) -> u32 {
        match self {
            Self::V1(_) => 1,
            Self::V2(_) => 2,
            Self::V3(_) => 3,
        }
    }

    /// Migrate one version forward. The latest version maps to itself.
    fn upgrade(self) -> Self {
        match self {
            Self::V1(m) => Self::V2(m.into()),
            Self::V2(m) => Self::V3(m.into()),
            latest @ Self::V3(_) => latest,
        }
    }

    /// Apply every pending migration.
    pub fn into_latest(self) -> Manifest {
        let mut current = self;
        loop {
            match current {
                Self::V3(latest) => return latest,
                older => current = older.upgrade(),
            }
        }
    }

    /// Serialize with this document's own version tag.
    ///
    /// # Errors
    ///
    /// Only fails if `serde_json` cannot represent the value.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let version = self.version();
        match self {
            Self::V1(m) => tagged_json(version, m),
            Self::V2(m) => tagged_json(version, m),
            Self::V3(m) => tagged_json(version, m),
        }
    }
}

/// A historical format: its tag and how to parse a body of that shape.
#[derive(Debug, Clone, Copy)]
pub struct SchemaVersion {
    /// Value of the `version` tag.
    pub version: u32,
    parse: fn(Value) -> serde_json::Result<AnyManifest>,
}

impl SchemaVersion {
    /// Deserialize `value` as this version.
    ///
    /// # Errors
    ///
    /// Fails when required fields are missing or mistyped.
    pub fn parse(&self, value: Value) -> serde_json::Result<AnyManifest> {
        (self.parse)(value)
    }
}

/// All supported formats, newest first.
pub const SCHEMA_VERSIONS: &[SchemaVersion] = &[
    SchemaVersion {
        version: 3,
        parse: |v| serde_json::from_value(v).map(AnyManifest::V3),
    },
    SchemaVersion {
        version: 2,
        parse: |v| serde_json::from_value(v).map(AnyManifest::V2),
    },
    SchemaVersion {
        version: 1,
        parse: |v| serde_json::from_value(v).map(AnyManifest::V1),
    },
];

/// Parse manifest text of any supported version, without migrating.
///
/// Tagged documents are dispatched on their tag. Untagged documents are
/// tried against each format newest first and the first that fits wins.
///
/// # Errors
///
/// See [`ManifestParseError`].
pub fn parse_any(text: &str) -> Result<AnyManifest, ManifestParseError> {
    let value: Value = serde_json::from_str(text).map_err(ManifestParseError::Syntax)?;

    let Some(tag) = value.get(VERSION_FIELD) else {
        return SCHEMA_VERSIONS
            .iter()
            .find_map(|schema| schema.parse(value.clone()).ok())
            .ok_or(ManifestParseError::NoMatch);
    };

    let tag = tag
        .as_u64()
        .ok_or_else(|| ManifestParseError::InvalidTag(tag.clone()))?;
    let schema = SCHEMA_VERSIONS
        .iter()
        .find(|schema| u64::from(schema.version) == tag)
        .ok_or(ManifestParseError::UnknownVersion(tag))?;

    schema
        .parse(value)
        .map_err(|source| ManifestParseError::Shape {
            version: schema.version,
            source,
        })
}

/// Serialize a manifest in the latest format.
///
/// # Errors
///
/// Only fails if `serde_json` cannot represent the value.
pub fn to_json(manifest: &Manifest) -> serde_json::Result<String> {
    tagged_json(LATEST_VERSION, manifest)
}

/// A manifest in the latest format as a JSON value, tag included.
///
/// # Errors
///
/// Only fails if `serde_json` cannot represent the value.
pub fn to_value(manifest: &Manifest) -> serde_json::Result<Value> {
    serde_json::to_value(Tagged {
        version: LATEST_VERSION,
        body: manifest,
    })
}

#[derive(Serialize)]
struct Tagged<'a, T> {
    version: u32,
    #[serde(flatten)]
    body: &'a T,
}

fn tagged_json<T: Serialize>(version: u32, body: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&Tagged { version, body })
}
