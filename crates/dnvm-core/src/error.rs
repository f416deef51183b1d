//! Operational failures that dnvm reports to the user.

use crate::vfs::VfsPath;
use dnvm_schema::{ManifestParseError, UnsupportedPlatform};
use std::io;
use thiserror::Error;

/// An expected, user-facing failure.
///
/// Anything that is not a `ToolError` is a defect and is never hidden from
/// the user by the top-level error filter.
#[derive(Error, Debug)]
pub enum ToolError {
    /// No SDK is published for the running OS or architecture.
    #[error(transparent)]
    UnsupportedPlatform(#[from] UnsupportedPlatform),

    /// The manifest exists but no known format can read it.
    #[error("Manifest at {path} is invalid: {source}")]
    ManifestCorrupt {
        /// Virtual path of the manifest.
        path: VfsPath,
        /// Why parsing failed.
        #[source]
        source: ManifestParseError,
    },

    /// A filesystem or environment operation failed.
    #[error("{context}: {source}")]
    Io {
        /// What dnvm was doing.
        context: String,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// Command-line options were combined incorrectly.
    #[error("{0}")]
    InvalidOptions(String),

    /// The requested operation does not apply on this platform.
    #[error("{0}")]
    Unsupported(String),
}

impl ToolError {
    /// Wrap an I/O error with a description of the failed step.
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}
