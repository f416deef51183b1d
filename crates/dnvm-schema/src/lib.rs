//! Shared types and on-disk formats for dnvm.
//!
//! This crate has no I/O: it describes platform identifiers and the
//! historical manifest formats, and how older manifests migrate forward.

pub mod manifest;
pub mod rid;

// Re-exports
pub use manifest::{AnyManifest, Manifest, ManifestParseError};
pub use rid::*;
