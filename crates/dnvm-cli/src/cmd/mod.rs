//! Command implementations.

pub mod manifest;
pub mod path;
pub mod rid;
