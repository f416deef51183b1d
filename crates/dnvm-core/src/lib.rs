//! Core library for dnvm.
//!
//! Everything a command needs from the machine goes through [`DnvmEnv`]:
//! the home filesystem (a [`Vfs`], physical or in memory), a physical temp
//! area and the user environment variables. The manifest is read and
//! written with [`ManifestStore`].
//!
//! # Directory Layout
//!
//! ```text
//! ~/.dnvm/
//! ├── dnvmManifest.json   # Installed SDKs and tracked channels
//! ├── env                 # Shell script putting dnvm on PATH
//! ├── dnvm[.exe]          # dnvm itself
//! └── dn/                 # Default SDK directory
//! ```

pub mod env;
pub mod error;
pub mod paths;
pub mod reporter;
pub mod store;
mod user_env;
pub mod vfs;

pub use env::DnvmEnv;
pub use error::ToolError;
pub use reporter::{ConsoleReporter, NullReporter, Reporter};
pub use store::ManifestStore;
pub use vfs::{MemoryFs, PhysicalFs, Vfs, VfsPath};
