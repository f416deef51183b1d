//! The environment a dnvm process runs against.
//!
//! [`DnvmEnv`] bundles every piece of ambient state commands touch: the
//! filesystem holding dnvm's home, a scratch area for downloads and the
//! user-scope environment variables. Commands never reach for the OS
//! directly, so tests can hand them an in-memory filesystem and a captured
//! variable map instead.

use crate::error::ToolError;
use crate::store::ManifestStore;
use crate::user_env;
use crate::vfs::{PhysicalFs, Vfs, VfsPath};
use dnvm_schema::Manifest;
use std::fmt;
use std::io;
use std::path::PathBuf;
use tracing::debug;

/// Reads a user-scope environment variable.
pub type GetUserEnvVar = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Writes a user-scope environment variable.
pub type SetUserEnvVar = Box<dyn Fn(&str, &str) -> io::Result<()> + Send + Sync>;

/// Name of the search-path variable edited by [`DnvmEnv::add_to_user_path`].
pub const PATH_VAR: &str = "PATH";

/// Separator between entries of the Windows `PATH`.
pub const PATH_LIST_SEPARATOR: char = ';';

/// Process-wide environment: home filesystem, temp area and user variables.
///
/// Build one per run (or per test) and drop it when the command finishes;
/// dropping releases both filesystem handles.
pub struct DnvmEnv {
    vfs: Box<dyn Vfs>,
    temp_fs: PhysicalFs,
    get_user_env_var: GetUserEnvVar,
    set_user_env_var: SetUserEnvVar,
}

impl fmt::Debug for DnvmEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DnvmEnv")
            .field("vfs", &self.vfs)
            .field("temp_fs", &self.temp_fs)
            .finish_non_exhaustive()
    }
}

impl DnvmEnv {
    /// Environment rooted at `root` on disk, using the real user variables
    /// (`HKCU\Environment` on Windows).
    pub fn physical(root: impl Into<PathBuf>) -> Self {
        Self::new(
            Box::new(PhysicalFs::new(root)),
            Box::new(user_env::get),
            Box::new(user_env::set),
        )
    }

    /// Environment over an arbitrary filesystem and variable accessors.
    ///
    /// The temp area is always the OS temp directory, whatever `vfs` is:
    /// its paths are passed to external installers, which cannot see into
    /// an in-memory filesystem.
    pub fn new(
        vfs: Box<dyn Vfs>,
        get_user_env_var: GetUserEnvVar,
        set_user_env_var: SetUserEnvVar,
    ) -> Self {
        Self {
            vfs,
            temp_fs: PhysicalFs::new(std::env::temp_dir()),
            get_user_env_var,
            set_user_env_var,
        }
    }

    /// Filesystem holding dnvm's home.
    pub fn vfs(&self) -> &dyn Vfs {
        self.vfs.as_ref()
    }

    /// Physical scratch filesystem rooted at the OS temp directory.
    pub fn temp_fs(&self) -> &PhysicalFs {
        &self.temp_fs
    }

    /// OS path of a file in the home filesystem.
    ///
    /// # Errors
    ///
    /// `Unsupported` if the home filesystem is not backed by the OS.
    pub fn real_path(&self, path: &VfsPath) -> io::Result<PathBuf> {
        self.vfs.real_path(path)
    }

    /// Create a uniquely named directory in the temp area. It is deleted
    /// when the returned handle drops.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn create_temp_dir(&self, prefix: &str) -> io::Result<tempfile::TempDir> {
        tempfile::Builder::new()
            .prefix(prefix)
            .tempdir_in(self.temp_fs.root())
    }

    /// Read a user-scope environment variable.
    pub fn user_env_var(&self, name: &str) -> Option<String> {
        (self.get_user_env_var)(name)
    }

    /// Set a user-scope environment variable.
    ///
    /// # Errors
    ///
    /// Whatever the injected setter reports.
    pub fn set_user_env_var(&self, name: &str, value: &str) -> io::Result<()> {
        (self.set_user_env_var)(name, value)
    }

    /// Manifest store over the home filesystem.
    pub fn manifest_store(&self) -> ManifestStore<'_> {
        ManifestStore::new(self.vfs())
    }

    /// Shorthand for `self.manifest_store().read()`.
    ///
    /// # Errors
    ///
    /// See [`ManifestStore::read`].
    pub fn read_manifest(&self) -> Result<Manifest, ToolError> {
        self.manifest_store().read()
    }

    /// Shorthand for `self.manifest_store().write(manifest)`.
    ///
    /// # Errors
    ///
    /// See [`ManifestStore::write`].
    pub fn write_manifest(&self, manifest: &Manifest) -> Result<(), ToolError> {
        self.manifest_store().write(manifest)
    }

    /// Prepend `dir` to the user `PATH` unless it is already listed.
    ///
    /// This is how dnvm exposes itself on Windows; other platforms source
    /// the generated `env` script instead. Entries compare without case or
    /// trailing separators, as Windows paths do. Returns whether the
    /// variable changed.
    ///
    /// # Errors
    ///
    /// Whatever the injected setter reports.
    pub fn add_to_user_path(&self, dir: &str) -> io::Result<bool> {
        let current = self.user_env_var(PATH_VAR).unwrap_or_default();
        if current
            .split(PATH_LIST_SEPARATOR)
            .any(|entry| same_dir(entry, dir))
        {
            debug!(dir, "Already on PATH");
            return Ok(false);
        }

        let updated = if current.is_empty() {
            dir.to_string()
        } else {
            format!("{dir}{PATH_LIST_SEPARATOR}{current}")
        };
        self.set_user_env_var(PATH_VAR, &updated)?;
        debug!(dir, "Added to PATH");
        Ok(true)
    }
}

fn same_dir(a: &str, b: &str) -> bool {
    let trim = |s: &str| s.trim().trim_end_matches(['\\', '/']).to_string();
    !a.trim().is_empty() && trim(a).eq_ignore_ascii_case(&trim(b))
}
