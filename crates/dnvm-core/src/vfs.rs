//! Virtual filesystem.
//!
//! dnvm addresses its state through [`VfsPath`]s rooted at `/`. A [`Vfs`]
//! maps those onto storage: [`PhysicalFs`] onto a directory of the real
//! filesystem, [`MemoryFs`] onto a map held in memory for tests.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Absolute, `/`-separated path inside a virtual root.
///
/// Paths are normalised on construction: backslashes become `/`, empty and
/// `.` segments are dropped and `..` never climbs above the root.
///
/// # Example
///
/// ```
/// use dnvm_core::VfsPath;
///
/// let path = VfsPath::new("dn/../sdk//8.0.100");
/// assert_eq!(path.as_str(), "/sdk/8.0.100");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VfsPath(String);

impl VfsPath {
    /// The root, `/`.
    pub fn root() -> Self {
        Self("/".to_string())
    }

    /// Normalise `path` into a rooted virtual path.
    pub fn new(path: impl AsRef<str>) -> Self {
        let mut segments: Vec<&str> = Vec::new();
        for segment in path.as_ref().split(['/', '\\']) {
            match segment {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                other => segments.push(other),
            }
        }
        Self(format!("/{}", segments.join("/")))
    }

    /// Append a child path.
    pub fn join(&self, child: impl AsRef<str>) -> Self {
        Self::new(format!("{}/{}", self.0, child.as_ref()))
    }

    /// Append `suffix` to the final segment (`/a.json` + `.tmp` = `/a.json.tmp`).
    pub fn with_suffix(&self, suffix: &str) -> Self {
        Self::new(format!("{}{suffix}", self.0))
    }

    /// The containing directory, or `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        let idx = self.0.rfind('/').unwrap_or(0);
        Some(Self::new(&self.0[..idx]))
    }

    /// Whether this is `/`.
    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    /// Non-empty segments below the root.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }

    /// The normalised string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VfsPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VfsPath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

/// Filesystem operations dnvm performs on its virtual root.
///
/// Callers must not care which implementation they hold. The one
/// exception is [`real_path`](Vfs::real_path), which only storage backed by
/// the OS can answer.
pub trait Vfs: fmt::Debug + Send + Sync {
    /// Read a whole file as UTF-8.
    ///
    /// # Errors
    ///
    /// `NotFound` if the file does not exist, or any I/O error.
    fn read_to_string(&self, path: &VfsPath) -> io::Result<String>;

    /// Create or truncate a file and write `contents`. Missing parent
    /// directories are created.
    ///
    /// # Errors
    ///
    /// Any I/O error.
    fn write_string(&self, path: &VfsPath, contents: &str) -> io::Result<()>;

    /// Move a file, atomically replacing `to` if it exists.
    ///
    /// # Errors
    ///
    /// `NotFound` if `from` does not exist, or any I/O error.
    fn rename(&self, from: &VfsPath, to: &VfsPath) -> io::Result<()>;

    /// Delete a file.
    ///
    /// # Errors
    ///
    /// `NotFound` if the file does not exist, or any I/O error.
    fn remove_file(&self, path: &VfsPath) -> io::Result<()>;

    /// Whether a file or directory exists at `path`.
    fn exists(&self, path: &VfsPath) -> bool;

    /// Create a directory and all of its parents.
    ///
    /// # Errors
    ///
    /// Any I/O error.
    fn create_dir_all(&self, path: &VfsPath) -> io::Result<()>;

    /// The OS path backing `path`, for handing to external processes.
    ///
    /// # Errors
    ///
    /// `Unsupported` when the storage is not visible to other processes.
    fn real_path(&self, path: &VfsPath) -> io::Result<PathBuf>;
}

/// A [`Vfs`] rooted at a directory of the real filesystem.
#[derive(Debug, Clone)]
pub struct PhysicalFs {
    root: PathBuf,
}

impl PhysicalFs {
    /// Serve `root` as `/`. The directory does not need to exist yet.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory backing `/`.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &VfsPath) -> PathBuf {
        path.segments().fold(self.root.clone(), |acc, s| acc.join(s))
    }
}

impl Vfs for PhysicalFs {
    fn read_to_string(&self, path: &VfsPath) -> io::Result<String> {
        fs::read_to_string(self.resolve(path))
    }

    fn write_string(&self, path: &VfsPath, contents: &str) -> io::Result<()> {
        let real = self.resolve(path);
        if let Some(parent) = real.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = fs::File::create(&real)?;
        file.write_all(contents.as_bytes())?;
        // Data must be on disk before a following rename publishes it.
        file.sync_all()
    }

    fn rename(&self, from: &VfsPath, to: &VfsPath) -> io::Result<()> {
        fs::rename(self.resolve(from), self.resolve(to))
    }

    fn remove_file(&self, path: &VfsPath) -> io::Result<()> {
        fs::remove_file(self.resolve(path))
    }

    fn exists(&self, path: &VfsPath) -> bool {
        self.resolve(path).exists()
    }

    fn create_dir_all(&self, path: &VfsPath) -> io::Result<()> {
        fs::create_dir_all(self.resolve(path))
    }

    fn real_path(&self, path: &VfsPath) -> io::Result<PathBuf> {
        Ok(self.resolve(path))
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    files: BTreeMap<VfsPath, String>,
    dirs: BTreeSet<VfsPath>,
}

impl MemoryState {
    fn add_dir_all(&mut self, path: &VfsPath) {
        let mut current = Some(path.clone());
        while let Some(dir) = current {
            if dir.is_root() || !self.dirs.insert(dir.clone()) {
                break;
            }
            current = dir.parent();
        }
    }

    /// Fails if any ancestor of `path` is a file.
    fn check_ancestors(&self, path: &VfsPath) -> io::Result<()> {
        let mut current = path.parent();
        while let Some(dir) = current {
            if self.files.contains_key(&dir) {
                return Err(io::Error::new(
                    io::ErrorKind::NotADirectory,
                    format!("{dir} is a file"),
                ));
            }
            current = dir.parent();
        }
        Ok(())
    }
}

/// An in-memory [`Vfs`] for tests.
#[derive(Debug, Default)]
pub struct MemoryFs {
    state: Mutex<MemoryState>,
}

impl MemoryFs {
    /// An empty filesystem containing only `/`.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        // A panic mid-operation cannot leave the maps half-updated.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn not_found(path: &VfsPath) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, format!("{path} does not exist"))
}

fn is_a_directory(path: &VfsPath) -> io::Error {
    io::Error::new(io::ErrorKind::IsADirectory, format!("{path} is a directory"))
}

impl Vfs for MemoryFs {
    fn read_to_string(&self, path: &VfsPath) -> io::Result<String> {
        self.lock()
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| not_found(path))
    }

    fn write_string(&self, path: &VfsPath, contents: &str) -> io::Result<()> {
        let mut state = self.lock();
        if state.dirs.contains(path) {
            return Err(is_a_directory(path));
        }
        state.check_ancestors(path)?;
        if let Some(parent) = path.parent() {
            state.add_dir_all(&parent);
        }
        state.files.insert(path.clone(), contents.to_string());
        Ok(())
    }

    fn rename(&self, from: &VfsPath, to: &VfsPath) -> io::Result<()> {
        let mut state = self.lock();
        if !state.files.contains_key(from) {
            return Err(not_found(from));
        }
        if state.dirs.contains(to) {
            return Err(is_a_directory(to));
        }
        state.check_ancestors(to)?;
        let contents = state.files.remove(from).ok_or_else(|| not_found(from))?;
        if let Some(parent) = to.parent() {
            state.add_dir_all(&parent);
        }
        state.files.insert(to.clone(), contents);
        Ok(())
    }

    fn remove_file(&self, path: &VfsPath) -> io::Result<()> {
        self.lock()
            .files
            .remove(path)
            .map(drop)
            .ok_or_else(|| not_found(path))
    }

    fn exists(&self, path: &VfsPath) -> bool {
        let state = self.lock();
        path.is_root() || state.files.contains_key(path) || state.dirs.contains(path)
    }

    fn create_dir_all(&self, path: &VfsPath) -> io::Result<()> {
        let mut state = self.lock();
        if state.files.contains_key(path) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{path} is a file"),
            ));
        }
        state.check_ancestors(path)?;
        state.add_dir_all(path);
        Ok(())
    }

    fn real_path(&self, path: &VfsPath) -> io::Result<PathBuf> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            format!("{path} lives in memory and has no OS path"),
        ))
    }
}
