//! Manifest persistence.
//!
//! The manifest lives at `/dnvmManifest.json` in the virtual root. Reads
//! accept every format dnvm ever wrote and hand back the latest shape.
//! Writes go to `/dnvmManifest.json.tmp` first and are then renamed over
//! the real file, so the real path always holds a complete document.
//!
//! There is no cross-process locking: two dnvm processes writing at once
//! race, and the last rename wins.

use crate::error::ToolError;
use crate::vfs::{Vfs, VfsPath};
use dnvm_schema::manifest::{self, LATEST_VERSION};
use dnvm_schema::{Manifest, ManifestParseError};
use std::io;
use tracing::debug;

/// File name of the manifest in the virtual root.
pub const MANIFEST_FILE_NAME: &str = "dnvmManifest.json";

/// Appended to the manifest path while a write is in flight.
pub const TMP_SUFFIX: &str = ".tmp";

/// Reads and writes the manifest through a [`Vfs`].
#[derive(Debug, Clone, Copy)]
pub struct ManifestStore<'a> {
    vfs: &'a dyn Vfs,
}

impl<'a> ManifestStore<'a> {
    /// Store backed by `vfs`.
    pub fn new(vfs: &'a dyn Vfs) -> Self {
        Self { vfs }
    }

    /// `/dnvmManifest.json`
    pub fn path() -> VfsPath {
        VfsPath::root().join(MANIFEST_FILE_NAME)
    }

    /// `/dnvmManifest.json.tmp`
    pub fn tmp_path() -> VfsPath {
        Self::path().with_suffix(TMP_SUFFIX)
    }

    /// Whether a manifest has been written.
    pub fn exists(&self) -> bool {
        self.vfs.exists(&Self::path())
    }

    /// Load the manifest, migrating older formats to the latest.
    ///
    /// # Errors
    ///
    /// [`ToolError::Io`] if the file cannot be read (including when it does
    /// not exist), [`ToolError::ManifestCorrupt`] if it is not UTF-8 or no
    /// supported format matches its contents.
    pub fn read(&self) -> Result<Manifest, ToolError> {
        let path = Self::path();
        let text = match self.vfs.read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                return Err(ToolError::ManifestCorrupt {
                    path,
                    source: ManifestParseError::Encoding(e),
                });
            }
            Err(e) => return Err(ToolError::io(format!("Failed to read {path}"), e)),
        };

        let any = manifest::parse_any(&text)
            .map_err(|source| ToolError::ManifestCorrupt { path, source })?;

        if any.version() == LATEST_VERSION {
            debug!(version = LATEST_VERSION, "Loaded manifest");
        } else {
            debug!(
                from = any.version(),
                to = LATEST_VERSION,
                "Migrating manifest"
            );
        }
        Ok(any.into_latest())
    }

    /// Like [`read`](Self::read), but a missing manifest is an empty one.
    ///
    /// # Errors
    ///
    /// Same as [`read`](Self::read) for any failure other than absence.
    pub fn read_or_empty(&self) -> Result<Manifest, ToolError> {
        if self.exists() {
            self.read()
        } else {
            let path = Self::path();
            debug!(%path, "No manifest, starting empty");
            Ok(Manifest::default())
        }
    }

    /// Persist `manifest` in the latest format.
    ///
    /// # Errors
    ///
    /// [`ToolError::Io`] if either the temporary write or the replace fails.
    /// The previously committed manifest is untouched in both cases.
    pub fn write(&self, manifest: &Manifest) -> Result<(), ToolError> {
        let text = manifest::to_json(manifest)
            .map_err(|e| ToolError::io("Failed to serialize manifest", io::Error::from(e)))?;

        let path = Self::path();
        let tmp = Self::tmp_path();
        self.vfs
            .write_string(&tmp, &text)
            .map_err(|e| ToolError::io(format!("Failed to write {tmp}"), e))?;
        self.vfs
            .rename(&tmp, &path)
            .map_err(|e| ToolError::io(format!("Failed to replace {path}"), e))?;

        debug!(%path, version = LATEST_VERSION, "Wrote manifest");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vfs::{MemoryFs, PhysicalFs};
    use dnvm_schema::AnyManifest;
    use dnvm_schema::manifest::{InstalledSdk, ManifestV1, ManifestV2, TrackedChannel};
    use std::path::PathBuf;

    fn sample() -> Manifest {
        Manifest {
            installed_sdk_versions: vec![InstalledSdk {
                version: "8.0.100".into(),
                sdk_dir_name: "dn".into(),
            }],
            tracked_channels: vec![TrackedChannel {
                channel_name: "lts".into(),
                sdk_dir_name: "dn".into(),
                installed_sdk_versions: vec!["8.0.100".into()],
            }],
            current_sdk_dir: "dn".into(),
        }
    }

    fn historical() -> Vec<AnyManifest> {
        vec![
            AnyManifest::V1(ManifestV1 {
                installed_versions: vec!["6.0.100".into(), "7.0.100".into()],
            }),
            AnyManifest::V2(ManifestV2 {
                installed_versions: vec!["8.0.100".into()],
                tracked_channels: vec!["latest".into(), "lts".into()],
            }),
            AnyManifest::V3(sample()),
        ]
    }

    /// Wraps a filesystem and fails every rename, as if the process died
    /// between writing the temp file and replacing the manifest.
    #[derive(Debug)]
    struct InterruptedRename(MemoryFs);

    impl Vfs for InterruptedRename {
        fn read_to_string(&self, path: &VfsPath) -> io::Result<String> {
            self.0.read_to_string(path)
        }
        fn write_string(&self, path: &VfsPath, contents: &str) -> io::Result<()> {
            self.0.write_string(path, contents)
        }
        fn rename(&self, _from: &VfsPath, _to: &VfsPath) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::Interrupted, "killed"))
        }
        fn remove_file(&self, path: &VfsPath) -> io::Result<()> {
            self.0.remove_file(path)
        }
        fn exists(&self, path: &VfsPath) -> bool {
            self.0.exists(path)
        }
        fn create_dir_all(&self, path: &VfsPath) -> io::Result<()> {
            self.0.create_dir_all(path)
        }
        fn real_path(&self, path: &VfsPath) -> io::Result<PathBuf> {
            self.0.real_path(path)
        }
    }

    #[test]
    fn every_historical_version_round_trips() {
        for old in historical() {
            let fs = MemoryFs::new();
            fs.write_string(&ManifestStore::path(), &old.to_json().unwrap())
                .unwrap();
            let store = ManifestStore::new(&fs);

            let migrated = store.read().unwrap();
            assert_eq!(migrated, old.clone().into_latest());

            store.write(&migrated).unwrap();
            assert_eq!(store.read().unwrap(), migrated);
        }
    }

    #[test]
    fn write_leaves_no_temp_file() {
        let fs = MemoryFs::new();
        let store = ManifestStore::new(&fs);
        store.write(&sample()).unwrap();

        assert!(!fs.exists(&ManifestStore::tmp_path()));
        let text = fs.read_to_string(&ManifestStore::path()).unwrap();
        assert!(text.contains("\"version\": 3"));
        assert_eq!(store.read().unwrap(), sample());
    }

    #[test]
    fn interrupted_write_keeps_previous_manifest() {
        let fs = InterruptedRename(MemoryFs::new());
        let previous = r#"{"version":1,"installedVersions":["6.0.100"]}"#;
        fs.0.write_string(&ManifestStore::path(), previous).unwrap();

        let err = ManifestStore::new(&fs).write(&sample()).unwrap_err();
        assert!(matches!(err, ToolError::Io { .. }));
        assert_eq!(fs.read_to_string(&ManifestStore::path()).unwrap(), previous);
    }

    #[test]
    fn interrupted_first_write_leaves_no_manifest() {
        let fs = InterruptedRename(MemoryFs::new());
        let store = ManifestStore::new(&fs);
        assert!(store.write(&sample()).is_err());
        assert!(!store.exists());
    }

    #[test]
    fn stale_temp_file_is_overwritten() {
        let fs = MemoryFs::new();
        fs.write_string(&ManifestStore::tmp_path(), "{ half a docu")
            .unwrap();
        let store = ManifestStore::new(&fs);
        store.write(&sample()).unwrap();
        assert_eq!(store.read().unwrap(), sample());
    }

    #[test]
    fn corrupt_manifest_is_reported() {
        let fs = MemoryFs::new();
        fs.write_string(&ManifestStore::path(), "not json").unwrap();
        let err = ManifestStore::new(&fs).read().unwrap_err();
        assert!(matches!(err, ToolError::ManifestCorrupt { .. }));
        assert!(err.to_string().contains("/dnvmManifest.json"));
    }

    #[test]
    fn non_utf8_manifest_is_corrupt() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(MANIFEST_FILE_NAME),
            b"{\"installedVersions\":[\"\xff\"]}",
        )
        .unwrap();

        let fs = PhysicalFs::new(dir.path());
        let err = ManifestStore::new(&fs).read().unwrap_err();
        assert!(
            matches!(
                err,
                ToolError::ManifestCorrupt {
                    source: ManifestParseError::Encoding(_),
                    ..
                }
            ),
            "{err:?}"
        );
        assert!(err.to_string().starts_with("Manifest at /dnvmManifest.json is invalid"));
    }

    #[test]
    fn missing_manifest() {
        let fs = MemoryFs::new();
        let store = ManifestStore::new(&fs);
        assert!(matches!(store.read(), Err(ToolError::Io { .. })));
        assert_eq!(store.read_or_empty().unwrap(), Manifest::default());
    }

    #[test]
    fn physical_round_trip() {
        let dir = tempfile::TempDir::new().unwrap();
        let fs = PhysicalFs::new(dir.path());
        let store = ManifestStore::new(&fs);
        store.write(&sample()).unwrap();

        assert!(dir.path().join(MANIFEST_FILE_NAME).exists());
        assert!(!dir.path().join("dnvmManifest.json.tmp").exists());
        assert_eq!(store.read().unwrap(), sample());
    }
}
