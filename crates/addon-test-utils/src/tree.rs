//! [`ManifestTree`] builder for on-disk add-on manifest scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::manifest::ManifestToml;

/// A temporary directory laid out as a manifest directory: one
/// subdirectory per add-on, each holding an `addon.toml`.
///
/// # Example
///
/// ```rust
/// use addon_test_utils::ManifestTree;
///
/// let tree = ManifestTree::new();
/// tree.add_addon("core", "1.0.0", "2.0.0", &[]);
/// tree.add_addon("ui", "1.0.0", "2.0.0", &[("core", ">=1.0.0")]);
/// tree.assert_file_exists("ui/addon.toml");
/// ```
pub struct ManifestTree {
    temp_dir: TempDir,
}

impl Default for ManifestTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ManifestTree {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Return the root path of the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write `<root>/<id>/addon.toml` from a builder.
    pub fn add(&self, manifest: &ManifestToml) -> PathBuf {
        self.write_manifest(manifest.id(), &manifest.render())
    }

    /// Write `<root>/<parent>/<id>/addon.toml`, for trees holding several
    /// manifest directories.
    pub fn add_in(&self, parent: &str, manifest: &ManifestToml) -> PathBuf {
        self.write_manifest(&format!("{parent}/{}", manifest.id()), &manifest.render())
    }

    /// Write a manifest with the required fields and the given dependencies.
    pub fn add_addon(
        &self,
        id: &str,
        version: &str,
        min_host: &str,
        dependencies: &[(&str, &str)],
    ) -> PathBuf {
        let manifest = dependencies
            .iter()
            .fold(ManifestToml::new(id, version, min_host), |m, (dep, range)| {
                m.dependency(dep, range)
            });
        self.add(&manifest)
    }

    /// Write raw `content` to `<root>/<dir>/addon.toml`.
    pub fn write_manifest(&self, dir: &str, content: &str) -> PathBuf {
        self.write_file(&format!("{dir}/addon.toml"), content)
    }

    /// Write `content` to `path` relative to the root, creating parents.
    ///
    /// # Panics
    /// Panics if the filesystem operations fail.
    pub fn write_file(&self, path: &str, content: &str) -> PathBuf {
        let full_path = self.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)
                .unwrap_or_else(|e| panic!("write_file: failed to create {}: {e}", parent.display()));
        }
        fs::write(&full_path, content)
            .unwrap_or_else(|e| panic!("write_file: failed to write {}: {e}", full_path.display()));
        full_path
    }

    /// Assert that `path` (relative to the root) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.path().join(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }
}
