//! Loader for add-on manifests laid out one per directory:
//!
//! ```text
//! addOns/
//!   selenium/
//!     addon.toml
//!   spiderAjax/
//!     addon.toml
//! ```
//!
//! A file that cannot be read or parsed does not stop the others from
//! loading; each file yields its own [`LoadedManifest`].

use std::fs;
use std::path::{Path, PathBuf};

use crate::MANIFEST_FILENAME;
use crate::error::{Error, Result};
use crate::manifest::RawManifest;

/// The outcome of loading one manifest file.
#[derive(Debug)]
pub struct LoadedManifest {
    pub path: PathBuf,
    pub record: Result<RawManifest>,
}

/// Read a single manifest file.
pub fn load_manifest(path: &Path) -> Result<RawManifest> {
    RawManifest::from_path(path)
}

/// Load every `addon.toml` found in the immediate subdirectories of `dir`,
/// in ascending path order.
///
/// # Errors
///
/// Returns `Error::Io` if `dir` itself cannot be read. Per-file failures
/// are reported in the returned entries instead.
pub fn load_dir(dir: &Path) -> Result<Vec<LoadedManifest>> {
    let entries = fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;

    let mut paths: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .map(|path| path.join(MANIFEST_FILENAME))
        .filter(|path| path.is_file())
        .collect();
    paths.sort();

    tracing::debug!("Found {} manifest(s) in {:?}", paths.len(), dir);

    Ok(paths
        .into_iter()
        .map(|path| {
            let record = load_manifest(&path);
            if let Err(ref e) = record {
                // Log warning but continue loading other files
                tracing::warn!("Failed to load {:?}: {}", path, e);
            }
            LoadedManifest { path, record }
        })
        .collect())
}

/// Load manifests from several directories, keeping the given directory order.
pub fn load_dirs<P: AsRef<Path>>(dirs: &[P]) -> Result<Vec<LoadedManifest>> {
    let mut loaded = Vec::new();
    for dir in dirs {
        loaded.extend(load_dir(dir.as_ref())?);
    }
    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use addon_test_utils::ManifestTree;

    #[test]
    fn test_load_dir_sorted_by_directory() {
        let tree = ManifestTree::new();
        tree.add_addon("zeta", "1.0.0", "2.0.0", &[]);
        tree.add_addon("alpha", "1.0.0", "2.0.0", &[("zeta", ">=1.0.0")]);

        let loaded = load_dir(tree.path()).unwrap();
        let ids: Vec<String> = loaded
            .iter()
            .map(|m| m.record.as_ref().unwrap().addon.id.clone().unwrap())
            .collect();
        assert_eq!(ids, vec!["alpha", "zeta"]);

        let alpha = loaded[0].record.as_ref().unwrap();
        assert_eq!(alpha.dependencies.len(), 1);
        assert_eq!(alpha.dependencies[0].version.as_deref(), Some(">=1.0.0"));
    }

    #[test]
    fn test_broken_file_does_not_hide_others() {
        let tree = ManifestTree::new();
        tree.add_addon("good", "1.0.0", "2.0.0", &[]);
        tree.write_manifest("broken", "[addon\nid = ");

        let loaded = load_dir(tree.path()).unwrap();
        assert_eq!(loaded.len(), 2);
        assert!(matches!(loaded[0].record, Err(Error::Parse { .. })));
        assert!(loaded[0].path.ends_with("broken/addon.toml"));
        assert!(loaded[1].record.is_ok());
    }

    #[test]
    fn test_directories_without_manifest_are_skipped() {
        let tree = ManifestTree::new();
        tree.add_addon("real", "1.0.0", "2.0.0", &[]);
        std::fs::create_dir_all(tree.path().join("notes")).unwrap();
        std::fs::write(tree.path().join("README.md"), "not an add-on").unwrap();

        let loaded = load_dir(tree.path()).unwrap();
        assert_eq!(loaded.len(), 1);
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let err = load_dir(Path::new("/nonexistent/addOns")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_load_dirs_concatenates_in_order() {
        let first = ManifestTree::new();
        first.add_addon("b", "1.0.0", "2.0.0", &[]);
        let second = ManifestTree::new();
        second.add_addon("a", "1.0.0", "2.0.0", &[]);

        let loaded = load_dirs(&[first.path(), second.path()]).unwrap();
        assert_eq!(loaded.len(), 2);
        assert!(loaded[0].path.starts_with(first.path()));
        assert!(loaded[1].path.starts_with(second.path()));
    }
}
