//! Symlink operations (create, check, resolve, remove).

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::RealRuntime;

impl RealRuntime {
    #[tracing::instrument(skip(self))]
    pub(crate) fn symlink_impl(&self, original: &Path, link: &Path) -> Result<()> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::symlink as unix_symlink;
            unix_symlink(original, link).context("Failed to create symlink")?;
        }
        #[cfg(windows)]
        {
            use std::os::windows::fs::symlink_file;
            symlink_file(original, link).context("Failed to create file symlink")?;
        }
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn is_symlink_impl(&self, path: &Path) -> bool {
        fs::symlink_metadata(path)
            .map(|m| m.file_type().is_symlink())
            .unwrap_or(false)
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn remove_symlink_impl(&self, path: &Path) -> Result<()> {
        #[cfg(unix)]
        {
            fs::remove_file(path).context("Failed to remove symlink")?;
        }
        #[cfg(windows)]
        {
            // On Windows, removing a symlink requires remove_dir for a directory
            // symlink and remove_file for a file symlink. We try to remove it as
            // a file first, and if that fails, we try to remove it as a directory.
            fs::remove_file(path)
                .or_else(|_| fs::remove_dir(path))
                .context("Failed to remove symlink")?;
        }
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn canonicalize_impl(&self, path: &Path) -> Result<PathBuf> {
        fs::canonicalize(path).context("Failed to canonicalize path")
    }
}

#[cfg(test)]
mod tests {
    use crate::runtime::{RealRuntime, Runtime};
    use tempfile::tempdir;

    #[cfg(unix)]
    #[test]
    fn test_real_runtime_symlink_ops() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();

        // Create a target file
        let target = dir.path().join("target.txt");
        runtime.write(&target, b"content").unwrap();

        // Test symlink and is_symlink
        let link = dir.path().join("link.txt");
        runtime.symlink(&target, &link).unwrap();
        assert!(runtime.is_symlink(&link));
        assert!(!runtime.is_symlink(&target));

        // Read through symlink
        let content = runtime.read_to_string(&link).unwrap();
        assert_eq!(content, "content");

        // Test canonicalize
        let canonical = runtime.canonicalize(&link).unwrap();
        assert!(canonical.ends_with("target.txt"));

        // Test remove_symlink
        runtime.remove_symlink(&link).unwrap();
        assert!(!runtime.exists(&link));
        assert!(runtime.exists(&target));
    }

    #[cfg(unix)]
    #[test]
    fn test_relative_symlink_resolves_through_parent() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();

        // dir/target.txt, dir/sub/link.txt -> ../target.txt
        let target = dir.path().join("target.txt");
        runtime.write(&target, b"content").unwrap();

        let sub_dir = dir.path().join("sub");
        runtime.create_dir_all(&sub_dir).unwrap();

        let link = sub_dir.join("link.txt");
        runtime
            .symlink(std::path::Path::new("../target.txt"), &link)
            .unwrap();

        assert!(runtime.is_symlink(&link));
        assert_eq!(runtime.read_to_string(&link).unwrap(), "content");

        // Canonicalizing the link lands on the target
        let resolved = runtime.canonicalize(&link).unwrap();
        let target_canonical = runtime.canonicalize(&target).unwrap();
        assert_eq!(resolved, target_canonical);
    }

    #[cfg(unix)]
    #[test]
    fn test_is_symlink_on_dangling_link() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();

        let link = dir.path().join("dangling");
        runtime
            .symlink(std::path::Path::new("does-not-exist"), &link)
            .unwrap();

        // exists() follows the link and reports false, but the entry is there
        assert!(runtime.is_symlink(&link));
        assert!(!runtime.exists(&link));

        runtime.remove_symlink(&link).unwrap();
        assert!(!runtime.is_symlink(&link));
    }

    #[test]
    fn test_canonicalize_nonexistent_fails() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();
        assert!(runtime.canonicalize(&dir.path().join("missing")).is_err());
    }
}
