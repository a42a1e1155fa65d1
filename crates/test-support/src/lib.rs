//! Shared fixtures for the workspace's integration tests.
//!
//! Everything here builds throwaway filesystem state under a [`TempDir`] so
//! tests never touch paths outside their own scratch directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub use tempfile::TempDir;

/// Creates a fresh scratch directory.
pub fn scratch() -> io::Result<TempDir> {
    tempfile::Builder::new().prefix("oscalls-").tempdir()
}

/// Writes a file named `name` inside `dir` holding exactly `size` bytes.
pub fn file_of_size(dir: &Path, name: &str, size: usize) -> io::Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, vec![b'x'; size])?;
    Ok(path)
}

/// Builds a relative path of exactly `len` bytes made of short components.
///
/// Suitable as a symlink target that exceeds small readlink buffers without
/// hitting the per-component name limit.
pub fn long_target(len: usize) -> String {
    let mut target = String::with_capacity(len);
    while target.len() < len {
        if !target.is_empty() && target.len() % 64 == 63 {
            target.push('/');
        } else {
            target.push('d');
        }
    }
    if target.ends_with('/') {
        target.pop();
        target.push('d');
    }
    target
}

/// Creates a symlink named `name` in `dir` pointing at `target`.
#[cfg(unix)]
pub fn symlink(dir: &Path, name: &str, target: &str) -> io::Result<PathBuf> {
    let path = dir.join(name);
    std::os::unix::fs::symlink(target, &path)?;
    Ok(path)
}

/// Returns a path inside `dir` that does not exist.
pub fn missing_path(dir: &Path) -> PathBuf {
    dir.join("does-not-exist")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_target_has_requested_length() {
        for len in [1, 63, 64, 65, 2000] {
            let target = long_target(len);
            assert_eq!(target.len(), len);
            assert!(!target.ends_with('/'));
            assert!(target.split('/').all(|component| component.len() < 255));
        }
    }

    #[test]
    fn file_of_size_writes_exact_length() {
        let dir = scratch().unwrap();
        let path = file_of_size(dir.path(), "blob", 4096).unwrap();
        assert_eq!(fs::metadata(path).unwrap().len(), 4096);
    }

    #[test]
    fn missing_path_does_not_exist() {
        let dir = scratch().unwrap();
        assert!(!missing_path(dir.path()).exists());
    }
}
