//! UTF-8 file access relative to the repository root

use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Read/write capability for the files a release mutates.
///
/// Paths are relative to the repository root.
pub trait Workspace {
    fn read(&self, path: &Path) -> Result<String>;
    fn write(&self, path: &Path, contents: &str) -> Result<()>;
}

/// Workspace backed by the working tree on disk
#[derive(Debug, Clone)]
pub struct FsWorkspace {
    root: PathBuf,
}

impl FsWorkspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FsWorkspace { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Workspace for FsWorkspace {
    fn read(&self, path: &Path) -> Result<String> {
        Ok(fs::read_to_string(self.root.join(path))?)
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        Ok(fs::write(self.root.join(path), contents)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_round_trip_relative_to_root() {
        let dir = TempDir::new().unwrap();
        let workspace = FsWorkspace::new(dir.path());
        workspace
            .write(Path::new("build.gradle"), "version = '1.0.0'\n")
            .unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join("build.gradle")).unwrap(),
            "version = '1.0.0'\n"
        );
        assert_eq!(
            workspace.read(Path::new("build.gradle")).unwrap(),
            "version = '1.0.0'\n"
        );
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let workspace = FsWorkspace::new(dir.path());
        let err = workspace.read(Path::new("nope.txt")).unwrap_err();
        assert!(err.to_string().contains("I/O error"));
    }
}
