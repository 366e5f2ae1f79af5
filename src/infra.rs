//! Infrastructure traits for abstracting I/O operations.
//!
//! The configuration loader talks to the filesystem through this trait so
//! tests can inject in-memory implementations instead of touching disk.

use std::io;
use std::path::Path;

/// Trait for abstracting filesystem operations.
///
/// Allows dependency injection of filesystem access, making the loader
/// testable without real files and open to alternative backends.
pub trait FileSystem {
    /// Read the entire contents of a file into a string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Write a slice of bytes to a file.
    fn write(&self, path: &Path, contents: impl AsRef<[u8]>) -> io::Result<()>;

    /// Whether a path exists.
    fn exists(&self, path: &Path) -> bool;
}

/// Real filesystem implementation that delegates to std::fs.
#[derive(Clone, Copy)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, contents: impl AsRef<[u8]>) -> io::Result<()> {
        std::fs::write(path, contents)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_real_filesystem_round_trips_file_contents() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("probe.txt");

        let fs = RealFileSystem;
        assert!(!fs.exists(&path));

        fs.write(&path, "hello").unwrap();
        assert!(fs.exists(&path));
        assert_eq!(fs.read_to_string(&path).unwrap(), "hello");
    }

    #[test]
    fn test_real_filesystem_read_missing_file_is_not_found() {
        let temp = tempfile::tempdir().unwrap();
        let err = RealFileSystem
            .read_to_string(&temp.path().join("absent"))
            .unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }
}
