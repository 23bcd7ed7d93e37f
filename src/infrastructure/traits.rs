//! I/O boundary for catalog and condition-tree documents
//!
//! The document store only ever reads a whole file or replaces one, so the
//! boundary is two calls wide. Tests substitute an in-memory implementation.

use std::fs;
use std::io;
use std::path::Path;

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Whole file as UTF-8.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Replace the file, creating missing parent directories.
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;
}

/// Real filesystem implementation.
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)
    }
}
