//! Error conversion helpers for common I/O operations
//!
//! Provides extension traits for cleaner error handling with path context.

use std::io;
use std::path::Path;

use crate::infrastructure::{InfraError, InfraResult};

/// Extension trait for converting `io::Result` to `InfraResult` with context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    ///
    /// # Example
    /// ```ignore
    /// fs.read_to_string(&path)
    ///     .with_path_context("read catalog", &path)?;
    /// ```
    fn with_path_context(self, action: &str, path: &Path) -> InfraResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_path_context(self, action: &str, path: &Path) -> InfraResult<T> {
        self.map_err(|e| InfraError::io(format!("{}: {}", action, path.display()), e))
    }
}
