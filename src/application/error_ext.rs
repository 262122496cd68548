//! Error conversion helpers for store operations
//!
//! Provides an extension trait for attaching collection context to I/O errors.

use std::io;

use crate::application::{ApplicationError, ApplicationResult};

/// Extension trait for converting `io::Result` to `ApplicationResult` with context.
pub trait IoResultExt<T> {
    /// Add store context to an I/O error.
    ///
    /// # Example
    /// ```ignore
    /// self.store.values().with_store_context("list", "tree")?;
    /// ```
    fn with_store_context(self, action: &str, entity: &str) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_store_context(self, action: &str, entity: &str) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::Storage {
            context: format!("{} {}", action, entity),
            source: e,
        })
    }
}
