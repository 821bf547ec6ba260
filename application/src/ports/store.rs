//! Shared document-store primitives: versioned reads and store errors.

use thiserror::Error;

/// Errors surfaced by document-store ports
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Document not found: {0}")]
    NotFound(String),

    /// The expected version no longer matches: another writer got there
    /// first. Callers retry a bounded number of times.
    #[error("Version conflict on write")]
    Conflict,

    #[error("Backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict)
    }
}

/// A document snapshot paired with the store's version counter.
///
/// The version is the compare-and-swap key: a write that names a stale
/// version fails with [`StoreError::Conflict`] instead of silently
/// overwriting a concurrent update.
#[derive(Debug, Clone)]
pub struct Versioned<T> {
    pub value: T,
    pub version: u64,
}

impl<T> Versioned<T> {
    pub fn new(value: T, version: u64) -> Self {
        Self { value, version }
    }
}
