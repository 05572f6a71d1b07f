//! # dedup-storage
//!
//! SQLite persistence for the primary content store and the archive of
//! demoted records. One `StorageEngine` implements both store traits.

pub mod engine;
pub mod migrations;
pub mod pool;
pub mod queries;

pub use engine::StorageEngine;

use dedup_core::errors::{DedupError, StorageError};

/// Wrap a SQLite failure message as a `DedupError`.
pub(crate) fn to_storage_err(message: String) -> DedupError {
    DedupError::StorageError(StorageError::SqliteError { message })
}
