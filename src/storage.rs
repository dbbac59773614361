//! String key-value storage backends.
//!
//! A [`Storage`] holds named string values, the same shape as a browser
//! origin's local storage. Collections are serialized into it one key per
//! collection by [`crate::slot`].

mod memory;
mod schema;
mod sqlite;

use thiserror::Error;

pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

/// Errors raised by storage backends and slot serialization.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying SQLite failure (disk full, locked, read-only file, ...)
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Value could not be serialized to JSON
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backend refused a write because it would exceed its byte quota
    #[error("Quota exceeded writing '{key}': {needed} bytes needed, {quota} allowed")]
    QuotaExceeded {
        key: String,
        needed: usize,
        quota: usize,
    },
}

/// A flat string-to-string store addressed by key.
///
/// All methods take `&self`; backends are used from a single thread and
/// manage their own interior mutability.
pub trait Storage {
    /// Returns the value stored under `key`, or `None` if the key is absent.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<S: Storage + ?Sized> Storage for Box<S> {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }
}
