//! Key-value storage backends for persisted directory state.
//!
//! # Responsibility
//! - Define a browser-storage style contract (`get_item`/`set_item`/`remove_item`).
//! - Provide SQLite-backed and in-memory implementations.
//!
//! # Invariants
//! - Values are opaque UTF-8 strings; callers own the encoding.
//! - A configured quota bounds the total bytes (keys + values) held by a
//!   backend; writes that would exceed it fail with `QuotaExceeded` and leave
//!   the previous value in place.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory;
mod sqlite;

pub use memory::MemoryStorage;
pub use sqlite::SqliteKeyValueStorage;

pub type StorageResult<T> = Result<T, StorageError>;

/// Storage-layer error for key-value reads and writes.
#[derive(Debug)]
pub enum StorageError {
    Db(DbError),
    /// The write would push the backend over its byte quota.
    QuotaExceeded {
        key: String,
        required: usize,
        quota: usize,
    },
    /// The backend cannot be used at all (e.g. disabled by the host).
    Unavailable(String),
    /// The value could not be encoded for storage.
    Encode(serde_json::Error),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::QuotaExceeded {
                key,
                required,
                quota,
            } => write!(
                f,
                "storage quota exceeded writing `{key}`: {required} bytes required, quota is {quota}"
            ),
            Self::Unavailable(message) => write!(f, "storage unavailable: {message}"),
            Self::Encode(err) => write!(f, "failed to encode stored value: {err}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::QuotaExceeded { .. } | Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Browser-storage style key-value contract.
pub trait KeyValueStorage {
    /// Returns the stored value, or `None` when the key is absent.
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;
    /// Inserts or replaces the value stored under `key`.
    fn set_item(&mut self, key: &str, value: &str) -> StorageResult<()>;
    /// Removes `key`; removing an absent key is not an error.
    fn remove_item(&mut self, key: &str) -> StorageResult<()>;
}

impl<S: KeyValueStorage + ?Sized> KeyValueStorage for Box<S> {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&mut self, key: &str) -> StorageResult<()> {
        (**self).remove_item(key)
    }
}

/// Checks whether replacing `key` with `value` fits into `quota`.
///
/// `current_total` is the backend byte total, `current_entry` the bytes the
/// existing entry for `key` occupies (0 when absent).
pub(crate) fn check_quota(
    quota: Option<usize>,
    key: &str,
    value: &str,
    current_total: usize,
    current_entry: usize,
) -> StorageResult<()> {
    let Some(quota) = quota else {
        return Ok(());
    };
    let required = current_total - current_entry + key.len() + value.len();
    if required > quota {
        return Err(StorageError::QuotaExceeded {
            key: key.to_string(),
            required,
            quota,
        });
    }
    Ok(())
}
