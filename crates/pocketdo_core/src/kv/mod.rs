//! Persistence port: whole-blob get/set by string key.
//!
//! # Responsibility
//! - Define the adapter contract stores persist through.
//! - Provide SQLite, in-memory, and write-behind implementations.
//!
//! # Invariants
//! - `store` replaces the whole value for a key; there are no partial writes.
//! - `load` returns the last value stored for a key, or `None` if never written.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

mod memory;
mod sqlite;
mod write_behind;

pub use memory::MemoryKvStore;
pub use sqlite::SqliteKvStore;
pub use write_behind::WriteBehindKv;

/// Key holding the JSON array of tasks.
pub const TASKS_KEY: &str = "tasks";
/// Key holding the JSON array of projects.
pub const PROJECTS_KEY: &str = "projects";

pub type KvResult<T> = Result<T, KvError>;

/// Failure reported by a persistence adapter.
#[derive(Debug)]
pub enum KvError {
    Db(DbError),
    /// Adapter-specific failure without a richer type.
    Backend(String),
    /// The write-behind worker thread is gone.
    WorkerUnavailable,
    /// A queued write failed after the caller had already moved on.
    Deferred { key: String, source: Box<KvError> },
}

impl Display for KvError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Backend(message) => write!(f, "storage backend failure: {message}"),
            Self::WorkerUnavailable => write!(f, "storage worker is not running"),
            Self::Deferred { key, source } => {
                write!(f, "queued write for key `{key}` failed: {source}")
            }
        }
    }
}

impl Error for KvError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Deferred { source, .. } => Some(source.as_ref()),
            Self::Backend(_) | Self::WorkerUnavailable => None,
        }
    }
}

impl From<DbError> for KvError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for KvError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Whole-blob key-value adapter used by the stores.
pub trait KvStore {
    fn load(&self, key: &str) -> KvResult<Option<String>>;
    fn store(&self, key: &str, value: &str) -> KvResult<()>;

    /// Blocks until every accepted write has been applied.
    ///
    /// Synchronous adapters apply writes inside `store`, so the default is a
    /// no-op.
    fn flush(&self) -> KvResult<()> {
        Ok(())
    }
}

impl<T: KvStore + ?Sized> KvStore for &T {
    fn load(&self, key: &str) -> KvResult<Option<String>> {
        (**self).load(key)
    }

    fn store(&self, key: &str, value: &str) -> KvResult<()> {
        (**self).store(key, value)
    }

    fn flush(&self) -> KvResult<()> {
        (**self).flush()
    }
}

impl<T: KvStore + ?Sized> KvStore for Arc<T> {
    fn load(&self, key: &str) -> KvResult<Option<String>> {
        (**self).load(key)
    }

    fn store(&self, key: &str, value: &str) -> KvResult<()> {
        (**self).store(key, value)
    }

    fn flush(&self) -> KvResult<()> {
        (**self).flush()
    }
}
