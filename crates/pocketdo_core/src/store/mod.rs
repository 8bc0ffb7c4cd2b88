//! In-memory collections mirrored to the persistence port.
//!
//! # Responsibility
//! - Own the canonical task and project collections.
//! - Persist the full collection snapshot after every mutation.
//!
//! # Invariants
//! - In-memory state is authoritative; a failed write leaves the mutation
//!   applied and the collection marked dirty until a later write succeeds.
//! - Persisted blobs are full snapshots, never deltas.
//! - Read paths reject undecodable or duplicate-id blobs instead of masking them.

use crate::kv::{KvError, KvStore};
use crate::model::id::IdClock;
use crate::model::validation::ValidationError;
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod project_store;
pub mod task_store;

pub type StoreResult<T> = Result<T, StoreError>;

/// Store-level error for mutations, loads and persistence.
#[derive(Debug)]
pub enum StoreError {
    Validation(ValidationError),
    NotFound { collection: &'static str, id: i64 },
    Storage(KvError),
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound { collection, id } => write!(f, "{collection} record not found: {id}"),
            Self::Storage(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::NotFound { .. } | Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<KvError> for StoreError {
    fn from(value: KvError) -> Self {
        Self::Storage(value)
    }
}

/// Record kinds that live in a persisted collection.
pub(crate) trait Record: Serialize + DeserializeOwned {
    fn record_id(&self) -> i64;
}

/// Shared load/persist/dirty bookkeeping for one collection key.
pub(crate) struct Collection<S, T> {
    kv: S,
    key: &'static str,
    records: Vec<T>,
    ids: IdClock,
    dirty: bool,
}

impl<S: KvStore, T: Record> Collection<S, T> {
    pub(crate) fn load(kv: S, key: &'static str) -> StoreResult<Self> {
        let records: Vec<T> = match kv.load(key)? {
            Some(blob) => serde_json::from_str(&blob).map_err(|err| {
                StoreError::InvalidData(format!("key `{key}` is not a valid collection: {err}"))
            })?,
            None => Vec::new(),
        };

        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if !seen.insert(record.record_id()) {
                return Err(StoreError::InvalidData(format!(
                    "key `{key}` holds duplicate id {}",
                    record.record_id()
                )));
            }
        }

        let ids = IdClock::seeded(records.iter().map(Record::record_id));
        info!(
            "event=collection_load module=store status=ok key={key} count={}",
            records.len()
        );

        Ok(Self {
            kv,
            key,
            records,
            ids,
            dirty: false,
        })
    }

    pub(crate) fn records(&self) -> &[T] {
        &self.records
    }

    pub(crate) fn position(&self, id: i64) -> Option<usize> {
        self.records.iter().position(|record| record.record_id() == id)
    }

    pub(crate) fn get(&self, id: i64) -> Option<&T> {
        self.records.iter().find(|record| record.record_id() == id)
    }

    pub(crate) fn next_id(&mut self) -> i64 {
        self.ids.next_id()
    }

    pub(crate) fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn adapter(&self) -> &S {
        &self.kv
    }

    pub(crate) fn push(&mut self, record: T) -> StoreResult<()> {
        self.ids.observe(record.record_id());
        self.records.push(record);
        self.commit()
    }

    pub(crate) fn replace(&mut self, index: usize, record: T) -> StoreResult<()> {
        self.records[index] = record;
        self.commit()
    }

    pub(crate) fn remove(&mut self, index: usize) -> (T, StoreResult<()>) {
        let removed = self.records.remove(index);
        (removed, self.commit())
    }

    /// Marks the snapshot dirty, then writes it.
    fn commit(&mut self) -> StoreResult<()> {
        self.dirty = true;
        self.persist()
    }

    /// Writes the current snapshot; clears the dirty flag on success.
    pub(crate) fn persist(&mut self) -> StoreResult<()> {
        let blob = serde_json::to_string(&self.records).map_err(|err| {
            StoreError::InvalidData(format!("cannot encode key `{}`: {err}", self.key))
        })?;

        match self.kv.store(self.key, &blob) {
            Ok(()) => {
                self.dirty = false;
                Ok(())
            }
            Err(err) => {
                warn!(
                    "event=collection_persist module=store status=error key={} count={} error={err}",
                    self.key,
                    self.records.len()
                );
                Err(err.into())
            }
        }
    }
}
