//! Task collection store.
//!
//! # Invariants
//! - Mutations apply to memory first, then persist the whole collection
//!   under [`TASKS_KEY`].
//! - `update` and `delete` of an unknown id leave the collection unchanged.

use super::{Collection, Record, StoreError, StoreResult};
use crate::kv::{KvStore, TASKS_KEY};
use crate::model::task::{NewTask, Task, TaskId};
use crate::model::validation::ValidationError;
use log::info;

const COLLECTION: &str = "task";

impl Record for Task {
    fn record_id(&self) -> i64 {
        self.id
    }
}

/// Owns the canonical task collection.
pub struct TaskStore<S: KvStore> {
    inner: Collection<S, Task>,
}

impl<S: KvStore> TaskStore<S> {
    /// Loads the persisted collection, starting empty if none was written.
    pub fn load(kv: S) -> StoreResult<Self> {
        Ok(Self {
            inner: Collection::load(kv, TASKS_KEY)?,
        })
    }

    /// Current collection in insertion order.
    pub fn list(&self) -> &[Task] {
        self.inner.records()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.inner.get(id)
    }

    /// Creates a task from form input and persists the new collection.
    ///
    /// # Errors
    /// - `Validation(EmptyTitle)` for a blank title; nothing changes.
    /// - `Storage` when the write fails; the task stays in memory.
    pub fn create(&mut self, draft: &NewTask) -> StoreResult<Task> {
        let id = self.inner.next_id();
        let task = Task::from_draft(id, draft)?;
        self.inner.push(task.clone())?;
        info!(
            "event=task_create module=store status=ok id={id} tags={}",
            task.tags.len()
        );
        Ok(task)
    }

    /// Replaces the record addressed by `id` with `record` as given.
    ///
    /// # Errors
    /// - `NotFound` when no task has `id`.
    /// - `Validation(IdMismatch)` when `record.id != id`.
    /// - `Storage` when the write fails; the replacement stays in memory.
    pub fn update(&mut self, id: TaskId, record: Task) -> StoreResult<()> {
        let index = self.inner.position(id).ok_or(StoreError::NotFound {
            collection: COLLECTION,
            id,
        })?;
        if record.id != id {
            return Err(ValidationError::IdMismatch {
                expected: id,
                actual: record.id,
            }
            .into());
        }
        self.inner.replace(index, record)?;
        info!("event=task_update module=store status=ok id={id}");
        Ok(())
    }

    /// Removes the task with `id` and returns it.
    ///
    /// # Errors
    /// - `NotFound` when no task has `id`; repeat deletes land here.
    /// - `Storage` when the write fails; the removal stays in memory.
    pub fn delete(&mut self, id: TaskId) -> StoreResult<Task> {
        let index = self.inner.position(id).ok_or(StoreError::NotFound {
            collection: COLLECTION,
            id,
        })?;
        let (removed, persisted) = self.inner.remove(index);
        persisted?;
        info!("event=task_delete module=store status=ok id={id}");
        Ok(removed)
    }

    /// Re-sends the current snapshot, e.g. after a storage failure.
    pub fn persist(&mut self) -> StoreResult<()> {
        self.inner.persist()
    }

    /// Whether the in-memory collection is ahead of the last successful write.
    pub fn is_dirty(&self) -> bool {
        self.inner.is_dirty()
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.inner.mark_dirty();
    }

    pub(crate) fn adapter(&self) -> &S {
        self.inner.adapter()
    }
}

#[cfg(test)]
mod tests {
    use super::TaskStore;
    use crate::kv::{KvStore, MemoryKvStore, TASKS_KEY};
    use crate::model::task::NewTask;
    use crate::store::StoreError;

    #[test]
    fn create_appends_in_insertion_order() {
        let kv = MemoryKvStore::new();
        let mut store = TaskStore::load(&kv).expect("empty store should load");

        let first = store.create(&NewTask::new("one")).expect("create should succeed");
        let second = store.create(&NewTask::new("two")).expect("create should succeed");

        let ids: Vec<_> = store.list().iter().map(|task| task.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
        assert!(second.id > first.id);
    }

    #[test]
    fn create_writes_full_snapshot() {
        let kv = MemoryKvStore::new();
        let mut store = TaskStore::load(&kv).expect("empty store should load");
        store.create(&NewTask::new("one")).expect("create should succeed");
        store.create(&NewTask::new("two")).expect("create should succeed");

        let blob = kv
            .load(TASKS_KEY)
            .expect("read should succeed")
            .expect("tasks key should be written");
        let decoded: Vec<serde_json::Value> =
            serde_json::from_str(&blob).expect("blob should be a JSON array");
        assert_eq!(decoded.len(), 2);
        assert!(!store.is_dirty());
    }

    #[test]
    fn update_rejects_record_with_other_id() {
        let kv = MemoryKvStore::new();
        let mut store = TaskStore::load(&kv).expect("empty store should load");
        let task = store.create(&NewTask::new("one")).expect("create should succeed");

        let mut replacement = task.clone();
        replacement.id += 1;
        let err = store
            .update(task.id, replacement)
            .expect_err("id change must be rejected");
        assert!(matches!(err, StoreError::Validation(_)));
        assert_eq!(store.list(), &[task]);
    }
}
