//! Project collection store. Projects are create-only.

use super::{Collection, Record, StoreResult};
use crate::kv::{KvStore, PROJECTS_KEY};
use crate::model::project::{Project, ProjectId};
use log::info;

impl Record for Project {
    fn record_id(&self) -> i64 {
        self.id
    }
}

/// Owns the canonical project collection.
pub struct ProjectStore<S: KvStore> {
    inner: Collection<S, Project>,
}

impl<S: KvStore> ProjectStore<S> {
    pub fn load(kv: S) -> StoreResult<Self> {
        Ok(Self {
            inner: Collection::load(kv, PROJECTS_KEY)?,
        })
    }

    pub fn list(&self) -> &[Project] {
        self.inner.records()
    }

    pub fn get(&self, id: ProjectId) -> Option<&Project> {
        self.inner.get(id)
    }

    /// Creates a project and persists the new collection.
    ///
    /// # Errors
    /// - `Validation(EmptyProjectName)` for a blank name; nothing changes.
    /// - `Storage` when the write fails; the project stays in memory.
    pub fn create(&mut self, name: &str) -> StoreResult<Project> {
        let project = Project::new(0, name)?;
        let project = Project {
            id: self.inner.next_id(),
            ..project
        };
        self.inner.push(project.clone())?;
        info!("event=project_create module=store status=ok id={}", project.id);
        Ok(project)
    }

    pub fn persist(&mut self) -> StoreResult<()> {
        self.inner.persist()
    }

    pub fn is_dirty(&self) -> bool {
        self.inner.is_dirty()
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.inner.mark_dirty();
    }
}

#[cfg(test)]
mod tests {
    use super::ProjectStore;
    use crate::kv::MemoryKvStore;
    use crate::model::validation::ValidationError;
    use crate::store::StoreError;

    #[test]
    fn blank_name_changes_nothing() {
        let kv = MemoryKvStore::new();
        let mut store = ProjectStore::load(&kv).expect("empty store should load");

        let err = store.create("   ").expect_err("blank name must be rejected");
        assert!(matches!(
            err,
            StoreError::Validation(ValidationError::EmptyProjectName)
        ));
        assert!(store.list().is_empty());
        assert!(kv.is_empty());
    }

    #[test]
    fn created_projects_get_distinct_ids() {
        let kv = MemoryKvStore::new();
        let mut store = ProjectStore::load(&kv).expect("empty store should load");
        let home = store.create("Home").expect("create should succeed");
        let work = store.create("Work").expect("create should succeed");

        assert_ne!(home.id, work.id);
        assert_eq!(store.get(work.id).map(|p| p.name.as_str()), Some("Work"));
    }
}
