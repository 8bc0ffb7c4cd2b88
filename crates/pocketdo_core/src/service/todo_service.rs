//! To-do use-case service.
//!
//! # Invariants
//! - Writes go through the stores; the service never edits records itself.
//! - Project references are reported, never repaired or enforced.

use crate::config::{ConfigError, CoreConfig};
use crate::kv::{KvError, KvResult, KvStore, SqliteKvStore, WriteBehindKv};
use crate::model::project::Project;
use crate::model::task::{NewTask, Task, TaskId};
use crate::query::{DateWindow, TaskFilter};
use crate::store::project_store::ProjectStore;
use crate::store::task_store::TaskStore;
use crate::store::{StoreError, StoreResult};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, Mutex, PoisonError};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failure while opening a configured service.
#[derive(Debug)]
pub enum ServiceError {
    Config(ConfigError),
    Store(StoreError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<ConfigError> for ServiceError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<KvError> for ServiceError {
    fn from(value: KvError) -> Self {
        Self::Store(StoreError::Storage(value))
    }
}

/// Adapter handle produced by [`open_service`].
pub type LocalKv = Arc<dyn KvStore + Send + Sync>;

/// Task and project stores sharing one adapter.
pub struct TodoService<S: KvStore + Clone> {
    tasks: TaskStore<S>,
    projects: ProjectStore<S>,
    default_priority: String,
}

impl<S: KvStore + Clone> TodoService<S> {
    /// Loads both collections from `kv`.
    pub fn load(kv: S) -> StoreResult<Self> {
        let tasks = TaskStore::load(kv.clone())?;
        let projects = ProjectStore::load(kv)?;
        Ok(Self {
            tasks,
            projects,
            default_priority: crate::model::task::DEFAULT_PRIORITY.to_string(),
        })
    }

    /// Overrides the priority pre-filled by [`TodoService::draft`].
    pub fn with_default_priority(mut self, priority: impl Into<String>) -> Self {
        self.default_priority = priority.into();
        self
    }

    /// Blank create-form state for `title`.
    pub fn draft(&self, title: impl Into<String>) -> NewTask {
        NewTask {
            priority: self.default_priority.clone(),
            ..NewTask::new(title)
        }
    }

    pub fn tasks(&self) -> &[Task] {
        self.tasks.list()
    }

    pub fn projects(&self) -> &[Project] {
        self.projects.list()
    }

    pub fn task_store(&self) -> &TaskStore<S> {
        &self.tasks
    }

    pub fn project_store(&self) -> &ProjectStore<S> {
        &self.projects
    }

    /// Tasks matching `query` inside `window`, evaluated now.
    pub fn filtered(&self, query: &str, window: DateWindow) -> Vec<&Task> {
        TaskFilter::new(query, window).apply(self.tasks.list())
    }

    pub fn add_task(&mut self, draft: &NewTask) -> StoreResult<Task> {
        self.tasks.create(draft)
    }

    pub fn edit_task(&mut self, id: TaskId, record: Task) -> StoreResult<()> {
        self.tasks.update(id, record)
    }

    pub fn remove_task(&mut self, id: TaskId) -> StoreResult<Task> {
        self.tasks.delete(id)
    }

    pub fn add_project(&mut self, name: &str) -> StoreResult<Project> {
        self.projects.create(name)
    }

    /// Project referenced by `task`, if it exists.
    pub fn project_for(&self, task: &Task) -> Option<&Project> {
        task.project.and_then(|id| self.projects.get(id))
    }

    /// Tasks whose project reference names no existing project.
    pub fn dangling_project_refs(&self) -> Vec<&Task> {
        self.tasks
            .list()
            .iter()
            .filter(|task| task.project.is_some() && self.project_for(task).is_none())
            .collect()
    }

    /// Waits for queued writes; a deferred failure marks both collections dirty.
    pub fn flush(&mut self) -> StoreResult<()> {
        if let Err(err) = self.tasks.adapter().flush() {
            warn!("event=service_flush module=service status=error error={err}");
            self.tasks.mark_dirty();
            self.projects.mark_dirty();
            return Err(err.into());
        }
        Ok(())
    }

    /// Re-sends every dirty collection snapshot.
    pub fn persist_all(&mut self) -> StoreResult<()> {
        if self.tasks.is_dirty() {
            self.tasks.persist()?;
        }
        if self.projects.is_dirty() {
            self.projects.persist()?;
        }
        Ok(())
    }

    pub fn is_dirty(&self) -> bool {
        self.tasks.is_dirty() || self.projects.is_dirty()
    }
}

/// Opens the SQLite store described by `config` and loads both collections.
///
/// # Side effects
/// - Creates `data_dir` and the database file when missing.
/// - Spawns the write-behind worker when `write_behind` is set.
pub fn open_service(config: &CoreConfig) -> ServiceResult<TodoService<LocalKv>> {
    config.validate()?;
    std::fs::create_dir_all(&config.data_dir).map_err(|err| {
        KvError::Backend(format!(
            "cannot create data directory `{}`: {err}",
            config.data_dir.display()
        ))
    })?;

    let sqlite = SqliteKvStore::open(config.db_path())?;
    let kv: LocalKv = if config.write_behind {
        Arc::new(WriteBehindKv::spawn(sqlite)?)
    } else {
        Arc::new(SyncSqlite(Mutex::new(sqlite)))
    };

    let service = TodoService::load(kv)?.with_default_priority(config.default_priority.clone());
    info!(
        "event=service_open module=service status=ok write_behind={} tasks={} projects={}",
        config.write_behind,
        service.tasks().len(),
        service.projects().len()
    );
    Ok(service)
}

/// Shares one SQLite connection behind a lock so it can sit in [`LocalKv`].
struct SyncSqlite(Mutex<SqliteKvStore>);

impl KvStore for SyncSqlite {
    fn load(&self, key: &str) -> KvResult<Option<String>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).load(key)
    }

    fn store(&self, key: &str, value: &str) -> KvResult<()> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .store(key, value)
    }
}
