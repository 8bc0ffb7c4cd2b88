//! Core domain logic for PocketDo.
//! This crate is the single source of truth for task and project invariants.

pub mod config;
pub mod db;
pub mod kv;
pub mod logging;
pub mod model;
pub mod query;
pub mod service;
pub mod store;

pub use config::{ConfigError, ConfigResult, CoreConfig};
pub use kv::{
    KvError, KvResult, KvStore, MemoryKvStore, SqliteKvStore, WriteBehindKv, PROJECTS_KEY,
    TASKS_KEY,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::project::{Project, ProjectId};
pub use model::task::{parse_tags, NewTask, Task, TaskId, DEFAULT_PRIORITY, TASK_DATE_FORMAT};
pub use model::validation::ValidationError;
pub use query::{apply, DateWindow, TaskFilter};
pub use service::todo_service::{open_service, LocalKv, ServiceError, ServiceResult, TodoService};
pub use store::project_store::ProjectStore;
pub use store::task_store::TaskStore;
pub use store::{StoreError, StoreResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
