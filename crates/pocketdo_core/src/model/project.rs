//! Project domain model.
//!
//! # Invariants
//! - `name` is non-empty after trimming at creation time.
//! - Projects are never updated or deleted once created.

use super::validation::ValidationError;
use serde::{Deserialize, Serialize};

/// Stable project identifier (epoch-millisecond derived).
pub type ProjectId = i64;

/// Named grouping that tasks may reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
}

impl Project {
    /// Builds a project after checking the name is not blank.
    ///
    /// The name is stored as typed; only emptiness is judged on the trimmed
    /// value.
    pub fn new(id: ProjectId, name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyProjectName);
        }
        Ok(Self { id, name })
    }
}
