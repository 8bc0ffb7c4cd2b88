//! Create/update validation failures shared by both collections.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Rejection of a mutation before it touches the collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Task title is empty after trimming.
    EmptyTitle,
    /// Project name is empty after trimming.
    EmptyProjectName,
    /// Replacement record carries a different id than the one addressed.
    IdMismatch { expected: i64, actual: i64 },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "task title must not be empty"),
            Self::EmptyProjectName => write!(f, "project name must not be empty"),
            Self::IdMismatch { expected, actual } => write!(
                f,
                "replacement record id {actual} does not match addressed id {expected}"
            ),
        }
    }
}

impl Error for ValidationError {}
