//! Task domain model.
//!
//! # Responsibility
//! - Define the persisted task record and its JSON wire shape.
//! - Turn raw form input into a normalized record at creation time.
//!
//! # Invariants
//! - `id` is stable and never reused within the task collection.
//! - `tags` created through [`Task::from_draft`] are trimmed and non-empty.
//! - `project` is a loose reference; it is not checked against projects.

use super::project::ProjectId;
use super::validation::ValidationError;
use chrono::Local;
use serde::{Deserialize, Serialize};

/// Stable task identifier (epoch-millisecond derived).
pub type TaskId = i64;

/// Priority assigned to drafts that do not choose one.
pub const DEFAULT_PRIORITY: &str = "Medium";

/// Storage format of [`Task::date`].
pub const TASK_DATE_FORMAT: &str = "%Y-%m-%d";

/// Canonical persisted to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    /// Free-form description, may be empty.
    pub desc: String,
    pub tags: Vec<String>,
    /// Free text label; no fixed set is enforced.
    pub priority: String,
    /// Calendar date as `YYYY-MM-DD` text. Not validated on write.
    pub date: String,
    /// Serialized as `null` when absent; a missing field also decodes as absent.
    #[serde(default)]
    pub project: Option<ProjectId>,
}

impl Task {
    /// Builds a new record from form input under a freshly issued id.
    ///
    /// # Errors
    /// - [`ValidationError::EmptyTitle`] when the title trims to empty.
    pub fn from_draft(id: TaskId, draft: &NewTask) -> Result<Self, ValidationError> {
        if draft.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }

        Ok(Self {
            id,
            title: draft.title.clone(),
            desc: draft.desc.clone(),
            tags: parse_tags(&draft.tags),
            priority: draft.priority.clone(),
            date: draft.date.clone(),
            project: draft.project,
        })
    }

    /// Comma-joined tags, the shape the edit form shows.
    pub fn tags_input(&self) -> String {
        self.tags.join(",")
    }
}

/// Raw create-form input.
///
/// `tags` is the comma separated text as typed; it is normalized by
/// [`parse_tags`] when the task is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub desc: String,
    pub tags: String,
    pub priority: String,
    pub date: String,
    pub project: Option<ProjectId>,
}

impl NewTask {
    /// Creates a draft with form defaults: medium priority, dated today.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            desc: String::new(),
            tags: String::new(),
            priority: DEFAULT_PRIORITY.to_string(),
            date: today_string(),
            project: None,
        }
    }
}

/// Splits comma separated tag input, trimming entries and dropping empties.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Current local date in [`TASK_DATE_FORMAT`].
pub fn today_string() -> String {
    Local::now().date_naive().format(TASK_DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::{parse_tags, NewTask, Task, DEFAULT_PRIORITY};
    use crate::model::validation::ValidationError;

    #[test]
    fn parse_tags_trims_and_drops_empty_entries() {
        assert_eq!(
            parse_tags(" grocery, ,dairy ,, "),
            vec!["grocery".to_string(), "dairy".to_string()]
        );
        assert!(parse_tags("").is_empty());
    }

    #[test]
    fn draft_defaults_match_create_form() {
        let draft = NewTask::new("water plants");
        assert_eq!(draft.priority, DEFAULT_PRIORITY);
        assert_eq!(draft.date.len(), 10);
        assert_eq!(draft.project, None);
    }

    #[test]
    fn from_draft_rejects_blank_title() {
        let draft = NewTask::new("   ");
        let err = Task::from_draft(1, &draft).expect_err("blank title must be rejected");
        assert_eq!(err, ValidationError::EmptyTitle);
    }

    #[test]
    fn tags_input_joins_with_commas() {
        let mut draft = NewTask::new("pack");
        draft.tags = "trip, bags".to_string();
        let task = Task::from_draft(3, &draft).expect("draft should be valid");
        assert_eq!(task.tags_input(), "trip,bags");
    }
}
