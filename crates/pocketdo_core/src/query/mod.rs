//! Derived views over a task collection snapshot.
//!
//! # Responsibility
//! - Decide date-window membership relative to the current local date.
//! - Match free-text queries against task fields.
//!
//! # Invariants
//! - Every function here is pure; inputs are never mutated.
//! - Result order follows the input collection order.

pub mod search;
pub mod window;

pub use search::matches_text;
pub use window::{is_this_month, is_this_week, is_today, local_today, parse_task_date, DateWindow};

use crate::model::task::Task;
use chrono::NaiveDate;

/// Combined search + window filter for one view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Case-insensitive substring; empty matches everything.
    pub text: String,
    pub window: DateWindow,
}

impl TaskFilter {
    pub fn new(text: impl Into<String>, window: DateWindow) -> Self {
        Self {
            text: text.into(),
            window,
        }
    }

    /// Whether `task` passes both the text and window predicates.
    pub fn matches(&self, task: &Task, today: NaiveDate) -> bool {
        matches_text(task, &self.text) && self.window.contains_on(&task.date, today)
    }

    /// Filters `tasks` as of `today`.
    pub fn apply_on<'a>(&self, tasks: &'a [Task], today: NaiveDate) -> Vec<&'a Task> {
        tasks
            .iter()
            .filter(|task| matches_text(task, &self.text))
            .filter(|task| self.window.contains_on(&task.date, today))
            .collect()
    }

    /// Filters `tasks` as of the current local date.
    pub fn apply<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        self.apply_on(tasks, local_today())
    }
}

/// Text search narrowed by a date window, evaluated now.
pub fn apply<'a>(tasks: &'a [Task], query: &str, window: DateWindow) -> Vec<&'a Task> {
    TaskFilter::new(query, window).apply(tasks)
}
