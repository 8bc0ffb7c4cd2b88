//! Case-insensitive substring search over task fields.

use crate::model::task::Task;

/// Whether `query` occurs in the title, description, any tag, or priority.
///
/// Comparison lowercases both sides. An empty query matches every task.
pub fn matches_text(task: &Task, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    let hit = |field: &str| field.to_lowercase().contains(&needle);

    hit(&task.title)
        || hit(&task.desc)
        || task.tags.iter().any(|tag| hit(tag))
        || hit(&task.priority)
}

#[cfg(test)]
mod tests {
    use super::matches_text;
    use crate::model::task::Task;

    fn sample() -> Task {
        Task {
            id: 1,
            title: "Quarterly Report".to_string(),
            desc: "send to finance".to_string(),
            tags: vec!["Work".to_string(), "q3".to_string()],
            priority: "Urgent".to_string(),
            date: "2024-07-01".to_string(),
            project: None,
        }
    }

    #[test]
    fn each_field_is_searched() {
        let task = sample();
        assert!(matches_text(&task, "report"));
        assert!(matches_text(&task, "FINANCE"));
        assert!(matches_text(&task, "work"));
        assert!(matches_text(&task, "urg"));
    }

    #[test]
    fn date_and_project_are_not_searched() {
        let task = sample();
        assert!(!matches_text(&task, "2024"));
        assert!(!matches_text(&task, "groceries"));
    }

    #[test]
    fn empty_query_matches() {
        assert!(matches_text(&sample(), ""));
    }
}
