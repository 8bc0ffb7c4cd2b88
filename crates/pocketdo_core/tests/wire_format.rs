use pocketdo_core::{
    KvStore, MemoryKvStore, NewTask, ProjectStore, TaskStore, PROJECTS_KEY, TASKS_KEY,
};
use serde_json::{json, Value};

#[test]
fn persisted_blobs_use_the_documented_field_names() {
    let kv = MemoryKvStore::new();
    let mut tasks = TaskStore::load(&kv).unwrap();
    let mut projects = ProjectStore::load(&kv).unwrap();

    let project = projects.create("Garden").unwrap();
    let mut draft = NewTask::new("plant roses");
    draft.desc = "by the fence".to_string();
    draft.tags = "outdoor, spring".to_string();
    draft.priority = "High".to_string();
    draft.date = "2024-04-01".to_string();
    let task = tasks.create(&draft).unwrap();

    let stored_tasks: Value =
        serde_json::from_str(&kv.load(TASKS_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(
        stored_tasks,
        json!([{
            "id": task.id,
            "title": "plant roses",
            "desc": "by the fence",
            "tags": ["outdoor", "spring"],
            "priority": "High",
            "date": "2024-04-01",
            "project": null
        }])
    );

    let stored_projects: Value =
        serde_json::from_str(&kv.load(PROJECTS_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(stored_projects, json!([{ "id": project.id, "name": "Garden" }]));
}
