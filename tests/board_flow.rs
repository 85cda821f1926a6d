//! End-to-end flows through the store, the reconciler and the edit overlay.

use chrono::NaiveDate;
use std::collections::HashSet;
use std::io::Write;
use taskboard::{
    ids::SequentialIds,
    loader::{load_initial_data, DataSource},
    BoardStore, EditMode, DragDrop, DragDropReconciler, FormValues, List, Priority,
    Submission, Task, TaskEditController,
};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2022, 8, d).unwrap()
}

fn task(id: &str, priority: Priority) -> Task {
    Task::new(id, format!("task {id}"), day(1), priority)
}

fn board(lists: Vec<(&str, Vec<&str>)>) -> BoardStore {
    let mut store = BoardStore::new(SequentialIds::new("gen-"));
    store.set_lists(
        lists
            .into_iter()
            .map(|(id, tasks)| {
                List::new(id, tasks.into_iter().map(|t| task(t, Priority::Low)).collect())
            })
            .collect(),
    );
    store
}

fn ids(store: &BoardStore, list: &str) -> Vec<String> {
    store
        .list(list)
        .unwrap()
        .tasks
        .iter()
        .map(|t| t.id.clone())
        .collect()
}

fn form(description: &str, date: &str, priority: &str) -> FormValues {
    FormValues {
        description: description.into(),
        date: date.into(),
        priority: priority.into(),
    }
}

#[test]
fn create_appends_one_task_with_a_new_id() {
    let mut store = board(vec![("1", vec!["a", "b"]), ("2", vec!["c"])]);
    let mut editor = TaskEditController::with_clock("1", || day(9));
    let before: HashSet<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();

    editor.open_for_create();
    let outcome = editor.submit(&mut store, form("ship it", "2022-08-15", "moderate"));

    let (id, list_id) = match outcome {
        Submission::Created { id, list_id } => (id, list_id),
        other => panic!("expected a created task, got {other:?}"),
    };
    assert_eq!(list_id, "1");
    assert!(!id.is_empty());
    assert!(!before.contains(&id));
    assert_eq!(ids(&store, "1"), vec!["a", "b", id.as_str()]);
    assert_eq!(ids(&store, "2"), vec!["c"]);
}

#[test]
fn edit_changes_only_editable_fields_in_place() {
    let mut store = board(vec![("1", vec!["a", "b", "c"])]);
    let mut editor = TaskEditController::with_clock("1", || day(9));

    let original = store.task_for_edit("1", 1).unwrap();
    editor.open_for_edit(&original);
    let outcome = editor.submit(&mut store, form("reworded", "2022-08-20", "urgent"));

    assert_eq!(
        outcome,
        Submission::Updated {
            id: "b".into(),
            list_id: "1".into()
        }
    );
    assert_eq!(ids(&store, "1"), vec!["a", "b", "c"]);
    let edited = &store.list("1").unwrap().tasks[1];
    assert_eq!(edited.description, "reworded");
    assert_eq!(edited.date, day(20));
    assert_eq!(edited.priority, Priority::Urgent);
}

#[test]
fn update_scenario_keeps_order_and_neighbours() {
    let mut store = BoardStore::default();
    store.set_lists(vec![List::new(
        "L1",
        vec![task("a", Priority::Low), task("b", Priority::Urgent)],
    )]);
    let a_before = store.list("L1").unwrap().tasks[0].clone();

    store
        .update_task(&Task::new("b", "x", day(3), Priority::Moderate), "L1")
        .unwrap();

    let tasks = &store.list("L1").unwrap().tasks;
    assert_eq!(tasks[0], a_before);
    assert_eq!(tasks[1].id, "b");
    assert_eq!(tasks[1].description, "x");
    assert_eq!(tasks[1].date, day(3));
    assert_eq!(tasks[1].priority, Priority::Moderate);
}

#[test]
fn cross_list_drag_scenario() {
    let mut store = board(vec![("L1", vec!["a", "b", "c"]), ("L2", vec!["x", "y"])]);

    DragDropReconciler::new()
        .apply(&mut store, &DragDrop::new("L1", "L2", 0, 2))
        .unwrap();

    assert_eq!(ids(&store, "L1"), vec!["b", "c"]);
    assert_eq!(ids(&store, "L2"), vec!["x", "y", "a"]);
    assert_eq!(store.total_tasks(), 5);
}

#[test]
fn reorder_round_trip_restores_order() {
    let mut store = board(vec![("L1", vec!["a", "b", "c", "d", "e"])]);
    let reconciler = DragDropReconciler::new();

    let moved = reconciler
        .apply(&mut store, &DragDrop::within("L1", 1, 3))
        .unwrap();
    assert_eq!(ids(&store, "L1"), vec!["a", "c", "d", "b", "e"]);

    reconciler
        .apply(&mut store, &DragDrop::within("L1", moved.index, 1))
        .unwrap();
    assert_eq!(ids(&store, "L1"), vec!["a", "b", "c", "d", "e"]);
}

#[test]
fn moved_task_can_be_edited_in_its_new_list() {
    let mut store = board(vec![("L1", vec!["a"]), ("L2", vec![])]);
    let mut editor = TaskEditController::with_clock("L1", || day(1));

    let moved = DragDropReconciler::new()
        .apply(&mut store, &DragDrop::new("L1", "L2", 0, 0))
        .unwrap();
    let task = store.task_for_edit(&moved.list_id, moved.index).unwrap();
    editor.open_for_edit(&task);

    assert!(editor
        .submit(&mut store, form("after move", "", "low"))
        .is_accepted());
    assert_eq!(store.list("L2").unwrap().tasks[0].description, "after move");
}

#[test]
fn removing_unknown_task_changes_nothing() {
    let mut store = board(vec![("L1", vec!["a", "b"])]);
    let list = store.list("L1").unwrap().clone();

    assert!(store.remove_task("zz", &list).is_err());
    assert_eq!(ids(&store, "L1"), vec!["a", "b"]);

    store.remove_task("a", &list).unwrap();
    assert_eq!(ids(&store, "L1"), vec!["b"]);
}

#[test]
fn close_on_closed_controller_is_a_no_op() {
    let mut editor = TaskEditController::new("1");
    editor.close();
    assert!(!editor.is_overlay_open());
    assert!(editor.draft().is_none());
    assert!(editor.current_list_id().is_none());
}

#[tokio::test]
async fn loaded_task_without_id_is_edited_in_place() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{ "list": [ {{ "id": "1", "tasks": [
            {{ "description": "legacy", "date": "2022-08-01", "priority": "low" }}
        ] }} ] }}"#
    )
    .unwrap();

    let mut store = BoardStore::new(SequentialIds::new("gen-"));
    assert!(load_initial_data(&mut store, &DataSource::File(file.path().to_path_buf())).await);
    assert_eq!(ids(&store, "1"), vec!["gen-1"]);

    let mut editor = TaskEditController::with_clock("1", || day(9));
    let task = store.task_for_edit("1", 0).unwrap();
    editor.open_for_edit(&task);
    assert_eq!(editor.mode(), Some(EditMode::Edit));

    let outcome = editor.submit(&mut store, form("renamed", "", "low"));
    assert_eq!(
        outcome,
        Submission::Updated {
            id: "gen-1".into(),
            list_id: "1".into()
        }
    );
    assert_eq!(ids(&store, "1"), vec!["gen-1"]);
    assert_eq!(store.list("1").unwrap().tasks[0].description, "renamed");
}
