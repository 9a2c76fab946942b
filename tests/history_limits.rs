use todana::{History, ProjectStore, HISTORY_LIMIT};
use todana_core::Project;

fn loaded_store(name: &str) -> ProjectStore {
    let store = ProjectStore::new();
    let mut project = Project::new(name);
    project.refresh_derived();
    store.load(project);
    store
}

fn rename(store: &ProjectStore, name: &str) {
    let name = name.to_string();
    store.mutate(move |project| project.name = name);
}

#[test]
fn undo_stack_is_bounded_and_evicts_the_oldest() {
    let store = loaded_store("v0");
    let history = History::new();

    for i in 1..=(HISTORY_LIMIT + 1) {
        history.push_snapshot(&store);
        rename(&store, &format!("v{i}"));
    }
    assert_eq!(history.undo_depth(), HISTORY_LIMIT);

    // Newest snapshot is last: one undo steps back a single edit.
    assert!(history.undo(&store));
    assert_eq!(store.current().unwrap().name, format!("v{HISTORY_LIMIT}"));

    // Draining the stack lands on v1; the original v0 was evicted.
    for _ in 0..(HISTORY_LIMIT - 1) {
        assert!(history.undo(&store));
    }
    assert_eq!(store.current().unwrap().name, "v1");
    assert!(!history.undo(&store));
    assert_eq!(store.current().unwrap().name, "v1");
}

#[test]
fn push_snapshot_always_clears_the_redo_stack() {
    let store = loaded_store("v0");
    let history = History::new();

    history.push_snapshot(&store);
    rename(&store, "v1");
    assert!(history.undo(&store));
    assert_eq!(history.redo_depth(), 1);
    assert!(history.can_redo().get());

    history.push_snapshot(&store);
    assert_eq!(history.redo_depth(), 0);
    assert!(!history.can_redo().get());
}

#[test]
fn push_snapshot_without_a_project_changes_nothing() {
    let store = ProjectStore::new();
    let history = History::new();

    history.push_snapshot(&store);

    assert_eq!(history.undo_depth(), 0);
    assert_eq!(history.redo_depth(), 0);
    assert!(!history.can_undo().get());
    assert!(!history.can_redo().get());
}

#[test]
fn can_flags_track_stack_contents_through_every_transition() {
    let store = loaded_store("v0");
    let history = History::new();
    assert!(!history.can_undo().get());
    assert!(!history.can_redo().get());

    history.push_snapshot(&store);
    rename(&store, "v1");
    assert!(history.can_undo().get());
    assert!(!history.can_redo().get());

    history.undo(&store);
    assert!(!history.can_undo().get());
    assert!(history.can_redo().get());

    history.redo(&store);
    assert!(history.can_undo().get());
    assert!(!history.can_redo().get());
}

#[test]
fn undo_then_redo_restores_both_documents() {
    let store = loaded_store("before");
    let history = History::new();

    history.push_snapshot(&store);
    rename(&store, "after");

    assert!(history.undo(&store));
    assert_eq!(store.current().unwrap().name, "before");

    assert!(history.redo(&store));
    assert_eq!(store.current().unwrap().name, "after");
}

#[test]
fn undo_with_an_empty_stack_is_a_noop() {
    let store = loaded_store("kept");
    let history = History::new();

    assert!(!history.undo(&store));
    assert!(!history.redo(&store));
    assert_eq!(store.current().unwrap().name, "kept");
}
