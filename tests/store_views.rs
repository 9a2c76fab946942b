use std::cell::RefCell;
use std::rc::Rc;

use todana::ProjectStore;
use todana_core::{CabinetEntry, Project};

fn cabinet(name: &str) -> CabinetEntry {
    CabinetEntry {
        name: name.to_string(),
        ..CabinetEntry::default()
    }
}

fn loaded(cabinets: Vec<CabinetEntry>) -> ProjectStore {
    let store = ProjectStore::new();
    let mut project = Project::new("shop");
    project.cabinets = cabinets;
    project.refresh_derived();
    store.load(project);
    store
}

#[test]
fn cabinet_count_adds_one_for_an_in_progress_draft() {
    let empty = ProjectStore::new();
    assert_eq!(empty.cabinet_count().get(), 0);

    let store = loaded(vec![cabinet("a"), cabinet("b")]);
    assert_eq!(store.cabinet_count().get(), 2);

    store.mutate(|project| project.in_progress = Some(cabinet("draft")));
    assert_eq!(store.cabinet_count().get(), 3);

    store.mutate(|project| project.in_progress = None);
    assert_eq!(store.cabinet_count().get(), 2);

    store.clear();
    assert_eq!(store.cabinet_count().get(), 0);
    assert!(!store.dirty().get());
}

#[test]
fn part_count_follows_the_cabinet_sequence() {
    let store = loaded(vec![cabinet("a")]);
    // 2 sides + top + bottom + shelf + back + door
    assert_eq!(store.part_count().get(), 7);

    store.mutate(|project| project.cabinets.push(cabinet("b")));
    assert_eq!(store.part_count().get(), 14);
}

#[test]
fn dirty_tracks_divergence_from_the_confirmed_revision() {
    let store = ProjectStore::new();
    assert!(!store.dirty().get());

    // A freshly loaded document has never been confirmed by the server.
    let store = loaded(vec![cabinet("a")]);
    assert!(store.dirty().get());

    let revision = store.current().unwrap().revision;
    store.mark_persisted(revision);
    assert!(!store.dirty().get());

    store.mutate(|project| project.cabinets.push(cabinet("b")));
    assert!(store.dirty().get());

    let revision = store.current().unwrap().revision;
    store.mark_persisted(revision);
    assert!(!store.dirty().get());
}

#[test]
fn stale_confirmation_after_newer_edits_stays_dirty() {
    let store = loaded(vec![cabinet("a")]);
    let sent = store.current().unwrap().revision;

    // An edit lands while the persist request is still in flight.
    store.mutate(|project| project.cabinets.push(cabinet("b")));
    store.mark_persisted(sent);

    assert!(store.dirty().get());
}

#[test]
fn validation_errors_view_reflects_the_report() {
    let store = loaded(vec![cabinet("ok")]);
    assert!(!store.has_validation_errors().get());

    store.mutate(|project| project.cabinets[0].width_mm = 30.0);
    assert!(store.has_validation_errors().get());

    store.mutate(|project| project.cabinets[0].width_mm = 600.0);
    assert!(!store.has_validation_errors().get());
}

#[test]
fn derived_views_notify_subscribers_synchronously() {
    let store = loaded(vec![cabinet("a")]);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let _sub = store
        .cabinet_count()
        .subscribe(move |count| sink.borrow_mut().push(*count));

    store.mutate(|project| project.cabinets.push(cabinet("b")));
    store.mutate(|project| {
        project.cabinets.clear();
    });

    assert_eq!(*seen.borrow(), vec![1, 2, 0]);
}
