use std::rc::Rc;

use futures::executor::block_on;

use todana::{
    ApiTransport, ClientConfig, EditError, Editor, ManualScheduler, Method, Scheduler,
    ScriptedTransport, Severity, SyncFailurePolicy,
};
use todana_core::CabinetEntry;

fn cabinet(name: &str) -> CabinetEntry {
    CabinetEntry {
        name: name.to_string(),
        ..CabinetEntry::default()
    }
}

fn editor_with(policy: SyncFailurePolicy) -> (Editor, Rc<ScriptedTransport>) {
    let transport = ScriptedTransport::new();
    let config = ClientConfig {
        sync_failure: policy,
        ..ClientConfig::default()
    };
    let editor = Editor::new(
        Rc::clone(&transport) as Rc<dyn ApiTransport>,
        Rc::new(ManualScheduler::new()) as Rc<dyn Scheduler>,
        config,
    );
    (editor, transport)
}

/// Session creation plus the initial whole-project persist.
fn boot(editor: &Editor, transport: &ScriptedTransport) {
    transport.push_ok(r#"{"id":"sess-1"}"#);
    transport.push_response(204, "No Content", "");
    block_on(editor.create_project("shop")).unwrap();
    assert!(!editor.store().dirty().get());
}

#[test]
fn keep_local_policy_keeps_the_optimistic_edit_and_toasts() {
    let (editor, transport) = editor_with(SyncFailurePolicy::KeepLocal);
    boot(&editor, &transport);

    transport.push_response(500, "Internal Server Error", r#"{"error":"disk full"}"#);
    let err = block_on(editor.add_cabinet(cabinet("base"))).unwrap_err();
    assert!(matches!(err, EditError::Client(_)));

    assert_eq!(editor.store().cabinet_count().get(), 1);
    assert!(editor.store().dirty().get());
    assert!(editor.history().can_undo().get());

    let toasts = editor.toasts().toasts().get();
    assert_eq!(toasts.len(), 1);
    assert!(toasts[0].message.contains("disk full"));
    assert_eq!(toasts[0].severity, Severity::Error);
}

#[test]
fn rollback_policy_reverts_to_the_pre_edit_snapshot() {
    let (editor, transport) = editor_with(SyncFailurePolicy::Rollback);
    boot(&editor, &transport);

    transport.push_response(500, "Internal Server Error", r#"{"error":"disk full"}"#);
    assert!(block_on(editor.add_cabinet(cabinet("base"))).is_err());

    assert_eq!(editor.store().cabinet_count().get(), 0);
    // The checkpoint was consumed by the rollback, not left as undo history.
    assert!(!editor.history().can_undo().get());
    assert_eq!(editor.toasts().toasts().get().len(), 1);
}

#[test]
fn successful_edits_persist_the_whole_document_and_mark_clean() {
    let (editor, transport) = editor_with(SyncFailurePolicy::KeepLocal);
    boot(&editor, &transport);

    transport.push_response(204, "No Content", "");
    block_on(editor.add_cabinet(cabinet("base"))).unwrap();

    assert_eq!(editor.store().cabinet_count().get(), 1);
    assert!(!editor.store().dirty().get());

    let requests = transport.requests();
    let put = requests.last().unwrap();
    assert_eq!(put.method, Method::Put);
    assert_eq!(put.url, "/api/sessions/sess-1/project");
    let body: serde_json::Value = serde_json::from_str(put.body.as_deref().unwrap()).unwrap();
    assert_eq!(body["cabinets"].as_array().unwrap().len(), 1);
}

#[test]
fn cabinet_index_is_checked_before_anything_happens() {
    let (editor, transport) = editor_with(SyncFailurePolicy::KeepLocal);
    boot(&editor, &transport);
    let requests_before = transport.request_count();

    let err = block_on(editor.update_cabinet(3, cabinet("nope"))).unwrap_err();
    assert_eq!(err, EditError::CabinetIndexOutOfRange(3));
    assert_eq!(transport.request_count(), requests_before);
    assert!(!editor.history().can_undo().get());
}

#[test]
fn update_cabinet_persists_only_that_entry() {
    let (editor, transport) = editor_with(SyncFailurePolicy::KeepLocal);
    boot(&editor, &transport);

    transport.push_response(204, "No Content", "");
    block_on(editor.add_cabinet(cabinet("base"))).unwrap();

    transport.push_response(204, "No Content", "");
    let mut wider = cabinet("base");
    wider.width_mm = 900.0;
    block_on(editor.update_cabinet(0, wider)).unwrap();

    let put = transport.requests().last().unwrap().clone();
    assert_eq!(put.url, "/api/sessions/sess-1/cabinets/0");
    assert!(!editor.store().dirty().get());
}

#[test]
fn drafts_stay_local_until_committed() {
    let (editor, transport) = editor_with(SyncFailurePolicy::KeepLocal);
    boot(&editor, &transport);
    let requests_before = transport.request_count();

    editor.begin_cabinet(cabinet("draft")).unwrap();
    assert_eq!(editor.store().cabinet_count().get(), 1);
    assert_eq!(transport.request_count(), requests_before);
    assert!(editor.store().dirty().get());

    transport.push_response(204, "No Content", "");
    block_on(editor.commit_draft()).unwrap();

    let project = editor.store().current().unwrap();
    assert!(project.in_progress.is_none());
    assert_eq!(project.cabinets.len(), 1);
    assert_eq!(transport.request_count(), requests_before + 1);
    assert!(!editor.store().dirty().get());
}

#[test]
fn undo_restores_and_resyncs_the_document() {
    let (editor, transport) = editor_with(SyncFailurePolicy::KeepLocal);
    boot(&editor, &transport);

    transport.push_response(204, "No Content", "");
    block_on(editor.add_cabinet(cabinet("base"))).unwrap();

    transport.push_response(204, "No Content", "");
    assert!(block_on(editor.undo()).unwrap());
    assert_eq!(editor.store().cabinet_count().get(), 0);
    assert!(!editor.store().dirty().get());

    let put = transport.requests().last().unwrap().clone();
    assert_eq!(put.url, "/api/sessions/sess-1/project");
    let body: serde_json::Value = serde_json::from_str(put.body.as_deref().unwrap()).unwrap();
    assert!(body["cabinets"].as_array().unwrap().is_empty());

    transport.push_response(204, "No Content", "");
    assert!(block_on(editor.redo()).unwrap());
    assert_eq!(editor.store().cabinet_count().get(), 1);

    assert!(!editor.history().can_redo().get());
}

#[test]
fn undo_with_no_history_reports_false_without_network_traffic() {
    let (editor, transport) = editor_with(SyncFailurePolicy::KeepLocal);
    boot(&editor, &transport);
    let requests_before = transport.request_count();

    assert!(!block_on(editor.undo()).unwrap());
    assert!(!block_on(editor.redo()).unwrap());
    assert_eq!(transport.request_count(), requests_before);
}
