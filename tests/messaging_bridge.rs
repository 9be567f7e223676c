//! Message envelopes round-tripped through JSON.

// Integration tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used)]

use promptrc::catalog::BuiltinCatalog;
use promptrc::messaging::{Action, BackgroundHandler, Request, Shortcut, handle_content_value};
use promptrc::services::{CustomPatternService, PatternIndex};
use promptrc::storage::{MemoryStore, PatternStore, StoreKey};
use promptrc::{AugmentSession, AugmentSettings, PageEvent};
use promptrc::host::{Document, InputType};
use serde_json::{Value, json};
use std::sync::Arc;

fn handler_with(store: Arc<dyn PatternStore>) -> BackgroundHandler {
    BackgroundHandler::new(BuiltinCatalog::load().unwrap(), CustomPatternService::new(store))
}

fn handler() -> BackgroundHandler {
    handler_with(Arc::new(MemoryStore::new()))
}

#[test]
fn test_get_patterns_returns_catalog_and_custom() {
    let handler = handler();
    let response = handler.handle_value(json!({"action": "getPatterns"}));
    assert_eq!(response["success"], json!(true));
    let builtin = response["patterns"].as_array().unwrap();
    assert_eq!(builtin.len(), handler.catalog().patterns().len());
    assert!(builtin.iter().all(|p| p["type"].is_string()));
    assert_eq!(response["customPatterns"], json!([]));
}

#[test]
fn test_save_then_list_then_delete() {
    let handler = handler();

    let saved = handler.handle_value(json!({
        "action": "saveCustomPattern",
        "pattern": {
            "trigger": "Answer in one sentence.",
            "purpose": "Brevity",
            "type": "RITUAL",
            "examples": ["", "Why is the sky blue?"]
        }
    }));
    assert_eq!(saved["success"], json!(true));
    let id = saved["pattern"]["id"].as_str().unwrap().to_string();
    assert!(id.starts_with("custom-"));
    assert_eq!(saved["pattern"]["examples"], json!(["Why is the sky blue?"]));

    let listed = handler.handle_value(json!({"action": "getPatterns"}));
    assert_eq!(listed["customPatterns"][0]["id"], json!(id));

    let deleted = handler.handle_value(json!({"action": "deleteCustomPattern", "patternId": id}));
    assert_eq!(deleted, json!({"success": true}));
    let listed = handler.handle_value(json!({"action": "getPatterns"}));
    assert_eq!(listed["customPatterns"], json!([]));
}

#[test]
fn test_save_upserts_by_id() {
    let handler = handler();
    for trigger in ["First.", "Second."] {
        let response = handler.handle_value(json!({
            "action": "saveCustomPattern",
            "pattern": {"id": "custom-1", "trigger": trigger, "purpose": "p"}
        }));
        assert_eq!(response["success"], json!(true));
    }
    let custom = handler.service().list().unwrap();
    assert_eq!(custom.len(), 1);
    assert_eq!(custom[0].trigger, "Second.");
}

#[test]
fn test_quota_error_is_reported_not_raised() {
    let store: Arc<dyn PatternStore> = Arc::new(MemoryStore::new().with_quota(64));
    let handler = handler_with(store);
    let response = handler.handle_value(json!({
        "action": "saveCustomPattern",
        "pattern": {"trigger": "x".repeat(200), "purpose": "too big"}
    }));
    assert_eq!(response["success"], json!(false));
    assert!(
        response["error"]
            .as_str()
            .unwrap()
            .starts_with("store unavailable")
    );
}

#[test]
fn test_malformed_envelopes() {
    let handler = handler();
    let cases: Vec<(Value, &str)> = vec![
        (json!({}), "invalid input: missing action"),
        (json!({"action": 7}), "invalid input: missing action"),
        (json!({"action": "explode"}), "invalid input: unknown action: explode"),
    ];
    for (envelope, expected) in cases {
        let response = handler.handle_value(envelope);
        assert_eq!(response["success"], json!(false));
        assert_eq!(response["error"], json!(expected));
    }

    let response = handler.handle_value(json!({"action": "deleteCustomPattern"}));
    assert_eq!(response["success"], json!(false));
}

#[test]
fn test_toggle_extension_shortcut_persists_and_forwards() {
    let store = Arc::new(MemoryStore::new());
    let dyn_store: Arc<dyn PatternStore> = store.clone();
    let handler = handler_with(dyn_store);

    let request = handler.on_shortcut(&Shortcut::from("toggle_extension")).unwrap().unwrap();
    assert_eq!(request.action(), Action::ToggleExtension);
    assert_eq!(
        serde_json::to_value(&request).unwrap(),
        json!({"action": "toggleExtension", "enabled": false})
    );
    let record = store.get(&[StoreKey::ExtensionEnabled]).unwrap();
    assert_eq!(record.extension_enabled, Some(false));
}

#[test]
fn test_forwarded_request_drives_the_page() {
    let handler = handler();
    let forwarded = handler.on_shortcut(&Shortcut::InsertPrompt).unwrap().unwrap();
    assert_eq!(forwarded, Request::ShowPromptPicker);

    let mut page = Document::new("chat.example.com");
    let field = page.add_input(InputType::Text);
    let index = PatternIndex::from_catalog(handler.catalog(), 16);
    let mut session = AugmentSession::attach(&mut page, index, AugmentSettings::default());
    let store = MemoryStore::new();
    for (ticket, keys) in page.take_reads() {
        let record = store.get(&keys).unwrap();
        session.handle(&mut page, PageEvent::StoreLoaded { ticket, record });
    }
    page.type_text(field, "draft");

    let response = handle_content_value(
        &mut session,
        &mut page,
        serde_json::to_value(&forwarded).unwrap(),
    );
    assert_eq!(response, json!({"success": true}));
    let menu = session.menu().visible().unwrap();
    assert_eq!(menu.anchor, field);
    assert_eq!(menu.items.len(), 8);

    let response = handle_content_value(
        &mut session,
        &mut page,
        json!({"action": "toggleSite", "disabled": true}),
    );
    assert_eq!(response, json!({"success": true}));
    assert!(!session.menu().is_visible());
}
