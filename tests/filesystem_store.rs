//! Filesystem store shared between the CLI and simulated pages.

// Integration tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used)]

use promptrc::cli::{self, CliContext, OutputFormat, SurfaceChoice};
use promptrc::config::PromptrcConfig;
use promptrc::models::PatternDraft;
use promptrc::storage::{FilesystemStore, PatternStore, StoreKey};
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;

fn context(dir: &TempDir) -> CliContext {
    let config = PromptrcConfig::default().with_store_path(dir.path().join("store.json"));
    CliContext::open(config).unwrap()
}

#[test]
fn test_custom_patterns_persist_across_invocations() {
    let dir = TempDir::new().unwrap();

    let first = context(&dir);
    cli::cmd_custom_add(
        &first,
        PatternDraft {
            id: Some("custom-terse".to_string()),
            trigger: "Answer like a zyzzyva.".to_string(),
            purpose: "Brevity".to_string(),
            ..PatternDraft::default()
        },
    )
    .unwrap();

    let second = context(&dir);
    let listing = cli::cmd_custom_list(&second, OutputFormat::Json).unwrap();
    let patterns: Value = serde_json::from_str(&listing).unwrap();
    assert_eq!(patterns[0]["id"], "custom-terse");

    let found = cli::cmd_search(&second, "ZYZZYVA", None, OutputFormat::Json).unwrap();
    let found: Value = serde_json::from_str(&found).unwrap();
    assert_eq!(found.as_array().unwrap().len(), 1);
}

#[test]
fn test_store_file_uses_extension_key_names() {
    let dir = TempDir::new().unwrap();
    let ctx = context(&dir);
    cli::cmd_toggle_extension(&ctx, false).unwrap();
    cli::cmd_toggle_site(&ctx, "Chat.Example.com", true).unwrap();

    let raw = std::fs::read_to_string(dir.path().join("store.json")).unwrap();
    let json: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["extensionEnabled"], Value::Bool(false));
    assert_eq!(json["disabledSites"][0], "chat.example.com");
}

#[test]
fn test_second_store_instance_sees_writes() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("store.json");
    let writer = FilesystemStore::new(&path).unwrap();
    let reader = FilesystemStore::new(&path).unwrap();

    let ctx = CliContext::with_store(PromptrcConfig::default(), Arc::new(writer)).unwrap();
    cli::cmd_toggle_extension(&ctx, false).unwrap();

    let record = reader.get(&[StoreKey::ExtensionEnabled]).unwrap();
    assert_eq!(record.extension_enabled, Some(false));
    assert!(reader.get(&[StoreKey::CustomPatterns]).unwrap().custom_patterns.is_none());
}

#[test]
fn test_simulation_honours_persisted_toggles() {
    let dir = TempDir::new().unwrap();
    let ctx = context(&dir);
    let steps = cli::parse_steps("/").unwrap();

    let report = cli::cmd_simulate(&ctx, "chat.example.com", SurfaceChoice::Input, &steps).unwrap();
    assert!(report.menu.is_some());

    cli::cmd_toggle_site(&ctx, "chat.example.com", true).unwrap();
    let report = cli::cmd_simulate(&ctx, "chat.example.com", SurfaceChoice::Input, &steps).unwrap();
    assert!(report.menu.is_none());

    let report = cli::cmd_simulate(&ctx, "other.example.com", SurfaceChoice::Input, &steps).unwrap();
    assert!(report.menu.is_some());
}
