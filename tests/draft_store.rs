//! Integration tests for drafts persisted through the on-disk store.

use std::fs;
use std::sync::Arc;

use serde_json::json;
use tempfile::TempDir;

use spedit::drafts::{DraftEntry, DraftKey, DraftService};
use spedit::storage::{FileKvStore, KvStore};

fn service(dir: &TempDir) -> (Arc<FileKvStore>, DraftService) {
    let store = Arc::new(FileKvStore::new(dir.path().join("store")));
    let drafts = DraftService::new(store.clone());
    (store, drafts)
}

#[test]
fn save_then_load() {
    let dir = TempDir::new().unwrap();
    let (_, drafts) = service(&dir);
    let key = DraftKey::from("rebuild");
    let base = json!({"id": "rebuild", "playlists": []});
    let modified = json!({"id": "rebuild", "playlists": [{"id": "main"}]});

    let saved_at = drafts.save_draft(&key, &base, &modified).unwrap();
    let entry = drafts.load_draft(&key).unwrap();

    assert_eq!(entry.base, base);
    assert_eq!(entry.modified, modified);
    assert_eq!(
        entry.saved_at.timestamp_millis(),
        saved_at.timestamp_millis()
    );
    assert!(drafts.has_draft(&key));
}

#[test]
fn missing_draft_is_absent() {
    let dir = TempDir::new().unwrap();
    let (_, drafts) = service(&dir);
    let key = DraftKey::from("nothing");

    assert!(drafts.load_draft(&key).is_none());
    assert!(!drafts.has_draft(&key));
    drafts.clear_draft(&key).unwrap();
}

#[test]
fn drafts_survive_a_new_store_instance() {
    let dir = TempDir::new().unwrap();
    {
        let (_, drafts) = service(&dir);
        drafts
            .save_draft(&DraftKey::from("p1"), &json!({}), &json!({"v": 1}))
            .unwrap();
    }

    let (_, drafts) = service(&dir);
    let entry = drafts.load_draft(&DraftKey::from("p1")).unwrap();
    assert_eq!(entry.modified, json!({"v": 1}));
}

#[test]
fn later_save_overwrites() {
    let dir = TempDir::new().unwrap();
    let (_, drafts) = service(&dir);
    let key = DraftKey::from("p1");

    drafts.save_draft(&key, &json!({}), &json!({"v": 1})).unwrap();
    drafts.save_draft(&key, &json!({}), &json!({"v": 2})).unwrap();

    assert_eq!(drafts.load_draft(&key).unwrap().modified, json!({"v": 2}));
    assert_eq!(drafts.list_drafts().unwrap().len(), 1);
}

#[test]
fn new_entity_uses_sentinel_key() {
    let dir = TempDir::new().unwrap();
    let (store, drafts) = service(&dir);

    drafts
        .save_draft(&DraftKey::New, &json!({}), &json!({"id": "fresh"}))
        .unwrap();

    assert!(store.get("autosave:__new__").unwrap().is_some());
    assert_eq!(
        drafts.load_draft(&DraftKey::from(None::<&str>)).unwrap().modified,
        json!({"id": "fresh"})
    );
}

#[test]
fn corrupted_value_reads_as_absent() {
    let dir = TempDir::new().unwrap();
    let (store, drafts) = service(&dir);
    let key = DraftKey::from("p1");

    store.set(&key.storage_key(), "{not json").unwrap();

    assert!(drafts.load_draft(&key).is_none());
    // Raw presence is still reported.
    assert!(drafts.has_draft(&key));
}

#[test]
fn bad_timestamp_reads_as_absent() {
    let dir = TempDir::new().unwrap();
    let (store, drafts) = service(&dir);
    let key = DraftKey::from("p1");

    store
        .set(
            &key.storage_key(),
            r#"{"base": {}, "modified": {}, "savedAt": "yesterday"}"#,
        )
        .unwrap();

    assert!(drafts.load_draft(&key).is_none());
}

#[test]
fn garbage_store_file_reads_as_absent() {
    let dir = TempDir::new().unwrap();
    let (store, drafts) = service(&dir);
    let key = DraftKey::from("p1");
    drafts.save_draft(&key, &json!({}), &json!({})).unwrap();

    fs::write(store.entry_path(&key.storage_key()), "\u{0}\u{1}garbage").unwrap();

    assert!(drafts.load_draft(&key).is_none());
    assert!(drafts.list_drafts().unwrap().is_empty());
}

#[test]
fn list_skips_corrupted_and_foreign_keys() {
    let dir = TempDir::new().unwrap();
    let (store, drafts) = service(&dir);

    drafts.save_draft(&DraftKey::from("b"), &json!({}), &json!({})).unwrap();
    drafts.save_draft(&DraftKey::from("a"), &json!({}), &json!({})).unwrap();
    store.set("autosave:broken", "[]").unwrap();
    store.set("auth:token", "secret").unwrap();

    let listed: Vec<DraftKey> = drafts
        .list_drafts()
        .unwrap()
        .into_iter()
        .map(|(key, _)| key)
        .collect();

    assert_eq!(listed, vec![DraftKey::from("a"), DraftKey::from("b")]);
}

#[test]
fn stored_format_uses_camel_case_and_millis() {
    let dir = TempDir::new().unwrap();
    let (store, drafts) = service(&dir);
    let key = DraftKey::from("p1");
    drafts.save_draft(&key, &json!({"a": 1}), &json!({"a": 2})).unwrap();

    let raw = store.get(&key.storage_key()).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let saved_at = value["savedAt"].as_str().unwrap();

    assert!(saved_at.ends_with('Z'));
    assert_eq!(saved_at.len(), "2026-10-16T09:30:00.000Z".len());
    assert!(DraftEntry::parse(&raw).is_some());
}

#[test]
fn clear_removes_the_draft() {
    let dir = TempDir::new().unwrap();
    let (_, drafts) = service(&dir);
    let key = DraftKey::from("p1");
    drafts.save_draft(&key, &json!({}), &json!({})).unwrap();

    drafts.clear_draft(&key).unwrap();

    assert!(drafts.load_draft(&key).is_none());
    assert!(!drafts.has_draft(&key));
}
