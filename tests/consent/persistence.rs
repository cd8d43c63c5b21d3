use std::sync::Arc;

use tempfile::TempDir;

use siteconsent::consent::{
    ConsentChoice, ConsentPhase, ConsentStore, FileStorage, normalize, normalize_at,
};

use crate::consent_harness::{Harness, STORAGE_KEY};

fn file_store(tmp: &TempDir) -> ConsentStore {
    ConsentStore::new(Arc::new(FileStorage::new(tmp.path())), STORAGE_KEY)
}

#[test]
fn saved_record_loads_back_exactly() {
    let tmp = TempDir::new().unwrap();
    let store = file_store(&tmp);

    for choice in [
        ConsentChoice::accept_all(),
        ConsentChoice::essential_only(),
        ConsentChoice::default().with(siteconsent::Category::Targeting, true),
    ] {
        let record = normalize_at(&choice, 1_700_000_000_123);
        store.save(&record).unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert!(loaded.same_preferences(&record));
        assert_eq!(loaded.timestamp, record.timestamp);
    }
}

#[test]
fn stored_value_uses_wire_shape() {
    let tmp = TempDir::new().unwrap();
    let store = file_store(&tmp);
    store
        .save(&normalize_at(&ConsentChoice::accept_all(), 5))
        .unwrap();

    let raw = std::fs::read_to_string(tmp.path().join(format!("{STORAGE_KEY}.json"))).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        value,
        serde_json::json!({
            "necessary": true,
            "performance": true,
            "functional": true,
            "targeting": true,
            "timestamp": 5
        })
    );
}

#[test]
fn garbage_under_key_loads_as_absent() {
    let tmp = TempDir::new().unwrap();
    let store = file_store(&tmp);

    for garbage in ["", "not json", "{\"necessary\":true", "[1,2,3]", "null", "42"] {
        store.write_raw(garbage).unwrap();
        assert_eq!(store.load().unwrap(), None, "value {garbage:?}");
    }
}

#[tokio::test]
async fn corrupt_record_reprompts_visitor() {
    let harness = Harness::new();
    harness.store().write_raw("%%corrupted%%").unwrap();

    assert_eq!(harness.controller.mount().await, ConsentPhase::Pending);
    assert!(harness.controller.banner_visible());
}

#[tokio::test]
async fn clear_returns_next_session_to_prompting() {
    let harness = Harness::new();
    harness.controller.accept_all().await;
    harness.controller.clear().await;

    assert!(harness.store().load().unwrap().is_none());
    let next = harness.reload();
    assert_eq!(next.controller.mount().await, ConsentPhase::Pending);
}

#[tokio::test]
async fn file_backed_decision_survives_reload() {
    let tmp = TempDir::new().unwrap();
    let storage = Arc::new(FileStorage::new(tmp.path()));
    let harness = Harness::with_storage(storage);
    let outcome = harness.controller.essential_only().await;
    assert!(outcome.persisted);

    let next = harness.reload();
    assert_eq!(next.controller.mount().await, ConsentPhase::Decided);
    assert_eq!(next.controller.record(), Some(outcome.record));
    assert!(
        next.controller
            .record()
            .unwrap()
            .same_preferences(&normalize(&ConsentChoice::essential_only()))
    );
}
