//! End-to-end tests through the `schooldesk` facade
//!
//! Exercises the public surface the way an application would: open a store,
//! write through collection handles, reopen, and read back.

use schooldesk::{fields, CollectionKind, Direction, Document, Error, Store, StoreConfig};
use serde_json::{json, Value};
use tempfile::TempDir;

fn doc(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        _ => panic!("expected object"),
    }
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn catalog_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    {
        let store = Store::open(temp_dir.path()).unwrap();
        let games = store.collection("games").unwrap();
        games
            .doc("pong")
            .unwrap()
            .set(doc(json!({"title": "Pong", "html": "<canvas/>"})))
            .unwrap();
        store
            .collection("assistants")
            .unwrap()
            .doc("tutor")
            .unwrap()
            .set(doc(json!({"title": "Tutor", "embedHtml": "<iframe/>", "createdAt": 5})))
            .unwrap();
        store.hidden().hide("chess").unwrap();
    }

    let store = Store::open(temp_dir.path()).unwrap();
    let pong = store.games().doc("pong").unwrap().get();
    assert_eq!(pong.get(fields::HTML), Some(&json!("<canvas/>")));
    assert_eq!(pong.get(fields::TITLE), Some(&json!("Pong")));

    let tutor = store.assistants().doc("tutor").unwrap().get();
    assert_eq!(tutor.get("embedHtml"), Some(&json!("<iframe/>")));
    assert!(store.hidden().is_hidden("chess"));

    let stats = store.stats();
    assert_eq!((stats.games, stats.assistants, stats.homework, stats.hidden), (1, 1, 0, 1));
}

#[test]
fn atomic_store_round_trips() {
    let temp_dir = TempDir::new().unwrap();
    let cfg = StoreConfig {
        atomic_writes: true,
        ..StoreConfig::default()
    };
    let store = Store::open_with_config(temp_dir.path(), cfg).unwrap();

    for kind in CollectionKind::ALL {
        let collection = store.collection_kind(kind);
        collection
            .doc("one")
            .unwrap()
            .set(doc(json!({"title": "One", "createdAt": 1})))
            .unwrap();
        assert!(collection.doc("one").unwrap().get().exists());
    }
}

// ============================================================================
// Listing
// ============================================================================

#[test]
fn homework_lists_newest_first() {
    let temp_dir = TempDir::new().unwrap();
    let store = Store::open(temp_dir.path()).unwrap();
    let homework = store.homework();

    for (id, created) in [("a", 100), ("b", 300), ("c", 200)] {
        homework
            .doc(id)
            .unwrap()
            .set(doc(json!({"title": id, "createdAt": created})))
            .unwrap();
    }

    let newest = homework.get();
    assert_eq!(newest.ids(), vec!["b", "c", "a"]);

    let oldest = homework
        .order_by(fields::CREATED_AT, Direction::Ascending)
        .get();
    assert_eq!(oldest.ids(), vec!["a", "c", "b"]);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn unknown_collection_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let store = Store::open(temp_dir.path()).unwrap();
    assert!(matches!(
        store.collection("teachers"),
        Err(Error::UnsupportedCollection(_))
    ));
}

#[test]
fn path_like_ids_are_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let store = Store::open(temp_dir.path()).unwrap();
    assert!(matches!(
        store.games().doc("../escape"),
        Err(Error::InvalidId { .. })
    ));
}
