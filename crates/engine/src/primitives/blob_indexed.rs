//! BlobIndexed: games metadata in an index file, markup in a file per game
//!
//! ## Layout
//!
//! - `_local_index.json` maps id → `GameIndexEntry` (no markup)
//! - `<id>.html` holds the raw markup of one game
//!
//! Keeping the markup out of the index means a single-game write rewrites
//! one small index plus one payload file, never every game's markup.
//!
//! ## Write order
//!
//! `set` writes the payload first, then the index. The pair is not atomic:
//! a failure between the two leaves a payload with a stale (or no) index
//! entry. Neither `get` nor `list` detects this.
//!
//! ## Leniency
//!
//! The index is read as raw JSON values. An entry that is not an object with
//! a string `id` reads as absent but is carried through rewrites untouched.
//! Within a well-formed entry, wrong-typed fields read as unset.

use super::{DocumentStorage, StoreFiles};
use schooldesk_core::document::{fields, str_field, timestamp_field};
use schooldesk_core::{Document, Result, StorageStrategy, Timestamp};
use schooldesk_storage::{read_json_or_default, read_text_or_empty, remove_quietly, write_json, write_text};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// On-disk index: id → raw entry
type RawIndex = BTreeMap<String, Value>;

/// One game's metadata as stored in `_local_index.json`
///
/// Only `id` is required. Every other field reads leniently: a missing or
/// wrong-typed value reads as unset instead of hiding the whole game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameIndexEntry {
    /// Game id
    pub id: String,
    /// Always equal to `id`
    #[serde(default, deserialize_with = "lenient_string")]
    pub slug: String,
    /// Display title
    #[serde(default, deserialize_with = "lenient_opt_string", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Short description
    #[serde(default, deserialize_with = "lenient_opt_string", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Payload file location at write time
    #[serde(default, deserialize_with = "lenient_string")]
    pub html_path: String,
    /// First write time
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Timestamp,
    /// Last write time
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub updated_at: Timestamp,
    /// Admin who wrote the game
    #[serde(default, deserialize_with = "lenient_opt_string", skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_opt_string(deserializer)?.unwrap_or_default())
}

fn lenient_opt_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(Some(s)),
        _ => Ok(None),
    }
}

/// Integer or float milliseconds, as `Timestamp::from_json` reads them
fn lenient_timestamp<'de, D>(deserializer: D) -> std::result::Result<Timestamp, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(Timestamp::from_json(&value).unwrap_or_default())
}

impl GameIndexEntry {
    fn from_raw(raw: &Value) -> Option<Self> {
        let mut entry = GameIndexEntry::deserialize(raw).ok()?;
        if entry.slug.is_empty() {
            entry.slug = entry.id.clone();
        }
        Some(entry)
    }

    fn to_raw(&self) -> Value {
        Value::Object(self.to_document())
    }

    /// Metadata as a document (no markup)
    pub fn to_document(&self) -> Document {
        let mut doc = Document::new();
        doc.insert(fields::ID.into(), Value::from(self.id.as_str()));
        doc.insert(fields::SLUG.into(), Value::from(self.slug.as_str()));
        if let Some(title) = &self.title {
            doc.insert(fields::TITLE.into(), Value::from(title.as_str()));
        }
        if let Some(description) = &self.description {
            doc.insert(fields::DESCRIPTION.into(), Value::from(description.as_str()));
        }
        doc.insert(fields::HTML_PATH.into(), Value::from(self.html_path.as_str()));
        doc.insert(fields::CREATED_AT.into(), self.created_at.into());
        doc.insert(fields::UPDATED_AT.into(), self.updated_at.into());
        if let Some(created_by) = &self.created_by {
            doc.insert(fields::CREATED_BY.into(), Value::from(created_by.as_str()));
        }
        doc
    }
}

/// Blob-indexed storage for the games collection
#[derive(Debug, Clone)]
pub struct BlobIndexed {
    files: Arc<StoreFiles>,
}

impl BlobIndexed {
    pub(crate) fn new(files: Arc<StoreFiles>) -> Self {
        Self { files }
    }

    fn index_path(&self) -> PathBuf {
        self.files.paths.games_index()
    }

    fn read_index(&self) -> RawIndex {
        read_json_or_default(&self.index_path())
    }

    /// Typed index entry for `id`, if present and well-formed
    pub fn entry(&self, id: &str) -> Option<GameIndexEntry> {
        self.read_index().get(id).and_then(GameIndexEntry::from_raw)
    }
}

impl DocumentStorage for BlobIndexed {
    fn strategy(&self) -> StorageStrategy {
        StorageStrategy::BlobIndexed
    }

    fn set(&self, id: &str, data: Document) -> Result<()> {
        let _guard = self.files.write_lock.lock();
        let payload_path = self.files.paths.payload(id);

        let wrote_payload = match str_field(&data, fields::HTML) {
            Some(html) => {
                write_text(&payload_path, html, self.files.write)?;
                true
            }
            None => false,
        };

        let mut index = self.read_index();
        let existing = index.get(id).and_then(GameIndexEntry::from_raw);

        let created_at = existing
            .as_ref()
            .map(|e| e.created_at)
            .filter(|ts| *ts > Timestamp::EPOCH)
            .or_else(|| timestamp_field(&data, fields::CREATED_AT))
            .unwrap_or_else(Timestamp::now);
        let updated_at = Timestamp::now_at_least(
            existing.map(|e| e.updated_at).unwrap_or(Timestamp::EPOCH),
        );

        let entry = GameIndexEntry {
            id: id.to_string(),
            slug: id.to_string(),
            title: str_field(&data, fields::TITLE).map(String::from),
            description: str_field(&data, fields::DESCRIPTION).map(String::from),
            html_path: payload_path.to_string_lossy().into_owned(),
            created_at,
            updated_at,
            created_by: str_field(&data, fields::CREATED_BY).map(String::from),
        };
        index.insert(id.to_string(), entry.to_raw());
        write_json(&self.index_path(), &index, self.files.write)?;

        debug!(target: "schooldesk::store", collection = "games", id, wrote_payload, "Document set");
        Ok(())
    }

    fn get(&self, id: &str) -> Option<Document> {
        let entry = self.entry(id)?;
        // Resolved from the id so the store root can be moved
        let html = read_text_or_empty(&self.files.paths.payload(id));
        let mut doc = entry.to_document();
        doc.insert(fields::HTML.into(), Value::String(html));
        Some(doc)
    }

    fn delete(&self, id: &str) -> Result<bool> {
        let _guard = self.files.write_lock.lock();
        let mut index = self.read_index();
        let existed = index.remove(id).is_some();
        if existed {
            write_json(&self.index_path(), &index, self.files.write)?;
        }
        // Also reclaims a payload orphaned by an interrupted set
        let removed_payload = remove_quietly(&self.files.paths.payload(id));

        debug!(target: "schooldesk::store", collection = "games", id, existed, removed_payload, "Document deleted");
        Ok(existed)
    }

    fn list(&self) -> Vec<(String, Document)> {
        self.read_index()
            .iter()
            .filter_map(|(id, raw)| {
                GameIndexEntry::from_raw(raw).map(|entry| (id.clone(), entry.to_document()))
            })
            .collect()
    }

    fn count(&self) -> usize {
        self.read_index()
            .values()
            .filter(|raw| GameIndexEntry::from_raw(raw).is_some())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schooldesk_storage::{StorePaths, WriteOptions};
    use serde_json::json;
    use tempfile::TempDir;

    fn setup() -> (TempDir, BlobIndexed) {
        let temp_dir = TempDir::new().unwrap();
        let files = StoreFiles::new(StorePaths::new(temp_dir.path()), WriteOptions::default());
        (temp_dir, BlobIndexed::new(Arc::new(files)))
    }

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_set_writes_payload_and_index() {
        let (temp, games) = setup();
        games
            .set("pong", doc(json!({"title": "Pong", "description": "Classic", "html": "<p>pong</p>"})))
            .unwrap();

        let payload = std::fs::read_to_string(temp.path().join("pong.html")).unwrap();
        assert_eq!(payload, "<p>pong</p>");

        let index: RawIndex = serde_json::from_str(
            &std::fs::read_to_string(temp.path().join("_local_index.json")).unwrap(),
        )
        .unwrap();
        let entry = GameIndexEntry::from_raw(&index["pong"]).unwrap();
        assert_eq!(entry.slug, "pong");
        assert_eq!(entry.title.as_deref(), Some("Pong"));
        assert!(entry.html_path.ends_with("pong.html"));
        assert!(!index["pong"].as_object().unwrap().contains_key("html"));
    }

    #[test]
    fn test_get_joins_payload() {
        let (_temp, games) = setup();
        games.set("x", doc(json!({"html": "<html>hi</html>"}))).unwrap();
        let data = games.get("x").unwrap();
        assert_eq!(data["html"], json!("<html>hi</html>"));
        assert_eq!(data["id"], json!("x"));
        assert_eq!(data["slug"], json!("x"));
    }

    #[test]
    fn test_get_missing_payload_is_empty_string() {
        let (temp, games) = setup();
        games.set("x", doc(json!({"html": "<p/>"}))).unwrap();
        std::fs::remove_file(temp.path().join("x.html")).unwrap();
        let data = games.get("x").unwrap();
        assert_eq!(data["html"], json!(""));
    }

    #[test]
    fn test_set_without_html_keeps_previous_payload() {
        let (_temp, games) = setup();
        games.set("x", doc(json!({"title": "A", "html": "<p>v1</p>"}))).unwrap();
        games.set("x", doc(json!({"title": "B"}))).unwrap();
        let data = games.get("x").unwrap();
        assert_eq!(data["title"], json!("B"));
        assert_eq!(data["html"], json!("<p>v1</p>"));
    }

    #[test]
    fn test_created_at_preserved_updated_at_refreshed() {
        let (_temp, games) = setup();
        games.set("x", doc(json!({"createdAt": 1000, "html": ""}))).unwrap();
        let first = games.entry("x").unwrap();
        assert_eq!(first.created_at, Timestamp::from_millis(1000));

        games.set("x", doc(json!({"createdAt": 5000}))).unwrap();
        let second = games.entry("x").unwrap();
        assert_eq!(second.created_at, Timestamp::from_millis(1000));
        assert!(second.updated_at >= first.updated_at);
    }

    #[test]
    fn test_created_at_defaults_to_now() {
        let (_temp, games) = setup();
        let before = Timestamp::now();
        games.set("x", doc(json!({}))).unwrap();
        assert!(games.entry("x").unwrap().created_at >= before);
    }

    #[test]
    fn test_delete_removes_entry_and_payload() {
        let (temp, games) = setup();
        games.set("x", doc(json!({"html": "<p/>"}))).unwrap();
        assert!(games.delete("x").unwrap());
        assert!(games.get("x").is_none());
        assert!(!temp.path().join("x.html").exists());
    }

    #[test]
    fn test_delete_absent_is_noop() {
        let (temp, games) = setup();
        assert!(!games.delete("ghost").unwrap());
        assert!(!temp.path().join("_local_index.json").exists());
    }

    #[test]
    fn test_delete_reclaims_orphan_payload() {
        let (temp, games) = setup();
        std::fs::write(temp.path().join("orphan.html"), "<p/>").unwrap();
        assert!(!games.delete("orphan").unwrap());
        assert!(!temp.path().join("orphan.html").exists());
    }

    #[test]
    fn test_malformed_entry_reads_absent_but_survives_rewrite() {
        let (temp, games) = setup();
        std::fs::write(
            temp.path().join("_local_index.json"),
            r#"{"broken": {"id": 7}, "ok": {"id": "ok", "slug": "ok"}}"#,
        )
        .unwrap();

        assert!(games.get("broken").is_none());
        assert!(games.get("ok").is_some());
        assert_eq!(games.count(), 1);

        games.set("new", doc(json!({}))).unwrap();
        let raw: RawIndex = serde_json::from_str(
            &std::fs::read_to_string(temp.path().join("_local_index.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(raw["broken"], json!({"id": 7}));
    }

    #[test]
    fn test_corrupt_index_reads_empty() {
        let (temp, games) = setup();
        std::fs::write(temp.path().join("_local_index.json"), "not json").unwrap();
        assert!(games.list().is_empty());
        assert!(games.get("anything").is_none());
    }

    #[test]
    fn test_list_excludes_payload() {
        let (_temp, games) = setup();
        games.set("a", doc(json!({"html": "<big/>"}))).unwrap();
        let listed = games.list();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].0, "a");
        assert!(!listed[0].1.contains_key("html"));
    }

    #[test]
    fn test_float_timestamps_read_as_millis() {
        let (temp, games) = setup();
        std::fs::write(
            temp.path().join("_local_index.json"),
            r#"{"pong": {"id": "pong", "slug": "pong", "title": "Pong",
                "htmlPath": "pong.html",
                "createdAt": 1700000000000.0, "updatedAt": 1700000000500.0}}"#,
        )
        .unwrap();
        std::fs::write(temp.path().join("pong.html"), "<p>pong</p>").unwrap();

        let data = games.get("pong").unwrap();
        assert_eq!(data["title"], json!("Pong"));
        assert_eq!(data["html"], json!("<p>pong</p>"));
        assert_eq!(data["createdAt"], json!(1_700_000_000_000u64));
        assert_eq!(games.list().len(), 1);
        assert_eq!(games.count(), 1);

        games.set("pong", doc(json!({"title": "Pong 2"}))).unwrap();
        let entry = games.entry("pong").unwrap();
        assert_eq!(entry.created_at, Timestamp::from_millis(1_700_000_000_000));
        assert!(entry.updated_at >= Timestamp::from_millis(1_700_000_000_500));
    }

    #[test]
    fn test_wrong_typed_fields_read_as_unset() {
        let (temp, games) = setup();
        std::fs::write(
            temp.path().join("_local_index.json"),
            r#"{"snake": {"id": "snake", "htmlPath": null, "title": 3,
                "createdAt": "yesterday", "createdBy": null}}"#,
        )
        .unwrap();

        let entry = games.entry("snake").unwrap();
        assert_eq!(entry.slug, "snake");
        assert_eq!(entry.html_path, "");
        assert_eq!(entry.title, None);
        assert_eq!(entry.created_at, Timestamp::EPOCH);
        assert_eq!(entry.created_by, None);
        assert!(games.get("snake").is_some());
        assert_eq!(games.count(), 1);
    }
}
