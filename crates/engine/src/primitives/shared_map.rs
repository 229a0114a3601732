//! SharedMap: small documents inline in one JSON map
//!
//! `_generic.json` is keyed by collection name, then by id:
//!
//! ```json
//! { "assistants": { "<id>": { .. } }, "homework": { "<id>": { .. } } }
//! ```
//!
//! Both shared-map collections live in the same file, so every write
//! rewrites the whole map. `set` replaces the record; merging is the caller's
//! job (see `DocumentRef::update`).

use super::{DocumentStorage, StoreFiles};
use schooldesk_core::document::fields;
use schooldesk_core::{CollectionKind, Document, Result, StorageStrategy};
use schooldesk_storage::{read_json_or_default, write_json};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// On-disk map: collection name → section
type SharedMapFile = BTreeMap<String, Value>;

/// One collection's section of the shared map
#[derive(Debug, Clone)]
pub struct SharedMap {
    files: Arc<StoreFiles>,
    kind: CollectionKind,
}

impl SharedMap {
    pub(crate) fn new(files: Arc<StoreFiles>, kind: CollectionKind) -> Self {
        debug_assert_eq!(kind.strategy(), StorageStrategy::SharedMap);
        Self { files, kind }
    }

    /// Collection this section belongs to
    pub fn kind(&self) -> CollectionKind {
        self.kind
    }

    fn read_file(&self) -> SharedMapFile {
        read_json_or_default(&self.files.paths.shared_map())
    }

    /// Copy of this collection's section; a non-object section reads as empty
    fn read_section(&self) -> Document {
        match self.read_file().remove(self.kind.name()) {
            Some(Value::Object(section)) => section,
            _ => Document::new(),
        }
    }

    /// Read-modify-write of this collection's section under the write lock
    ///
    /// `f` returns whether it changed the section; nothing is written otherwise.
    /// Every write leaves both shared-map sections present.
    fn modify<F>(&self, f: F) -> Result<bool>
    where
        F: FnOnce(&mut Document) -> bool,
    {
        let _guard = self.files.write_lock.lock();
        let mut file = self.read_file();
        let mut section = match file.remove(self.kind.name()) {
            Some(Value::Object(section)) => section,
            _ => Document::new(),
        };

        let changed = f(&mut section);
        if changed {
            file.insert(self.kind.name().to_string(), Value::Object(section));
            for kind in CollectionKind::ALL {
                if kind.strategy() == StorageStrategy::SharedMap {
                    file.entry(kind.name().to_string())
                        .or_insert_with(|| Value::Object(Document::new()));
                }
            }
            write_json(&self.files.paths.shared_map(), &file, self.files.write)?;
        }
        Ok(changed)
    }
}

impl DocumentStorage for SharedMap {
    fn strategy(&self) -> StorageStrategy {
        StorageStrategy::SharedMap
    }

    fn set(&self, id: &str, mut data: Document) -> Result<()> {
        data.insert(fields::ID.into(), Value::from(id));
        self.modify(|section| {
            section.insert(id.to_string(), Value::Object(data));
            true
        })?;
        debug!(target: "schooldesk::store", collection = self.kind.name(), id, "Document set");
        Ok(())
    }

    fn get(&self, id: &str) -> Option<Document> {
        match self.read_section().remove(id) {
            Some(Value::Object(doc)) => Some(doc),
            _ => None,
        }
    }

    fn delete(&self, id: &str) -> Result<bool> {
        let existed = self.modify(|section| section.remove(id).is_some())?;
        debug!(target: "schooldesk::store", collection = self.kind.name(), id, existed, "Document deleted");
        Ok(existed)
    }

    fn list(&self) -> Vec<(String, Document)> {
        self.read_section()
            .into_iter()
            .filter_map(|(id, value)| match value {
                Value::Object(doc) => Some((id, doc)),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schooldesk_storage::{StorePaths, WriteOptions};
    use serde_json::json;
    use tempfile::TempDir;

    fn setup() -> (TempDir, SharedMap, SharedMap) {
        let temp_dir = TempDir::new().unwrap();
        let files = Arc::new(StoreFiles::new(
            StorePaths::new(temp_dir.path()),
            WriteOptions::default(),
        ));
        let assistants = SharedMap::new(files.clone(), CollectionKind::Assistants);
        let homework = SharedMap::new(files, CollectionKind::Homework);
        (temp_dir, assistants, homework)
    }

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_set_get_injects_id() {
        let (_temp, assistants, _homework) = setup();
        assistants
            .set("tutor", doc(json!({"title": "Tutor", "embedHtml": "<iframe/>"})))
            .unwrap();
        let data = assistants.get("tutor").unwrap();
        assert_eq!(
            Value::Object(data),
            json!({"id": "tutor", "title": "Tutor", "embedHtml": "<iframe/>"})
        );
    }

    #[test]
    fn test_set_overrides_conflicting_id_field() {
        let (_temp, assistants, _homework) = setup();
        assistants.set("real", doc(json!({"id": "fake"}))).unwrap();
        assert_eq!(assistants.get("real").unwrap()["id"], json!("real"));
        assert!(assistants.get("fake").is_none());
    }

    #[test]
    fn test_set_replaces_whole_record() {
        let (_temp, assistants, _homework) = setup();
        assistants.set("a", doc(json!({"title": "A", "extra": 1}))).unwrap();
        assistants.set("a", doc(json!({"title": "B"}))).unwrap();
        let data = assistants.get("a").unwrap();
        assert_eq!(data["title"], json!("B"));
        assert!(!data.contains_key("extra"));
    }

    #[test]
    fn test_collections_share_file_but_not_namespace() {
        let (temp, assistants, homework) = setup();
        assistants.set("same", doc(json!({"title": "assistant"}))).unwrap();
        homework.set("same", doc(json!({"title": "homework"}))).unwrap();

        assert_eq!(assistants.get("same").unwrap()["title"], json!("assistant"));
        assert_eq!(homework.get("same").unwrap()["title"], json!("homework"));

        let raw: Value = serde_json::from_str(
            &std::fs::read_to_string(temp.path().join("_generic.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(raw["assistants"]["same"]["title"], json!("assistant"));
        assert_eq!(raw["homework"]["same"]["title"], json!("homework"));
    }

    #[test]
    fn test_delete() {
        let (_temp, assistants, homework) = setup();
        assistants.set("a", doc(json!({}))).unwrap();
        homework.set("a", doc(json!({}))).unwrap();

        assert!(assistants.delete("a").unwrap());
        assert!(assistants.get("a").is_none());
        assert!(homework.get("a").is_some());
        assert!(!assistants.delete("a").unwrap());
    }

    #[test]
    fn test_delete_absent_does_not_create_file() {
        let (temp, assistants, _homework) = setup();
        assert!(!assistants.delete("ghost").unwrap());
        assert!(!temp.path().join("_generic.json").exists());
    }

    #[test]
    fn test_non_object_entries_are_skipped() {
        let (temp, _assistants, homework) = setup();
        std::fs::write(
            temp.path().join("_generic.json"),
            r#"{"homework": {"good": {"title": "ok"}, "bad": 42}, "assistants": []}"#,
        )
        .unwrap();

        assert!(homework.get("bad").is_none());
        let listed = homework.list();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].0, "good");
    }

    #[test]
    fn test_non_object_section_reads_empty_and_is_replaced() {
        let (temp, assistants, _homework) = setup();
        std::fs::write(temp.path().join("_generic.json"), r#"{"assistants": []}"#).unwrap();
        assert!(assistants.list().is_empty());

        assistants.set("a", doc(json!({}))).unwrap();
        assert!(assistants.get("a").is_some());
    }

    #[test]
    fn test_corrupt_file_reads_empty() {
        let (temp, assistants, _homework) = setup();
        std::fs::write(temp.path().join("_generic.json"), "{{{{").unwrap();
        assert!(assistants.list().is_empty());
        assert_eq!(assistants.count(), 0);
    }

    #[test]
    fn test_first_write_creates_both_sections() {
        let (temp, assistants, _homework) = setup();
        assistants.set("tutor", doc(json!({"title": "Tutor"}))).unwrap();

        let raw: Value = serde_json::from_str(
            &std::fs::read_to_string(temp.path().join("_generic.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(raw["homework"], json!({}));
        assert_eq!(raw["assistants"]["tutor"]["title"], json!("Tutor"));
    }
}
