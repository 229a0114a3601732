//! HiddenSet: ids of built-in games hidden from listings
//!
//! Persisted as a JSON array in `_hidden.json`. Built-in games are not
//! documents, so this set is independent of the games collection.

use super::StoreFiles;
use schooldesk_core::{validate_id, Result};
use schooldesk_storage::{read_json_or_default, write_json};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Persisted set of hidden game ids
#[derive(Debug, Clone)]
pub struct HiddenSet {
    files: Arc<StoreFiles>,
}

impl HiddenSet {
    pub(crate) fn new(files: Arc<StoreFiles>) -> Self {
        Self { files }
    }

    /// Raw array elements; non-string entries are kept so rewrites carry them
    fn read_raw(&self) -> Vec<Value> {
        read_json_or_default(&self.files.paths.hidden())
    }

    /// Hidden ids in the order they were hidden
    ///
    /// A missing, corrupt or non-array file reads as empty. Non-string
    /// elements are skipped.
    pub fn ids(&self) -> Vec<String> {
        self.read_raw()
            .into_iter()
            .filter_map(|value| match value {
                Value::String(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    /// Whether `id` is hidden
    pub fn is_hidden(&self, id: &str) -> bool {
        self.ids().iter().any(|hidden| hidden == id)
    }

    /// Hide `id`; returns `false` if it was already hidden
    pub fn hide(&self, id: &str) -> Result<bool> {
        validate_id(id)?;
        let _guard = self.files.write_lock.lock();
        let mut raw = self.read_raw();
        if raw.iter().any(|value| value.as_str() == Some(id)) {
            return Ok(false);
        }
        raw.push(Value::from(id));
        write_json(&self.files.paths.hidden(), &raw, self.files.write)?;
        debug!(target: "schooldesk::store", id, "Game hidden");
        Ok(true)
    }

    /// Unhide `id`; returns `false` if it was not hidden
    pub fn unhide(&self, id: &str) -> Result<bool> {
        let _guard = self.files.write_lock.lock();
        let mut raw = self.read_raw();
        let before = raw.len();
        raw.retain(|value| value.as_str() != Some(id));
        if raw.len() == before {
            return Ok(false);
        }
        write_json(&self.files.paths.hidden(), &raw, self.files.write)?;
        debug!(target: "schooldesk::store", id, "Game unhidden");
        Ok(true)
    }

    /// Drop hidden ids from a listing of `(id, item)` pairs
    pub fn filter_visible<T>(&self, items: Vec<(String, T)>) -> Vec<(String, T)> {
        let hidden = self.ids();
        items
            .into_iter()
            .filter(|(id, _)| !hidden.contains(id))
            .collect()
    }
}
