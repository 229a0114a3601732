//! Document representation and field helpers
//!
//! A document is a JSON object. Typed views (such as the games index entry)
//! live in the engine; this module only knows how to pull well-known fields
//! out of an arbitrary object without failing.

use crate::contract::Timestamp;
use serde_json::Value;
use std::cmp::Ordering;

/// A document body: a JSON object keyed by field name
pub type Document = serde_json::Map<String, Value>;

/// Well-known field names shared by every collection
pub mod fields {
    /// Document identifier
    pub const ID: &str = "id";
    /// URL slug; equal to the id for games and assistants
    pub const SLUG: &str = "slug";
    /// Display title
    pub const TITLE: &str = "title";
    /// Short description
    pub const DESCRIPTION: &str = "description";
    /// Game markup payload
    pub const HTML: &str = "html";
    /// On-disk location of a game's payload file
    pub const HTML_PATH: &str = "htmlPath";
    /// Creation time in epoch milliseconds
    pub const CREATED_AT: &str = "createdAt";
    /// Last write time in epoch milliseconds
    pub const UPDATED_AT: &str = "updatedAt";
    /// Identifier of the admin who wrote the document
    pub const CREATED_BY: &str = "createdBy";
}

/// Borrow a string field, if present and a string
pub fn str_field<'a>(doc: &'a Document, field: &str) -> Option<&'a str> {
    doc.get(field).and_then(Value::as_str)
}

/// Read a timestamp field
///
/// Accepts integer or floating point milliseconds. Zero, negative and
/// non-numeric values count as absent.
pub fn timestamp_field(doc: &Document, field: &str) -> Option<Timestamp> {
    Timestamp::from_json(doc.get(field)?)
}

/// Numeric sort key for ordering listings
///
/// Missing or non-numeric fields sort as zero.
pub fn sort_key(doc: &Document, field: &str) -> f64 {
    doc.get(field).and_then(Value::as_f64).unwrap_or(0.0)
}

/// Compare two documents by a numeric field, largest first
pub fn cmp_descending(a: &Document, b: &Document, field: &str) -> Ordering {
    sort_key(b, field).total_cmp(&sort_key(a, field))
}

/// Overlay `patch` onto `base`, replacing top-level fields
pub fn merge(base: &mut Document, patch: Document) {
    for (key, value) in patch {
        base.insert(key, value);
    }
}
