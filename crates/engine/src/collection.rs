//! Collection, document and query handles
//!
//! Handles are cheap borrowed views over a `Store`. The storage strategy is
//! picked once, when the collection handle is created, and every handle
//! derived from it reuses that choice.
//!
//! ```ignore
//! let store = Store::open("lib/Games")?;
//! let games = store.collection("games")?;
//!
//! games.doc("pong")?.set(doc)?;
//! let snap = games.doc("pong")?.get();
//! let newest_first = games.order_by("createdAt", Direction::Descending).get();
//! ```

use crate::primitives::DocumentStorage;
use crate::snapshot::{DocumentSnapshot, QueryDocumentSnapshot, QuerySnapshot};
use schooldesk_core::document::{cmp_descending, fields, merge, timestamp_field};
use schooldesk_core::{validate_id, CollectionKind, Direction, Document, Result, Timestamp};
use serde_json::Value;

/// Handle to one collection
#[derive(Clone, Copy)]
pub struct Collection<'a> {
    kind: CollectionKind,
    storage: &'a dyn DocumentStorage,
}

impl<'a> Collection<'a> {
    pub(crate) fn new(kind: CollectionKind, storage: &'a dyn DocumentStorage) -> Self {
        Self { kind, storage }
    }

    /// Which collection this is
    pub fn kind(&self) -> CollectionKind {
        self.kind
    }

    /// Handle to one document
    ///
    /// # Errors
    ///
    /// `InvalidId` if `id` is empty or unsafe as a file name. Ids are
    /// expected to be normalized already (see `normalize_slug`).
    pub fn doc(&self, id: &str) -> Result<DocumentRef<'a>> {
        validate_id(id)?;
        Ok(DocumentRef {
            kind: self.kind,
            id: id.to_string(),
            storage: self.storage,
        })
    }

    /// Listing ordered by a numeric field
    pub fn order_by(&self, field: &str, direction: Direction) -> Query<'a> {
        Query {
            kind: self.kind,
            storage: self.storage,
            order_field: field.to_string(),
            direction,
            filters: Vec::new(),
        }
    }

    /// Every document, newest `createdAt` first
    pub fn get(&self) -> QuerySnapshot {
        self.order_by(fields::CREATED_AT, Direction::Descending).get()
    }

    /// Number of documents
    pub fn count(&self) -> usize {
        self.storage.count()
    }
}

impl std::fmt::Debug for Collection<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collection")
            .field("kind", &self.kind)
            .field("strategy", &self.storage.strategy())
            .finish()
    }
}

/// Handle to one document of a collection
#[derive(Clone)]
pub struct DocumentRef<'a> {
    kind: CollectionKind,
    id: String,
    storage: &'a dyn DocumentStorage,
}

impl<'a> DocumentRef<'a> {
    /// Document id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Collection the document belongs to
    pub fn kind(&self) -> CollectionKind {
        self.kind
    }

    /// Write the document
    ///
    /// Games keep their first `createdAt` and always get a fresh
    /// `updatedAt`; shared-map documents are stored exactly as given, with
    /// `id` forced to this document's id.
    pub fn set(&self, data: Document) -> Result<()> {
        self.storage.set(&self.id, data)
    }

    /// Read the document; never fails
    pub fn get(&self) -> DocumentSnapshot {
        DocumentSnapshot::new(self.id.clone(), self.storage.get(&self.id))
    }

    /// Remove the document; absent documents are a no-op
    pub fn delete(&self) -> Result<()> {
        self.storage.delete(&self.id)?;
        Ok(())
    }

    /// Merge `patch` into the current document and write the result
    ///
    /// Fields not named in `patch` keep their current values, `id` is forced,
    /// and `updatedAt` is refreshed. An absent document is created from the
    /// patch alone. The read and the write are not atomic together.
    pub fn update(&self, patch: Document) -> Result<()> {
        let mut merged = self.get().into_data().unwrap_or_default();
        let previous = timestamp_field(&merged, fields::UPDATED_AT).unwrap_or(Timestamp::EPOCH);

        merge(&mut merged, patch);
        merged.insert(fields::ID.into(), Value::from(self.id.as_str()));
        if self.kind == CollectionKind::Games {
            merged.insert(fields::SLUG.into(), Value::from(self.id.as_str()));
        }
        merged.insert(fields::UPDATED_AT.into(), Timestamp::now_at_least(previous).into());

        self.set(merged)
    }
}

impl std::fmt::Debug for DocumentRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentRef")
            .field("kind", &self.kind)
            .field("id", &self.id)
            .finish()
    }
}

/// Ordered, optionally filtered listing of a collection
#[derive(Clone)]
pub struct Query<'a> {
    kind: CollectionKind,
    storage: &'a dyn DocumentStorage,
    order_field: String,
    direction: Direction,
    filters: Vec<(String, Value)>,
}

impl<'a> Query<'a> {
    /// Keep only documents whose `field` equals `value`
    pub fn where_eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.filters.push((field.to_string(), value.into()));
        self
    }

    /// Collection being queried
    pub fn kind(&self) -> CollectionKind {
        self.kind
    }

    /// Run the query
    ///
    /// Documents sort by the order field as a number; missing or non-numeric
    /// values sort as zero. Equal values keep id order for `Descending`;
    /// `Ascending` is the exact reverse of `Descending`.
    pub fn get(&self) -> QuerySnapshot {
        let mut docs: Vec<(String, Document)> = self
            .storage
            .list()
            .into_iter()
            .filter(|(_, doc)| {
                self.filters
                    .iter()
                    .all(|(field, value)| doc.get(field) == Some(value))
            })
            .collect();

        // Stable sort over id-ordered input
        docs.sort_by(|(_, a), (_, b)| cmp_descending(a, b, &self.order_field));
        if self.direction == Direction::Ascending {
            docs.reverse();
        }

        QuerySnapshot::new(
            docs.into_iter()
                .map(|(id, data)| QueryDocumentSnapshot::new(id, data))
                .collect(),
        )
    }
}

impl std::fmt::Debug for Query<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Query")
            .field("kind", &self.kind)
            .field("order_field", &self.order_field)
            .field("direction", &self.direction)
            .field("filters", &self.filters)
            .finish()
    }
}
