//! Read results
//!
//! A `DocumentSnapshot` is the result of reading one document: an existence
//! flag plus the data, if any. A `QuerySnapshot` is an ordered list of
//! present documents from a collection listing.

use schooldesk_core::Document;
use serde_json::Value;

/// Point-in-time read of one document
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSnapshot {
    id: String,
    data: Option<Document>,
}

impl DocumentSnapshot {
    pub(crate) fn new(id: impl Into<String>, data: Option<Document>) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }

    /// Id that was read
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether the document was present
    pub fn exists(&self) -> bool {
        self.data.is_some()
    }

    /// Document data, if present
    pub fn data(&self) -> Option<&Document> {
        self.data.as_ref()
    }

    /// One field of the document, if present
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.data.as_ref()?.get(field)
    }

    /// Take the document data
    pub fn into_data(self) -> Option<Document> {
        self.data
    }
}

/// One present document inside a `QuerySnapshot`
#[derive(Debug, Clone, PartialEq)]
pub struct QueryDocumentSnapshot {
    id: String,
    data: Document,
}

impl QueryDocumentSnapshot {
    pub(crate) fn new(id: String, data: Document) -> Self {
        Self { id, data }
    }

    /// Document id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Document data
    pub fn data(&self) -> &Document {
        &self.data
    }

    /// Take the document data
    pub fn into_data(self) -> Document {
        self.data
    }
}

/// Ordered result of listing a collection
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QuerySnapshot {
    docs: Vec<QueryDocumentSnapshot>,
}

impl QuerySnapshot {
    pub(crate) fn new(docs: Vec<QueryDocumentSnapshot>) -> Self {
        Self { docs }
    }

    /// Documents in query order
    pub fn docs(&self) -> &[QueryDocumentSnapshot] {
        &self.docs
    }

    /// Number of documents
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    /// True when the query matched nothing
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Document ids in query order
    pub fn ids(&self) -> Vec<&str> {
        self.docs.iter().map(|d| d.id()).collect()
    }

    /// Iterate documents in query order
    pub fn iter(&self) -> std::slice::Iter<'_, QueryDocumentSnapshot> {
        self.docs.iter()
    }
}

impl IntoIterator for QuerySnapshot {
    type Item = QueryDocumentSnapshot;
    type IntoIter = std::vec::IntoIter<QueryDocumentSnapshot>;

    fn into_iter(self) -> Self::IntoIter {
        self.docs.into_iter()
    }
}

impl<'a> IntoIterator for &'a QuerySnapshot {
    type Item = &'a QueryDocumentSnapshot;
    type IntoIter = std::slice::Iter<'a, QueryDocumentSnapshot>;

    fn into_iter(self) -> Self::IntoIter {
        self.docs.iter()
    }
}
