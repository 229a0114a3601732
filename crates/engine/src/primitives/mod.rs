//! Storage strategies behind the collections
//!
//! - `BlobIndexed`: games index file plus one payload file per game
//! - `SharedMap`: assistants and homework inline in one JSON map
//! - `HiddenSet`: the standalone set of hidden game ids
//!
//! Every strategy holds an `Arc<StoreFiles>`: the store layout, the write
//! options from `schooldesk.toml`, and the store-wide write lock. Each
//! mutation is a whole-file read-modify-write taken under that lock; reads
//! never lock.

pub mod blob_indexed;
pub mod hidden;
pub mod shared_map;

pub use blob_indexed::{BlobIndexed, GameIndexEntry};
pub use hidden::HiddenSet;
pub use shared_map::SharedMap;

use parking_lot::Mutex;
use schooldesk_core::{Document, Result, StorageStrategy};
use schooldesk_storage::{StorePaths, WriteOptions};

/// State shared by every strategy of one store
#[derive(Debug)]
pub(crate) struct StoreFiles {
    pub(crate) paths: StorePaths,
    pub(crate) write: WriteOptions,
    /// Serializes read-modify-write cycles within this process
    pub(crate) write_lock: Mutex<()>,
}

impl StoreFiles {
    pub(crate) fn new(paths: StorePaths, write: WriteOptions) -> Self {
        Self {
            paths,
            write,
            write_lock: Mutex::new(()),
        }
    }
}

/// Document operations a collection delegates to its storage strategy
///
/// Reads are infallible: absent, unreadable or corrupt data reads as
/// "nothing here". Writes return their I/O and serialization errors.
/// Ids reaching a strategy have already passed `validate_id`.
pub trait DocumentStorage: Send + Sync {
    /// Which on-disk layout this strategy uses
    fn strategy(&self) -> StorageStrategy;

    /// Write a document, replacing the previous one
    fn set(&self, id: &str, data: Document) -> Result<()>;

    /// Read a document
    fn get(&self, id: &str) -> Option<Document>;

    /// Remove a document; returns whether it existed
    fn delete(&self, id: &str) -> Result<bool>;

    /// Every document as `(id, data)`, in id order
    fn list(&self) -> Vec<(String, Document)>;

    /// Number of documents
    fn count(&self) -> usize {
        self.list().len()
    }
}
