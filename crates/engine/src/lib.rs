//! Local document store for schooldesk
//!
//! This crate provides the collection-oriented document API over the files
//! laid out by `schooldesk-storage`:
//! - Store: the explicit store handle with open and config loading
//! - Collection / DocumentRef / Query: set, get, delete, update and listing
//! - DocumentSnapshot / QuerySnapshot: read results
//! - BlobIndexed and SharedMap storage strategies, HiddenSet
//!
//! Reads never fail (absence or corruption reads as empty); writes return
//! their errors.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod collection;
pub mod database;
pub mod primitives;
pub mod snapshot;

pub use collection::{Collection, DocumentRef, Query};
pub use database::{Store, StoreConfig, StoreStats, CONFIG_FILE_NAME};
pub use primitives::{BlobIndexed, DocumentStorage, GameIndexEntry, HiddenSet, SharedMap};
pub use snapshot::{DocumentSnapshot, QueryDocumentSnapshot, QuerySnapshot};

pub use schooldesk_core::{
    fields, normalize_slug, CollectionKind, Direction, Document, Error, Result, StorageStrategy,
    Timestamp,
};
