//! Collection identity types
//!
//! The store knows exactly three collections. Each one is bound to a storage
//! strategy when the kind is resolved, so callers never branch on names.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// The fixed set of collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CollectionKind {
    /// Games: metadata in the index file, HTML payload in one file per game
    Games,
    /// AI-assistant embeds, stored in the shared map
    Assistants,
    /// Homework listings, stored in the shared map
    Homework,
}

/// How a collection lays its documents out on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageStrategy {
    /// Per-collection index file plus one payload file per document
    BlobIndexed,
    /// All documents inline in the shared JSON map, keyed by collection name
    SharedMap,
}

impl CollectionKind {
    /// Every collection, in display order
    pub const ALL: [CollectionKind; 3] = [
        CollectionKind::Games,
        CollectionKind::Assistants,
        CollectionKind::Homework,
    ];

    /// Collection name as used by callers and on disk
    pub const fn name(&self) -> &'static str {
        match self {
            CollectionKind::Games => "games",
            CollectionKind::Assistants => "assistants",
            CollectionKind::Homework => "homework",
        }
    }

    /// Storage strategy this collection is bound to
    pub const fn strategy(&self) -> StorageStrategy {
        match self {
            CollectionKind::Games => StorageStrategy::BlobIndexed,
            CollectionKind::Assistants | CollectionKind::Homework => StorageStrategy::SharedMap,
        }
    }

    /// Name of the field holding the document's markup payload
    pub const fn payload_field(&self) -> &'static str {
        match self {
            CollectionKind::Games => "html",
            CollectionKind::Assistants => "embedHtml",
            CollectionKind::Homework => "description",
        }
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CollectionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "games" => Ok(CollectionKind::Games),
            "assistants" => Ok(CollectionKind::Assistants),
            "homework" => Ok(CollectionKind::Homework),
            other => Err(Error::UnsupportedCollection(other.to_string())),
        }
    }
}

/// Sort direction for collection listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Smallest value first
    Ascending,
    /// Largest value first
    #[default]
    Descending,
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "asc" => Ok(Direction::Ascending),
            "desc" => Ok(Direction::Descending),
            other => Err(Error::config(format!(
                "Invalid sort direction '{}'. Expected \"asc\" or \"desc\".",
                other
            ))),
        }
    }
}
