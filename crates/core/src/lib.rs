//! Core types for schooldesk
//!
//! This crate defines the foundational types used throughout the system:
//! - CollectionKind: the fixed set of collections and their storage strategy
//! - Document: JSON object documents plus field helpers
//! - Timestamp: millisecond timestamps stored in documents
//! - Slug normalization and id validation
//! - Error: Error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod contract;
pub mod document;
pub mod error;
pub mod slug;
pub mod types;

pub use contract::Timestamp;
pub use document::{fields, Document};
pub use error::{Error, Result};
pub use slug::{normalize_slug, validate_id, MAX_ID_LENGTH};
pub use types::{CollectionKind, Direction, StorageStrategy};
