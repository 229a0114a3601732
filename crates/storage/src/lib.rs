//! Storage layer for schooldesk
//!
//! This crate owns the on-disk representation:
//! - StorePaths: where each file lives under the store root
//! - Lenient JSON/text reads that treat absence or corruption as empty
//! - Strict writes, in place or via write-fsync-rename

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod file;
pub mod paths;

pub use file::{
    read_json_or_default, read_text_or_empty, remove_quietly, write_json, write_text, WriteOptions,
};
pub use paths::{
    StorePaths, CONFIG_FILE, GAMES_INDEX_FILE, HIDDEN_FILE, PAYLOAD_EXTENSION, SHARED_MAP_FILE,
};
