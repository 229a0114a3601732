//! schooldesk - local document store for the school platform
//!
//! A filesystem-backed stand-in for a hosted document database. Games,
//! assistants and homework are stored under one root directory and read back
//! through a small collection/document/query API.
//!
//! # Quick Start
//!
//! ```ignore
//! use schooldesk::{Direction, Store};
//!
//! let store = Store::open("lib/Games")?;
//! let games = store.collection("games")?;
//!
//! games.doc("pong")?.set(doc)?;
//! let newest_first = games.order_by("createdAt", Direction::Descending).get();
//! ```
//!
//! # Architecture
//!
//! Everything goes through [`Store`]. Storage layout (`schooldesk-storage`)
//! and id/value types (`schooldesk-core`) are reachable through the engine's
//! re-exports; nothing else is public.

// Re-export the public API from schooldesk-engine
pub use schooldesk_engine::*;
