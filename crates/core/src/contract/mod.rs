//! Contract types shared by every layer
//!
//! - `timestamp`: millisecond timestamps stored in `createdAt` / `updatedAt`

pub mod timestamp;

pub use timestamp::Timestamp;
