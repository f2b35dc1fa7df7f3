//! Index Module
//!
//! In-memory sorted index mapping each key to its block location, persisted
//! as a JSON side file.
//!
//! ## Responsibilities
//! - Keep entries strictly ascending by key (enables binary search)
//! - Binary search with exact comparison counting
//! - Lower-bound insertion point for new keys
//! - Full-snapshot persistence after every mutation
//!
//! ## File Format
//! ```text
//! [
//!   { "key": 17, "file": "main",     "offset": 0  },
//!   { "key": 42, "file": "overflow", "offset": 64 }
//! ]
//! ```

mod entry;
mod store;

pub use entry::{IndexEntry, SearchOutcome};
pub use store::{IndexStore, LoadOutcome};
