//! Storage Module
//!
//! Two flat region files holding consecutive 64-byte record blocks.
//!
//! ## Responsibilities
//! - Primary region: written once, in key order, by a bulk reset
//! - Overflow region: append-only target of incremental inserts
//! - In-place block overwrite for updates
//!
//! ## File Format
//! ```text
//! ┌────────────┬────────────┬────────────┬─────┐
//! │ Block 0    │ Block 1    │ Block 2    │ ... │
//! │ offset 0   │ offset 64  │ offset 128 │     │
//! └────────────┴────────────┴────────────┴─────┘
//! ```
//! No header, magic or version. Deleted records stay in place as
//! unreferenced blocks.

mod region;
mod manager;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use region::RegionFile;
pub use manager::StorageManager;

/// Which region a record lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    /// Bulk-loaded, densely packed, key-sorted region
    #[serde(rename = "main")]
    Primary,

    /// Append-only region for incremental inserts
    #[serde(rename = "overflow")]
    Overflow,
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::Primary => write!(f, "primary"),
            Region::Overflow => write!(f, "overflow"),
        }
    }
}
