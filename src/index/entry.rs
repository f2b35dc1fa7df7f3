//! Index entry definitions

use serde::{Deserialize, Serialize};

use crate::storage::Region;

/// Location of one record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Record key (unique across the store)
    pub key: i32,

    /// Region holding the record
    #[serde(rename = "file")]
    pub region: Region,

    /// Byte offset of the record within its region
    pub offset: u64,
}

impl IndexEntry {
    pub fn new(key: i32, region: Region, offset: u64) -> Self {
        Self {
            key,
            region,
            offset,
        }
    }
}

/// Result of a binary search over the index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Position of the key, if present
    pub position: Option<usize>,

    /// Number of midpoints evaluated
    pub comparisons: u32,
}
