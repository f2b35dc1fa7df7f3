//! Index Store
//!
//! Sorted `Vec` of [`IndexEntry`] plus its backing file.

use std::cmp::Ordering;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{BinIdxError, Result};
use crate::record::RECORD_SIZE;

use super::{IndexEntry, SearchOutcome};

/// How `IndexStore::load` obtained its entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Persisted file read and validated
    Loaded { entries: usize },

    /// File missing, unreadable or invalid; store starts empty
    Recovered { reason: String },
}

/// Ordered index of all records
///
/// ## Invariant
/// `entries` is strictly ascending by key at every point where another
/// method can observe it.
#[derive(Debug)]
pub struct IndexStore {
    /// Index file path
    path: PathBuf,

    /// Entries sorted by key
    entries: Vec<IndexEntry>,
}

impl IndexStore {
    /// Create an empty store backed by `path` (nothing is written yet)
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            entries: Vec::new(),
        }
    }

    /// Load the store from `path`
    ///
    /// Never fails: any problem with the file yields an empty store and a
    /// `Recovered` outcome; the caller decides how to reinitialize storage.
    pub fn load(path: &Path) -> (Self, LoadOutcome) {
        match Self::read_entries(path) {
            Ok(entries) => {
                let count = entries.len();
                let store = Self {
                    path: path.to_path_buf(),
                    entries,
                };
                (store, LoadOutcome::Loaded { entries: count })
            }
            Err(e) => (Self::new(path), LoadOutcome::Recovered { reason: e.to_string() }),
        }
    }

    /// Write the full entry sequence to disk
    ///
    /// Written to a sibling temp file, synced, then renamed into place.
    pub fn persist(&self) -> Result<()> {
        self.persist_snapshot(&self.entries)
    }

    /// Write `entries` to the index file without adopting them in memory
    ///
    /// Used to make a replacement durable before committing it.
    pub fn persist_snapshot(&self, entries: &[IndexEntry]) -> Result<()> {
        validate(entries)?;
        let tmp_path = self.path.with_extension("json.tmp");

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&tmp_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, entries)?;
        writer.flush()?;

        let file = writer.into_inner().map_err(|e| {
            BinIdxError::Storage(format!("Failed to flush index: {}", e))
        })?;
        file.sync_all()?;
        drop(file);

        fs::rename(&tmp_path, &self.path)?;
        tracing::trace!("Persisted index with {} entries", entries.len());
        Ok(())
    }

    /// Binary search for `key`, counting every midpoint evaluated
    pub fn binary_search(&self, key: i32) -> SearchOutcome {
        let mut comparisons = 0;
        if self.entries.is_empty() {
            return SearchOutcome {
                position: None,
                comparisons,
            };
        }

        // Signed bounds so `right` can drop below `left` at position 0.
        let mut left: isize = 0;
        let mut right: isize = self.entries.len() as isize - 1;

        while left <= right {
            comparisons += 1;
            let mid = (left + right) / 2;
            match self.entries[mid as usize].key.cmp(&key) {
                Ordering::Equal => {
                    return SearchOutcome {
                        position: Some(mid as usize),
                        comparisons,
                    }
                }
                Ordering::Less => left = mid + 1,
                Ordering::Greater => right = mid - 1,
            }
        }

        SearchOutcome {
            position: None,
            comparisons,
        }
    }

    /// Position at which `key` would have to be inserted to keep order
    pub fn insertion_point(&self, key: i32) -> usize {
        let mut left = 0;
        let mut right = self.entries.len();
        while left < right {
            let mid = left + (right - left) / 2;
            if self.entries[mid].key < key {
                left = mid + 1;
            } else {
                right = mid;
            }
        }
        left
    }

    /// Insert `entry` at `position`
    ///
    /// Rejects positions that would break strict ordering.
    pub fn insert_at(&mut self, position: usize, entry: IndexEntry) -> Result<()> {
        if position > self.entries.len() {
            return Err(BinIdxError::Storage(format!(
                "Insert position {} out of bounds ({} entries)",
                position,
                self.entries.len()
            )));
        }

        let after_prev = position == 0 || self.entries[position - 1].key < entry.key;
        let before_next = position == self.entries.len() || entry.key < self.entries[position].key;
        if !(after_prev && before_next) {
            return Err(BinIdxError::Storage(format!(
                "Key {} does not belong at index position {}",
                entry.key, position
            )));
        }

        self.entries.insert(position, entry);
        Ok(())
    }

    /// Remove and return the entry at `position`
    pub fn remove_at(&mut self, position: usize) -> Result<IndexEntry> {
        if position >= self.entries.len() {
            return Err(BinIdxError::Storage(format!(
                "Remove position {} out of bounds ({} entries)",
                position,
                self.entries.len()
            )));
        }
        Ok(self.entries.remove(position))
    }

    /// Replace every entry; `entries` must already be strictly ascending
    pub fn replace_all(&mut self, entries: Vec<IndexEntry>) -> Result<()> {
        validate(&entries)?;
        self.entries = entries;
        Ok(())
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entry at `position`
    pub fn get(&self, position: usize) -> Option<&IndexEntry> {
        self.entries.get(position)
    }

    /// All entries in key order
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn read_entries(path: &Path) -> Result<Vec<IndexEntry>> {
        let file = File::open(path)?;
        let entries: Vec<IndexEntry> = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| BinIdxError::IndexCorrupt(e.to_string()))?;
        validate(&entries)?;
        Ok(entries)
    }
}

/// Check ordering and block alignment of a full entry sequence
fn validate(entries: &[IndexEntry]) -> Result<()> {
    for pair in entries.windows(2) {
        if pair[0].key >= pair[1].key {
            return Err(BinIdxError::IndexCorrupt(format!(
                "keys out of order: {} before {}",
                pair[0].key, pair[1].key
            )));
        }
    }

    if let Some(entry) = entries.iter().find(|e| e.offset % RECORD_SIZE as u64 != 0) {
        return Err(BinIdxError::IndexCorrupt(format!(
            "unaligned offset {} for key {}",
            entry.offset, entry.key
        )));
    }

    Ok(())
}
