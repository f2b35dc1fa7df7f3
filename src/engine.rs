//! Engine Module
//!
//! The record engine that coordinates the index and the storage regions.
//!
//! ## Responsibilities
//! - Route every operation through the index, then the regions
//! - Persist the index after every mutation that changes it
//! - Keep index and regions consistent
//! - Recover from a missing or corrupt index on startup

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::benchmark::{self, BenchmarkReport};
use crate::config::Config;
use crate::error::{BinIdxError, Result};
use crate::index::{IndexEntry, IndexStore, LoadOutcome};
use crate::protocol::{Command, Reply};
use crate::record::{self, Record};
use crate::storage::{Region, StorageManager};

/// A record located by `search`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoundRecord {
    pub key: i32,
    pub value: String,
    pub region: Region,
    pub offset: u64,
}

/// Result of a point lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Midpoints evaluated by the binary search
    pub comparisons: u32,

    /// The record, if the key exists
    pub record: Option<FoundRecord>,
}

impl SearchResult {
    pub fn found(&self) -> bool {
        self.record.is_some()
    }
}

/// The record engine
///
/// ## Concurrency Model
///
/// The engine has no internal locking. Lookups take `&self`, mutations take
/// `&mut self`, so the borrow checker keeps a single owner sequential.
/// Sharing it between connections requires an external lock around the
/// whole engine (see `network::Server`).
pub struct Engine {
    /// Engine configuration
    config: Config,

    /// Sorted index of every live record
    index: IndexStore,

    /// Primary and overflow regions
    storage: StorageManager,
}

impl Engine {
    // =========================================================================
    // Internal Path Constants
    // =========================================================================
    const INDEX_FILENAME: &'static str = "index.json";

    /// Open or create an engine with the given config
    ///
    /// On startup:
    /// 1. Create the data directory
    /// 2. Open both regions (created empty if absent)
    /// 3. Load the index
    /// 4. If the index was missing or unusable, start from an empty store
    pub fn open(config: Config) -> Result<Self> {
        // Step 1: Create data directory if it doesn't exist
        fs::create_dir_all(&config.data_dir)?;

        // Step 2: Open regions
        let storage = StorageManager::open(&config.data_dir)?;

        // Step 3: Load index
        let index_path = config.data_dir.join(Self::INDEX_FILENAME);
        let existed = index_path.exists();
        let (index, outcome) = IndexStore::load(&index_path);

        // Step 4: Recover to an empty store if needed
        match outcome {
            LoadOutcome::Loaded { entries } => {
                tracing::info!("Loaded index with {} entries", entries);
            }
            LoadOutcome::Recovered { reason } => {
                if existed {
                    tracing::warn!("Index unusable ({}), reinitializing empty store", reason);
                } else {
                    tracing::info!("No index found, initializing empty store");
                }
                storage.reset()?;
                index.persist()?;
            }
        }

        Ok(Self {
            config,
            index,
            storage,
        })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified data directory
    pub fn open_path(path: &Path) -> Result<Self> {
        let config = Config::builder().data_dir(path).build();
        Self::open(config)
    }

    /// Execute a command
    ///
    /// Routes commands to appropriate handlers
    pub fn execute(&mut self, command: Command) -> Result<Reply> {
        match command {
            Command::List => Ok(Reply::Index(self.get_all_index().to_vec())),
            Command::Search { key } => Ok(Reply::Search(self.search(key)?)),
            Command::Insert { key, value } => {
                self.insert_raw(&key, &value)?;
                Ok(Reply::Success)
            }
            Command::Update { key, value } => {
                self.update(key, &value)?;
                Ok(Reply::Success)
            }
            Command::Delete { key } => {
                self.remove(key)?;
                Ok(Reply::Success)
            }
            Command::Reset { count } => {
                let count = count.unwrap_or(self.config.bulk_reset_count);
                Ok(Reply::Reset {
                    count: self.bulk_reset(count)?,
                })
            }
            Command::Benchmark { iterations } => {
                let iterations = iterations.unwrap_or(self.config.benchmark_iterations);
                Ok(Reply::Benchmark(self.benchmark(iterations)?))
            }
            Command::Ping => Ok(Reply::Pong),
        }
    }

    /// All index entries in key order
    pub fn get_all_index(&self) -> &[IndexEntry] {
        self.index.entries()
    }

    /// Look up a key
    ///
    /// A missing key is not an error; only region I/O can fail.
    pub fn search(&self, key: i32) -> Result<SearchResult> {
        let outcome = self.index.binary_search(key);

        let Some(entry) = outcome.position.and_then(|p| self.index.get(p)) else {
            return Ok(SearchResult {
                comparisons: outcome.comparisons,
                record: None,
            });
        };

        let block = self.storage.read_block(entry.region, entry.offset)?;
        let record = record::decode(&block);

        Ok(SearchResult {
            comparisons: outcome.comparisons,
            record: Some(FoundRecord {
                key: record.key,
                value: record.value,
                region: entry.region,
                offset: entry.offset,
            }),
        })
    }

    /// Insert a new record
    ///
    /// Steps:
    /// 1. Reject duplicates
    /// 2. Append the block to overflow
    /// 3. Insert the index entry at its sorted position
    /// 4. Persist the index, undoing step 3 if that fails
    pub fn insert(&mut self, key: i32, value: &str) -> Result<()> {
        if self.index.binary_search(key).position.is_some() {
            return Err(BinIdxError::DuplicateKey(key));
        }

        let block = record::encode(key, value, self.config.value_policy)?;
        let offset = self.storage.append_block(Region::Overflow, &block)?;

        let position = self.index.insertion_point(key);
        self.index
            .insert_at(position, IndexEntry::new(key, Region::Overflow, offset))?;
        if let Err(e) = self.index.persist() {
            // The appended block stays orphaned, like a removed record's.
            self.index.remove_at(position)?;
            return Err(e);
        }

        tracing::debug!("Inserted key {} at overflow offset {}", key, offset);
        Ok(())
    }

    /// Insert with a key that still has to be parsed as an integer
    pub fn insert_raw(&mut self, key: &str, value: &str) -> Result<()> {
        let key = record::parse_key(key)?;
        self.insert(key, value)
    }

    /// Overwrite the value of an existing record in place
    ///
    /// The record stays in its region at its offset, so the index is not
    /// rewritten.
    pub fn update(&mut self, key: i32, value: &str) -> Result<()> {
        let entry = self.locate(key)?;

        let block = record::encode(key, value, self.config.value_policy)?;
        self.storage.write_block(entry.region, entry.offset, &block)?;

        tracing::debug!("Updated key {} in {} at offset {}", key, entry.region, entry.offset);
        Ok(())
    }

    /// Remove a record from the index
    ///
    /// Its block is left in place, unreferenced. If the index cannot be
    /// persisted the entry is restored and the error returned.
    pub fn remove(&mut self, key: i32) -> Result<()> {
        let position = self
            .index
            .binary_search(key)
            .position
            .ok_or(BinIdxError::KeyNotFound(key))?;

        let removed = self.index.remove_at(position)?;
        if let Err(e) = self.index.persist() {
            self.index.insert_at(position, removed)?;
            return Err(e);
        }

        tracing::debug!(
            "Removed key {} (orphaned block in {} at offset {})",
            key,
            removed.region,
            removed.offset
        );
        Ok(())
    }

    /// Replace all data with `count` random records
    pub fn bulk_reset(&mut self, count: usize) -> Result<usize> {
        self.bulk_reset_with_rng(count, &mut rand::rng())
    }

    /// Replace all data with `count` random records drawn from `rng`
    ///
    /// Keys are distinct, sampled from `1..=count * 10`.
    /// Steps:
    /// 1. Sample and sort the records
    /// 2. Stage the new primary next to the live one
    /// 3. Persist the new index (on failure the stage is discarded)
    /// 4. Rename the staged primary into place
    /// 5. Adopt the new index in memory and clear overflow
    ///
    /// Until step 4 the old index and old primary stay paired on disk; a
    /// failed rename re-persists the old index.
    pub fn bulk_reset_with_rng<R: Rng>(&mut self, count: usize, rng: &mut R) -> Result<usize> {
        if count > self.config.max_reset_count {
            return Err(BinIdxError::InvalidCount(count));
        }
        let records = generate_records(count, rng)?;

        let offsets = self
            .storage
            .stage_primary(&records, self.config.value_policy)?;
        let entries: Vec<IndexEntry> = records
            .iter()
            .zip(offsets)
            .map(|(r, offset)| IndexEntry::new(r.key, Region::Primary, offset))
            .collect();

        if let Err(e) = self.index.persist_snapshot(&entries) {
            if let Err(discard) = self.storage.discard_primary_stage() {
                tracing::warn!("Failed to discard staged primary: {}", discard);
            }
            return Err(e);
        }

        if let Err(e) = self.storage.commit_primary() {
            tracing::error!("Failed to commit primary, restoring previous index: {}", e);
            self.index.persist()?;
            if let Err(discard) = self.storage.discard_primary_stage() {
                tracing::warn!("Failed to discard staged primary: {}", discard);
            }
            return Err(e);
        }

        self.index.replace_all(entries)?;
        self.storage.clear_overflow()?;

        tracing::info!("Bulk reset loaded {} records into primary", records.len());
        Ok(records.len())
    }

    /// Benchmark lookups over `iterations` random existing keys
    pub fn benchmark(&self, iterations: usize) -> Result<BenchmarkReport> {
        self.benchmark_with_rng(iterations, &mut rand::rng())
    }

    /// Benchmark with a caller-supplied random source
    ///
    /// `iterations` above `max_benchmark_iterations` is `InvalidCount`.
    pub fn benchmark_with_rng<R: Rng>(&self, iterations: usize, rng: &mut R) -> Result<BenchmarkReport> {
        if iterations > self.config.max_benchmark_iterations {
            return Err(BinIdxError::InvalidCount(iterations));
        }
        benchmark::run(self, iterations, rng)
    }

    /// Close the engine gracefully
    ///
    /// Leaves a complete index file on disk.
    pub fn close(self) -> Result<()> {
        self.index.persist()?;
        tracing::info!("Engine closed with {} entries", self.index.len());
        Ok(())
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Get the data directory path
    pub fn data_dir(&self) -> &Path {
        &self.config.data_dir
    }

    /// Get the index file path
    pub fn index_path(&self) -> PathBuf {
        self.index.path().to_path_buf()
    }

    /// Get the path of a region file
    pub fn region_path(&self, region: Region) -> PathBuf {
        self.storage.region(region).path().to_path_buf()
    }

    /// Get the current length of a region in bytes
    pub fn region_len(&self, region: Region) -> Result<u64> {
        self.storage.region(region).len()
    }

    /// Get the number of live records
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Index entry for `key`, or `KeyNotFound`
    fn locate(&self, key: i32) -> Result<IndexEntry> {
        self.index
            .binary_search(key)
            .position
            .and_then(|p| self.index.get(p).copied())
            .ok_or(BinIdxError::KeyNotFound(key))
    }
}

/// Sample `count` distinct keys from `1..=count * 10`, sorted ascending
fn generate_records<R: Rng>(count: usize, rng: &mut R) -> Result<Vec<Record>> {
    let upper = count
        .checked_mul(10)
        .and_then(|n| i32::try_from(n).ok())
        .ok_or(BinIdxError::InvalidCount(count))?;

    let mut used = HashSet::with_capacity(count);
    let mut keys = Vec::with_capacity(count);
    while keys.len() < count {
        let key = rng.random_range(1..=upper);
        if used.insert(key) {
            keys.push(key);
        }
    }
    keys.sort_unstable();

    Ok(keys
        .into_iter()
        .map(|key| Record {
            key,
            value: format!("Value for {}", key),
        })
        .collect())
}
