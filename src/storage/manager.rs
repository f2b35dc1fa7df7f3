//! Storage Manager
//!
//! Owns the primary and overflow regions and routes block I/O by region tag.
//!
//! ## Responsibilities
//! - Create both region files on startup if absent
//! - Read/overwrite blocks in either region
//! - Append incremental inserts to overflow
//! - Rebuild primary on bulk reset

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::record::{self, Block, Record, ValuePolicy, RECORD_SIZE};

use super::{Region, RegionFile};

/// Manages the two storage regions
pub struct StorageManager {
    /// Directory holding both region files
    data_dir: PathBuf,

    /// Bulk-loaded region
    primary: RegionFile,

    /// Append-only region
    overflow: RegionFile,
}

impl StorageManager {
    // =========================================================================
    // Internal Path Constants
    // =========================================================================
    pub const PRIMARY_FILENAME: &'static str = "main.db";
    pub const OVERFLOW_FILENAME: &'static str = "overflow.db";

    /// Open or create both regions in the given directory
    pub fn open(path: &Path) -> Result<Self> {
        fs::create_dir_all(path)?;

        let primary = RegionFile::open(&path.join(Self::PRIMARY_FILENAME))?;
        let overflow = RegionFile::open(&path.join(Self::OVERFLOW_FILENAME))?;

        Ok(Self {
            data_dir: path.to_path_buf(),
            primary,
            overflow,
        })
    }

    /// Read the block at `offset` in `region`
    pub fn read_block(&self, region: Region, offset: u64) -> Result<Block> {
        self.region(region).read_block(offset)
    }

    /// Overwrite the block at `offset` in `region`
    pub fn write_block(&self, region: Region, offset: u64, block: &Block) -> Result<()> {
        self.region(region).write_block(offset, block)
    }

    /// Append a block to `region`, returning its offset
    pub fn append_block(&self, region: Region, block: &Block) -> Result<u64> {
        self.region(region).append_block(block)
    }

    /// Rewrite primary with `records`, which must already be sorted by key
    ///
    /// Returns the offset assigned to each record, in input order.
    pub fn rewrite_primary(&self, records: &[Record], policy: ValuePolicy) -> Result<Vec<u64>> {
        let offsets = self.stage_primary(records, policy)?;
        self.commit_primary()?;
        Ok(offsets)
    }

    /// Write `records` to the primary staging file without replacing primary
    ///
    /// Returns the offset each record will have once committed.
    pub fn stage_primary(&self, records: &[Record], policy: ValuePolicy) -> Result<Vec<u64>> {
        let blocks = records
            .iter()
            .map(|r| record::encode(r.key, &r.value, policy))
            .collect::<Result<Vec<_>>>()?;

        let written = self.primary.stage(blocks)?;
        tracing::debug!("Staged primary region with {} records", written);

        Ok((0..written).map(|i| i * RECORD_SIZE as u64).collect())
    }

    /// Replace primary with the staged content
    pub fn commit_primary(&self) -> Result<()> {
        self.primary.commit_staged()?;
        tracing::debug!("Committed staged primary region");
        Ok(())
    }

    /// Drop the staged primary, leaving the live region untouched
    pub fn discard_primary_stage(&self) -> Result<()> {
        self.primary.discard_staged()
    }

    /// Truncate overflow to empty
    pub fn clear_overflow(&self) -> Result<()> {
        self.overflow.clear()
    }

    /// Truncate both regions to empty
    pub fn reset(&self) -> Result<()> {
        self.primary.clear()?;
        self.overflow.clear()
    }

    /// Get the handle for a region
    pub fn region(&self, region: Region) -> &RegionFile {
        match region {
            Region::Primary => &self.primary,
            Region::Overflow => &self.overflow,
        }
    }

    /// Get the data directory path
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
