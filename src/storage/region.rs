//! Region File
//!
//! A single byte-addressable file of 64-byte blocks. Every call opens the
//! file, performs exactly one read or write, and closes it again.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::error::{BinIdxError, Result};
use crate::record::{Block, RECORD_SIZE};

/// Handle to one region file on disk
#[derive(Debug, Clone)]
pub struct RegionFile {
    path: PathBuf,
}

impl RegionFile {
    /// Open a region, creating an empty file if none exists
    ///
    /// Existing content is left untouched.
    pub fn open(path: &Path) -> Result<Self> {
        OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// Read the block stored at `offset`
    ///
    /// A region shorter than `offset + 64` is an error (`UnexpectedEof`).
    pub fn read_block(&self, offset: u64) -> Result<Block> {
        let mut file = File::open(&self.path)?;
        file.seek(SeekFrom::Start(offset))?;

        let mut block = [0u8; RECORD_SIZE];
        file.read_exact(&mut block)?;
        Ok(block)
    }

    /// Overwrite the block at `offset`
    ///
    /// `offset` must be block-aligned and no further than the current end
    /// of the region. Only these 64 bytes are touched.
    pub fn write_block(&self, offset: u64, block: &Block) -> Result<()> {
        if offset % RECORD_SIZE as u64 != 0 {
            return Err(BinIdxError::Storage(format!(
                "Unaligned block offset {} in {}",
                offset,
                self.path.display()
            )));
        }

        let mut file = OpenOptions::new().read(true).write(true).open(&self.path)?;
        let len = file.metadata()?.len();
        if offset > len {
            return Err(BinIdxError::Storage(format!(
                "Block offset {} past end of {} ({} bytes)",
                offset,
                self.path.display(),
                len
            )));
        }

        file.seek(SeekFrom::Start(offset))?;
        file.write_all(block)?;
        file.flush()?;
        Ok(())
    }

    /// Append a block at the current end and return the offset it was written at
    pub fn append_block(&self, block: &Block) -> Result<u64> {
        let mut file = OpenOptions::new().write(true).open(&self.path)?;
        let offset = file.metadata()?.len();

        file.seek(SeekFrom::Start(offset))?;
        file.write_all(block)?;
        file.flush()?;
        Ok(offset)
    }

    /// Replace the whole region with `blocks`, block i landing at `i * 64`
    pub fn rewrite(&self, blocks: impl IntoIterator<Item = Block>) -> Result<u64> {
        let written = self.stage(blocks)?;
        self.commit_staged()?;
        Ok(written)
    }

    /// Write `blocks` to the staging sibling, leaving the live region untouched
    ///
    /// The staged content only replaces the region on `commit_staged`.
    pub fn stage(&self, blocks: impl IntoIterator<Item = Block>) -> Result<u64> {
        let staged_path = self.staged_path();
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&staged_path)?;

        let mut writer = BufWriter::new(file);
        let mut written = 0u64;
        for block in blocks {
            writer.write_all(&block)?;
            written += 1;
        }
        writer.flush()?;

        let file = writer.into_inner().map_err(|e| {
            BinIdxError::Storage(format!("Failed to flush {}: {}", staged_path.display(), e))
        })?;
        file.sync_all()?;

        Ok(written)
    }

    /// Atomically replace the region with the staged content
    pub fn commit_staged(&self) -> Result<()> {
        fs::rename(self.staged_path(), &self.path)?;
        Ok(())
    }

    /// Remove any staged content without touching the region
    pub fn discard_staged(&self) -> Result<()> {
        match fs::remove_file(self.staged_path()) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Sibling path used by `stage` (`main.db` → `main.db.tmp`)
    pub fn staged_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }

    /// Truncate the region to zero length
    pub fn clear(&self) -> Result<()> {
        let file = OpenOptions::new().write(true).open(&self.path)?;
        file.set_len(0)?;
        file.sync_all()?;
        Ok(())
    }

    /// Current length in bytes
    pub fn len(&self) -> Result<u64> {
        Ok(fs::metadata(&self.path)?.len())
    }

    /// Whether the region holds no bytes
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }
}
