//! Record Module
//!
//! Fixed-width on-disk encoding of a single (key, value) record.
//!
//! ## Block Format
//! ```text
//! ┌──────────────┬──────────────────────────────────────────┐
//! │ Key (4, BE)  │ Value (60, UTF-8, zero-padded)           │
//! └──────────────┴──────────────────────────────────────────┘
//! ```
//!
//! Every record occupies exactly [`RECORD_SIZE`] bytes, so a record's
//! location inside a region is always a multiple of 64.

mod codec;

pub use codec::{decode, encode, parse_key, Record, ValuePolicy};

/// Size of one encoded record
pub const RECORD_SIZE: usize = 64;

/// Size of the big-endian key prefix
pub const KEY_SIZE: usize = 4;

/// Maximum number of value bytes stored per record
pub const VALUE_SIZE: usize = RECORD_SIZE - KEY_SIZE;

/// One encoded record
pub type Block = [u8; RECORD_SIZE];
