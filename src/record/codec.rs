//! Record codec
//!
//! Encoding and decoding between `(key, value)` pairs and 64-byte blocks.

use serde::{Deserialize, Serialize};

use crate::error::{BinIdxError, Result};

use super::{Block, KEY_SIZE, RECORD_SIZE, VALUE_SIZE};

/// A decoded record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub key: i32,
    pub value: String,
}

/// How to handle values whose UTF-8 encoding exceeds [`VALUE_SIZE`] bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValuePolicy {
    /// Keep as many whole characters as fit (the historical behavior)
    #[default]
    Truncate,

    /// Fail with `ValueTooLong`
    Reject,
}

/// Encode a record into a block
///
/// Format: key (4, big-endian) + value bytes + zero padding
pub fn encode(key: i32, value: &str, policy: ValuePolicy) -> Result<Block> {
    let bytes = value.as_bytes();
    let stored = if bytes.len() <= VALUE_SIZE {
        bytes
    } else {
        match policy {
            ValuePolicy::Reject => {
                return Err(BinIdxError::ValueTooLong {
                    len: bytes.len(),
                    max: VALUE_SIZE,
                })
            }
            ValuePolicy::Truncate => &bytes[..char_boundary_at_or_below(value, VALUE_SIZE)],
        }
    };

    let mut block = [0u8; RECORD_SIZE];
    block[..KEY_SIZE].copy_from_slice(&key.to_be_bytes());
    block[KEY_SIZE..KEY_SIZE + stored.len()].copy_from_slice(stored);
    Ok(block)
}

/// Decode a block into a record
///
/// All NUL characters are dropped from the value, not only the padding.
pub fn decode(block: &Block) -> Record {
    let key = i32::from_be_bytes([block[0], block[1], block[2], block[3]]);
    let value = String::from_utf8_lossy(&block[KEY_SIZE..])
        .chars()
        .filter(|&c| c != '\0')
        .collect();
    Record { key, value }
}

/// Parse a client-supplied key
///
/// Leading whitespace and an optional sign are accepted, then a `0x`/`0X`
/// prefix selects hexadecimal. The longest run of digits in that radix is
/// taken; anything after it is ignored.
pub fn parse_key(input: &str) -> Result<i32> {
    let invalid = || BinIdxError::InvalidKey(input.to_string());

    let trimmed = input.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let (radix, rest) = match rest.get(..2) {
        Some("0x") | Some("0X") => (16, &rest[2..]),
        _ => (10, rest),
    };

    let digits_len = rest
        .bytes()
        .take_while(|b| char::from(*b).is_digit(radix))
        .count();
    if digits_len == 0 {
        return Err(invalid());
    }

    let magnitude = i64::from_str_radix(&rest[..digits_len], radix).map_err(|_| invalid())?;
    let signed = if negative { -magnitude } else { magnitude };

    i32::try_from(signed).map_err(|_| invalid())
}

/// Largest char boundary of `s` that is <= `limit`
fn char_boundary_at_or_below(s: &str, limit: usize) -> usize {
    let mut end = limit.min(s.len());
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    end
}
