//! Response definitions
//!
//! Represents responses to clients.

use serde::{Deserialize, Serialize};

use crate::benchmark::BenchmarkReport;
use crate::engine::SearchResult;
use crate::error::{BinIdxError, Result};
use crate::index::IndexEntry;

/// Response status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Status {
    Ok = 0x00,
    NotFound = 0x01,
    Error = 0x02,
}

/// Successful result of a command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Reply {
    /// All index entries (LIST)
    Index(Vec<IndexEntry>),

    /// Lookup result (SEARCH)
    Search(SearchResult),

    /// INSERT / UPDATE / DELETE succeeded
    Success,

    /// Records written (RESET)
    Reset { count: usize },

    /// Benchmark aggregate (BENCHMARK)
    Benchmark(BenchmarkReport),

    /// PING answer
    Pong,
}

/// A response to send to client
#[derive(Debug, Clone)]
pub struct Response {
    /// Status code
    pub status: Status,

    /// Optional payload (bincode reply for OK, error message otherwise)
    pub payload: Option<Vec<u8>>,
}

impl Response {
    /// Create an OK response carrying `reply`
    pub fn ok(reply: &Reply) -> Result<Self> {
        Ok(Self {
            status: Status::Ok,
            payload: Some(bincode::serialize(reply)?),
        })
    }

    /// Create a NOT_FOUND response
    pub fn not_found(message: &str) -> Self {
        Self {
            status: Status::NotFound,
            payload: Some(message.as_bytes().to_vec()),
        }
    }

    /// Create an ERROR response
    pub fn error(message: &str) -> Self {
        Self {
            status: Status::Error,
            payload: Some(message.as_bytes().to_vec()),
        }
    }

    /// Map an engine result onto a response
    pub fn from_result(result: Result<Reply>) -> Self {
        match result.and_then(|reply| Response::ok(&reply)) {
            Ok(response) => response,
            Err(e @ BinIdxError::KeyNotFound(_)) => Response::not_found(&e.to_string()),
            Err(e) => Response::error(&e.to_string()),
        }
    }

    /// Decode the reply of an OK response
    pub fn reply(&self) -> Result<Reply> {
        match self.status {
            Status::Ok => {
                let payload = self.payload.as_deref().unwrap_or(&[]);
                Ok(bincode::deserialize(payload)?)
            }
            Status::NotFound | Status::Error => Err(BinIdxError::Protocol(self.message())),
        }
    }

    /// Error message carried by a NOT_FOUND or ERROR response
    pub fn message(&self) -> String {
        self.payload
            .as_deref()
            .map(|p| String::from_utf8_lossy(p).into_owned())
            .unwrap_or_default()
    }
}
