//! Error types for BinIdx
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using BinIdxError
pub type Result<T> = std::result::Result<T, BinIdxError>;

/// Unified error type for BinIdx operations
#[derive(Debug, Error)]
pub enum BinIdxError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Record Errors
    // -------------------------------------------------------------------------
    #[error("Key must be an integer: {0:?}")]
    InvalidKey(String),

    #[error("Key already exists: {0}")]
    DuplicateKey(i32),

    #[error("Key not found: {0}")]
    KeyNotFound(i32),

    #[error("Value too long: {len} bytes (max {max})")]
    ValueTooLong { len: usize, max: usize },

    #[error("Invalid record count: {0}")]
    InvalidCount(usize),

    #[error("Database is empty")]
    EmptyStore,

    // -------------------------------------------------------------------------
    // Index / Storage Errors
    // -------------------------------------------------------------------------
    #[error("Index corrupt: {0}")]
    IndexCorrupt(String),

    #[error("Storage error: {0}")]
    Storage(String),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Network Errors
    // -------------------------------------------------------------------------
    #[error("Network error: {0}")]
    Network(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for BinIdxError {
    fn from(e: serde_json::Error) -> Self {
        BinIdxError::Serialization(e.to_string())
    }
}

impl From<bincode::Error> for BinIdxError {
    fn from(e: bincode::Error) -> Self {
        BinIdxError::Serialization(e.to_string())
    }
}
