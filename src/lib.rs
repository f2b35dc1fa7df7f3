//! # BinIdx
//!
//! A small record store mapping `i32` keys to short text values with:
//! - Fixed 64-byte records in two flat region files
//! - A primary region bulk-loaded in key order
//! - An append-only overflow region for incremental inserts
//! - An in-memory sorted index with comparison-counted binary search
//! - TCP-based client protocol
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TCP Server                              │
//! │              (Worker pool, one lock per command)             │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                      Engine                                  │
//! │     search / insert / update / remove / bulk reset           │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌──────────────────┐
//!   │    Index    │          │     Storage      │
//!   │ (sorted Vec)│          │ primary/overflow │
//!   └──────┬──────┘          └────────┬─────────┘
//!          │                          │
//!          ▼                          ▼
//!     index.json              main.db / overflow.db
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod record;
pub mod index;
pub mod storage;
pub mod engine;
pub mod benchmark;
pub mod network;
pub mod protocol;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{BinIdxError, Result};
pub use config::Config;
pub use engine::Engine;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of BinIdx
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
