//! Command definitions
//!
//! Represents commands from clients.

use serde::{Deserialize, Serialize};

/// Command types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CommandType {
    List = 0x01,
    Search = 0x02,
    Insert = 0x03,
    Update = 0x04,
    Delete = 0x05,
    Reset = 0x06,
    Benchmark = 0x07,
    Ping = 0x08,
}

impl CommandType {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x01 => Some(CommandType::List),
            0x02 => Some(CommandType::Search),
            0x03 => Some(CommandType::Insert),
            0x04 => Some(CommandType::Update),
            0x05 => Some(CommandType::Delete),
            0x06 => Some(CommandType::Reset),
            0x07 => Some(CommandType::Benchmark),
            0x08 => Some(CommandType::Ping),
            _ => None,
        }
    }
}

/// A parsed command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// List every index entry
    List,

    /// Look up a key
    Search { key: i32 },

    /// Insert a record; the key is parsed by the engine
    Insert { key: String, value: String },

    /// Overwrite an existing record
    Update { key: i32, value: String },

    /// Remove a record
    Delete { key: i32 },

    /// Reseed with random records (server default count if `None`)
    Reset { count: Option<usize> },

    /// Run a lookup benchmark (server default iterations if `None`)
    Benchmark { iterations: Option<usize> },

    /// Ping (health check)
    Ping,
}

impl Command {
    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::List => CommandType::List,
            Command::Search { .. } => CommandType::Search,
            Command::Insert { .. } => CommandType::Insert,
            Command::Update { .. } => CommandType::Update,
            Command::Delete { .. } => CommandType::Delete,
            Command::Reset { .. } => CommandType::Reset,
            Command::Benchmark { .. } => CommandType::Benchmark,
            Command::Ping => CommandType::Ping,
        }
    }
}
