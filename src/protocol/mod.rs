//! Protocol Module
//!
//! Defines the wire protocol for client-server communication.
//!
//! ## Protocol Format (V1 - Framed Binary)
//!
//! ### Request Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │ Cmd (1)  │ Len (4)  │   Payload (bincode Command) │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! ### Commands
//! - 0x01: LIST      - all index entries
//! - 0x02: SEARCH    - point lookup
//! - 0x03: INSERT    - new record (key as text)
//! - 0x04: UPDATE    - overwrite value
//! - 0x05: DELETE    - remove record
//! - 0x06: RESET     - bulk reseed
//! - 0x07: BENCHMARK - random lookup comparison counts
//! - 0x08: PING      - health check
//!
//! ### Response Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │Status(1) │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! ### Status Codes
//! - 0x00: OK        - payload is a bincode `Reply`
//! - 0x01: NOT_FOUND - payload is the error message
//! - 0x02: ERROR     - payload is the error message

mod command;
mod response;
mod codec;

pub use command::{Command, CommandType};
pub use response::{Reply, Response, Status};
pub use codec::{
    decode_command, decode_response, encode_command, encode_response, read_command,
    read_response, write_command, write_response, HEADER_SIZE, MAX_PAYLOAD_SIZE,
};
