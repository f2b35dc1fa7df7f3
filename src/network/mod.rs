//! Network Module
//!
//! TCP server and client handling.
//!
//! ## Architecture
//! - Single acceptor thread
//! - Fixed worker pool fed over a bounded channel
//! - Every command runs under one engine-wide lock

mod server;
mod connection;

pub use server::{Server, ShutdownHandle};
pub use connection::Connection;
