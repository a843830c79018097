//! Error types for bridge command handling.
//!
//! Every variant here is a per-command failure: the dispatcher converts it
//! into an `ERROR` event at the command boundary and keeps running. None of
//! these terminate the process.

use portway_serial::PortError;
use thiserror::Error;

/// Result type alias for bridge operations.
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Errors that can occur while handling one command.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// `OPEN` was given an empty port name.
    #[error("Port name must not be empty")]
    EmptyPortName,

    /// `OPEN` while a connection is already open. Re-opening over an active
    /// connection is rejected rather than silently replacing the handle.
    #[error("Connection already open on {0}")]
    AlreadyOpen(String),

    /// `CLOSE` or `WRITE` with no open connection.
    #[error("No open connection")]
    NotOpen,

    /// `WRITE` payload did not decode as hex.
    #[error("Invalid hex payload: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// The device layer failed.
    #[error(transparent)]
    Port(#[from] PortError),

    /// A blocking task backing the command could not be joined.
    #[error("Reader task failed: {0}")]
    Join(String),
}
