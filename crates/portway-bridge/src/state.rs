//! Connection state machine.
//!
//! [`ConnectionState`] is the single source of truth for whether a device is
//! open. It is exclusively owned and mutated by the dispatcher; the device
//! handle inside it is lent to the reader loop behind a mutex for as long as
//! the reader runs.
//!
//! # Invariant
//!
//! A reader task exists if and only if the state is `Open`, and at most one
//! exists at any time. [`OpenConnection::shutdown`] enforces the teardown
//! ordering that keeps the invariant safe: cancellation flag, then read
//! interrupt, then join, and only then handle release. The reader can never
//! observe a released handle.

use crate::error::{BridgeError, Result};
use portway_core::BaudRate;
use portway_serial::{ReadInterrupt, SerialConnection};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tracing::debug;

/// The running reader task and its cancellation signal.
pub(crate) struct ReaderTask {
    pub(crate) cancel: Arc<AtomicBool>,
    pub(crate) handle: JoinHandle<()>,
}

/// Whether a device is open, and everything owned by an open device.
pub enum ConnectionState<C: SerialConnection> {
    /// No device open; no reader running.
    Closed,

    /// One device open; exactly one reader running against it.
    Open(OpenConnection<C>),
}

impl<C: SerialConnection> ConnectionState<C> {
    /// Whether a connection is currently open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self, ConnectionState::Open(_))
    }

    /// The open port's name, if any.
    #[must_use]
    pub fn port_name(&self) -> Option<&str> {
        match self {
            ConnectionState::Closed => None,
            ConnectionState::Open(open) => Some(open.port_name()),
        }
    }
}

/// Everything owned by one open connection: the shared device handle, the
/// interrupt handle for its blocked reads, and the reader task.
pub struct OpenConnection<C: SerialConnection> {
    port_name: String,
    baud: BaudRate,
    conn: Arc<Mutex<C>>,
    interrupter: Arc<dyn ReadInterrupt>,
    reader: ReaderTask,
}

impl<C: SerialConnection> OpenConnection<C> {
    pub(crate) fn new(
        port_name: String,
        baud: BaudRate,
        conn: Arc<Mutex<C>>,
        interrupter: Arc<dyn ReadInterrupt>,
        reader: ReaderTask,
    ) -> Self {
        OpenConnection {
            port_name,
            baud,
            conn,
            interrupter,
            reader,
        }
    }

    /// The port this connection is open on.
    #[must_use]
    pub fn port_name(&self) -> &str {
        &self.port_name
    }

    /// The rate the connection was opened at.
    #[must_use]
    pub fn baud(&self) -> BaudRate {
        self.baud
    }

    /// A clone of the shared device handle, for lending to blocking tasks.
    pub(crate) fn conn_handle(&self) -> Arc<Mutex<C>> {
        self.conn.clone()
    }

    /// Tear the connection down in the mandatory order: signal cancellation,
    /// interrupt any in-flight blocking read, wait for the reader task to
    /// fully exit, then release the device handle.
    ///
    /// Returns the port name for the `CLOSED` acknowledgement.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Join`] if the reader task panicked. The device
    /// handle is released regardless.
    pub async fn shutdown(self) -> Result<String> {
        debug!(port = %self.port_name, "Shutting down connection");

        self.reader.cancel.store(true, Ordering::SeqCst);
        self.interrupter.interrupt();
        self.reader
            .handle
            .await
            .map_err(|e| BridgeError::Join(e.to_string()))?;

        // The reader has exited, so this is the last reference to the handle
        drop(self.conn);
        Ok(self.port_name)
    }
}

impl<C: SerialConnection> std::fmt::Debug for OpenConnection<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenConnection")
            .field("port_name", &self.port_name)
            .field("baud", &self.baud)
            .finish()
    }
}
