//! Collaborator trait definitions for serial devices.
//!
//! These traits establish the contract between the bridge core and the
//! device layer, enabling substitution between the `serialport`-backed
//! system implementation and the mock implementations used in tests.
//!
//! The connection trait is synchronous: the system backend's I/O is
//! blocking, and the bridge runs it on dedicated blocking tasks. What the
//! contract does require is that every read is *bounded*: a connection is
//! opened with a read timeout, and a read that outlives it returns
//! [`PortError::Timeout`] instead of blocking forever.

use crate::error::Result;
use portway_core::{BaudRate, PortInfo};
use std::sync::Arc;
use std::time::Duration;

/// One open serial device.
///
/// The handle is exclusively owned by whoever opened it; the bridge lends it
/// to its reader loop behind a mutex. Reads and writes may both block, each
/// bounded by the timeout the connection was opened with.
pub trait SerialConnection: Send {
    /// Read available bytes into `buf`.
    ///
    /// Returns the number of bytes read. `Ok(0)` means the device reported
    /// end of stream (closed or unplugged); an idle interval elapses as
    /// [`PortError::Timeout`].
    ///
    /// # Errors
    ///
    /// Returns [`PortError::Timeout`] when the bounded wait elapses without
    /// data, and a non-timeout error when the device fails.
    ///
    /// [`PortError::Timeout`]: crate::PortError::Timeout
    fn read(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Write all of `data` to the device and flush it.
    ///
    /// # Errors
    ///
    /// Returns an error if the device rejects or truncates the write.
    fn write_all(&mut self, data: &[u8]) -> Result<()>;

    /// The device path this connection was opened on.
    fn name(&self) -> &str;
}

/// Wakes a read blocked on a connection.
///
/// Obtained alongside the connection at open time and usable from any
/// thread, without holding whatever lock guards the connection itself. An
/// interrupted read returns [`PortError::Timeout`], after which the caller
/// re-checks its cancellation state.
///
/// Implementations that cannot actively wake a read (the system backend;
/// the `serialport` crate has no cross-thread cancellation) may make this a
/// no-op; the bounded read timeout then caps the wake-up latency instead.
///
/// [`PortError::Timeout`]: crate::PortError::Timeout
pub trait ReadInterrupt: Send + Sync + std::fmt::Debug {
    /// Wake any read currently blocked on the associated connection.
    fn interrupt(&self);
}

/// Acquires serial connections.
///
/// The device-acquisition half of the external collaborator contract.
pub trait PortOpener {
    /// The connection type this opener produces.
    type Conn: SerialConnection + 'static;

    /// Open `port` at `baud` with the given bounded read timeout.
    ///
    /// Returns the connection and its interrupt handle.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::NotFound`] when no such device exists and
    /// [`PortError::OpenFailed`] when the device cannot be acquired.
    ///
    /// [`PortError::NotFound`]: crate::PortError::NotFound
    /// [`PortError::OpenFailed`]: crate::PortError::OpenFailed
    fn open(
        &self,
        port: &str,
        baud: BaudRate,
        timeout: Duration,
    ) -> Result<(Self::Conn, Arc<dyn ReadInterrupt>)>;
}

/// Lists available serial devices.
///
/// Returns a snapshot of currently attached devices at call time, not a
/// live view. No ordering guarantee beyond "stable for a single call".
pub trait PortEnumerator {
    /// Enumerate currently attached serial devices.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::Enumeration`] when the platform query fails.
    ///
    /// [`PortError::Enumeration`]: crate::PortError::Enumeration
    fn ports(&self) -> Result<Vec<PortInfo>>;
}
