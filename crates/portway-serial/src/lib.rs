//! Serial device abstraction layer for the Portway bridge.
//!
//! This crate defines the bridge's two external collaborators as traits,
//! the open connection handle and the port enumerator, together with the
//! production implementation backed by the `serialport` crate and a
//! programmable mock for development and testing.
//!
//! # Design Philosophy
//!
//! - **Blocking by design**: serial I/O on the system backend is blocking,
//!   so the connection trait is synchronous and callers run it on blocking
//!   tasks. Every read is bounded by a configured timeout; indefinite
//!   blocking is not part of the contract.
//! - **Interruptible**: each connection comes with a [`ReadInterrupt`]
//!   handle that can wake a blocked read from another thread, keeping close
//!   latency bounded even mid-read.
//! - **Mock-first testing**: the [`mock`] module provides the
//!   `(device, handle)` pair used by every lifecycle test, so no test ever
//!   needs physical hardware.
//!
//! # Example
//!
//! ```
//! use portway_serial::mock::MockPort;
//! use portway_serial::SerialConnection;
//!
//! let (mut port, handle) = MockPort::new("/dev/mock0");
//! handle.push_bytes(b"hi");
//!
//! let mut buf = [0u8; 16];
//! let n = port.read(&mut buf).unwrap();
//! assert_eq!(&buf[..n], b"hi");
//! ```

pub mod error;
pub mod mock;
pub mod system;
pub mod traits;

pub use error::{PortError, Result};
pub use system::SystemBackend;
pub use traits::{PortEnumerator, PortOpener, ReadInterrupt, SerialConnection};
