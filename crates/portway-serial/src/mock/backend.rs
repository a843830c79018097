//! Mock port registry standing in for the operating system.
//!
//! [`MockBackend`] implements both collaborator traits over a set of
//! registered mock devices, so dispatcher tests can exercise the full
//! open/enumerate surface. The backend is cheaply cloneable and every clone
//! shares the same registry: hand one clone to the dispatcher, keep another
//! in the test to register ports and inject failures.

use super::port::{MockPort, MockPortHandle, Shared};
use crate::error::{PortError, Result};
use crate::traits::{PortEnumerator, PortOpener, ReadInterrupt};
use portway_core::{BaudRate, PortInfo};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

#[derive(Default)]
struct Registry {
    ports: HashMap<String, Arc<Shared>>,
    listing: Vec<PortInfo>,
    enumeration_error: Option<String>,
    open_error: Option<String>,
    open_count: usize,
}

/// Mock serial backend for dispatcher tests.
///
/// # Examples
///
/// ```
/// use portway_core::BaudRate;
/// use portway_serial::mock::MockBackend;
/// use portway_serial::{PortEnumerator, PortOpener};
/// use std::time::Duration;
///
/// let backend = MockBackend::new();
/// let handle = backend.add_port("/dev/mock0");
///
/// let (conn, _interrupt) = backend
///     .open("/dev/mock0", BaudRate::new(9600).unwrap(), Duration::from_millis(100))
///     .unwrap();
///
/// handle.push_bytes(b"hi");
/// assert_eq!(backend.ports().unwrap().len(), 1);
/// # let _ = conn;
/// ```
#[derive(Clone, Default)]
pub struct MockBackend {
    inner: Arc<Mutex<Registry>>,
}

impl MockBackend {
    /// Create an empty backend with no registered ports.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Registry> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a device under the given name and return its control handle.
    ///
    /// The device also appears in enumeration results.
    pub fn add_port(&self, name: impl Into<String>) -> MockPortHandle {
        let name = name.into();
        // Registering through a throwaway port keeps all state creation in one place
        let (_port, handle) = MockPort::new(name.clone());

        let mut registry = self.lock();
        registry.ports.insert(name.clone(), handle.shared());
        registry.listing.push(PortInfo::new(name));
        handle
    }

    /// Replace the enumeration listing (for tests asserting on metadata).
    pub fn set_listing(&self, listing: Vec<PortInfo>) {
        self.lock().listing = listing;
    }

    /// Make the next enumeration call fail with the given message.
    pub fn fail_enumeration(&self, message: impl Into<String>) {
        self.lock().enumeration_error = Some(message.into());
    }

    /// Make the next open call fail with the given message.
    pub fn fail_next_open(&self, message: impl Into<String>) {
        self.lock().open_error = Some(message.into());
    }

    /// How many times a connection has been opened through this backend.
    pub fn open_count(&self) -> usize {
        self.lock().open_count
    }
}

impl PortOpener for MockBackend {
    type Conn = MockPort;

    fn open(
        &self,
        port: &str,
        _baud: BaudRate,
        timeout: Duration,
    ) -> Result<(Self::Conn, Arc<dyn ReadInterrupt>)> {
        let mut registry = self.lock();

        if let Some(message) = registry.open_error.take() {
            return Err(PortError::open_failed(port, message));
        }

        let shared = registry
            .ports
            .get(port)
            .cloned()
            .ok_or_else(|| PortError::not_found(port))?;
        registry.open_count += 1;
        drop(registry);

        let conn = MockPort::from_shared(shared, port.to_string(), timeout);
        let interrupt: Arc<dyn ReadInterrupt> = Arc::new(conn.interrupter());
        Ok((conn, interrupt))
    }
}

impl PortEnumerator for MockBackend {
    fn ports(&self) -> Result<Vec<PortInfo>> {
        let mut registry = self.lock();
        if let Some(message) = registry.enumeration_error.take() {
            return Err(PortError::enumeration(message));
        }
        Ok(registry.listing.clone())
    }
}

impl std::fmt::Debug for MockBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let registry = self.lock();
        f.debug_struct("MockBackend")
            .field("ports", &registry.ports.keys().collect::<Vec<_>>())
            .field("open_count", &registry.open_count)
            .finish()
    }
}
