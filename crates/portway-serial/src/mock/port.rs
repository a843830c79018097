//! Mock serial connection for testing and development.
//!
//! This module provides a simulated serial device that can be driven
//! programmatically without physical hardware, in a `(device, handle)`
//! pair: the [`MockPort`] goes wherever a real connection would, while the
//! [`MockPortHandle`] stays with the test and feeds it.

use crate::error::{PortError, Result};
use crate::traits::{ReadInterrupt, SerialConnection};
use portway_core::constants::DEFAULT_READ_TIMEOUT_MS;
use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Shared state between a mock port, its handle, and its interrupter.
#[derive(Debug, Default)]
struct MockState {
    /// Bytes waiting to be read.
    rx: VecDeque<u8>,
    /// Everything written to the device so far.
    written: Vec<u8>,
    /// Device reported end of stream.
    eof: bool,
    /// A pending wake-up for a blocked read.
    interrupted: bool,
    /// Echo writes back into the read buffer.
    loopback: bool,
    /// One-shot injected read failure.
    read_error: Option<String>,
    /// One-shot injected write failure.
    write_error: Option<String>,
}

#[derive(Debug)]
pub(super) struct Shared {
    state: Mutex<MockState>,
    readable: Condvar,
}

impl Shared {
    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self) {
        self.readable.notify_all();
    }
}

/// Mock serial connection.
///
/// Reads block on a condition variable bounded by the configured timeout,
/// mirroring how a real port read behaves, so cancellation and close-latency
/// tests exercise the same code paths as production.
///
/// # Examples
///
/// ```
/// use portway_serial::SerialConnection;
/// use portway_serial::mock::MockPort;
///
/// let (mut port, handle) = MockPort::new("/dev/mock0");
/// handle.push_bytes(&[0x01, 0x02]);
///
/// let mut buf = [0u8; 8];
/// assert_eq!(port.read(&mut buf).unwrap(), 2);
/// ```
pub struct MockPort {
    inner: Arc<Shared>,
    name: String,
    timeout: Duration,
}

impl MockPort {
    /// Create a mock port with the default read timeout.
    ///
    /// Returns the `(port, handle)` pair; the handle controls what the port
    /// observes.
    pub fn new(name: impl Into<String>) -> (Self, MockPortHandle) {
        Self::with_timeout(name, Duration::from_millis(DEFAULT_READ_TIMEOUT_MS))
    }

    /// Create a mock port with a custom read timeout.
    pub fn with_timeout(name: impl Into<String>, timeout: Duration) -> (Self, MockPortHandle) {
        let name = name.into();
        let inner = Arc::new(Shared {
            state: Mutex::new(MockState::default()),
            readable: Condvar::new(),
        });

        let port = MockPort {
            inner: inner.clone(),
            name: name.clone(),
            timeout,
        };
        let handle = MockPortHandle { inner, name };

        (port, handle)
    }

    pub(super) fn from_shared(inner: Arc<Shared>, name: String, timeout: Duration) -> Self {
        MockPort {
            inner,
            name,
            timeout,
        }
    }

    /// The interrupt handle for this port.
    pub fn interrupter(&self) -> MockInterrupt {
        MockInterrupt {
            inner: self.inner.clone(),
        }
    }
}

impl SerialConnection for MockPort {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let deadline = Instant::now() + self.timeout;
        let mut state = self.inner.lock();

        loop {
            if let Some(message) = state.read_error.take() {
                return Err(PortError::disconnected(message));
            }

            if !state.rx.is_empty() {
                let n = buf.len().min(state.rx.len());
                for slot in &mut buf[..n] {
                    if let Some(byte) = state.rx.pop_front() {
                        *slot = byte;
                    }
                }
                return Ok(n);
            }

            if state.eof {
                return Ok(0);
            }

            if state.interrupted {
                state.interrupted = false;
                return Err(PortError::Timeout);
            }

            let remaining = match deadline.checked_duration_since(Instant::now()) {
                Some(d) if !d.is_zero() => d,
                _ => return Err(PortError::Timeout),
            };

            let (guard, _timed_out) = self
                .inner
                .readable
                .wait_timeout(state, remaining)
                .unwrap_or_else(PoisonError::into_inner);
            state = guard;
        }
    }

    fn write_all(&mut self, data: &[u8]) -> Result<()> {
        let mut state = self.inner.lock();

        if let Some(message) = state.write_error.take() {
            return Err(PortError::disconnected(message));
        }

        state.written.extend_from_slice(data);
        if state.loopback {
            state.rx.extend(data.iter().copied());
            drop(state);
            self.inner.notify();
        }
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for MockPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockPort")
            .field("name", &self.name)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Handle for controlling a mock serial connection.
///
/// Cloneable; every clone controls the same underlying device.
///
/// # Examples
///
/// ```
/// use portway_serial::SerialConnection;
/// use portway_serial::mock::MockPort;
///
/// let (mut port, handle) = MockPort::new("/dev/mock0");
///
/// port.write_all(b"ping").unwrap();
/// assert_eq!(handle.take_written(), b"ping");
/// ```
#[derive(Clone)]
pub struct MockPortHandle {
    inner: Arc<Shared>,
    name: String,
}

impl MockPortHandle {
    /// Queue inbound bytes, waking any blocked read.
    pub fn push_bytes(&self, bytes: &[u8]) {
        let mut state = self.inner.lock();
        state.rx.extend(bytes.iter().copied());
        drop(state);
        self.inner.notify();
    }

    /// Simulate the device reporting end of stream. Subsequent reads return
    /// `Ok(0)` once the queued bytes are drained.
    pub fn disconnect(&self) {
        let mut state = self.inner.lock();
        state.eof = true;
        drop(state);
        self.inner.notify();
    }

    /// Inject a one-shot read failure, waking any blocked read.
    pub fn fail_next_read(&self, message: impl Into<String>) {
        let mut state = self.inner.lock();
        state.read_error = Some(message.into());
        drop(state);
        self.inner.notify();
    }

    /// Inject a one-shot write failure.
    pub fn fail_next_write(&self, message: impl Into<String>) {
        self.inner.lock().write_error = Some(message.into());
    }

    /// Wire the device as a loopback: every write is echoed back to reads.
    pub fn set_loopback(&self, enabled: bool) {
        self.inner.lock().loopback = enabled;
    }

    /// Everything written to the device so far.
    pub fn written(&self) -> Vec<u8> {
        self.inner.lock().written.clone()
    }

    /// Drain and return everything written to the device so far.
    pub fn take_written(&self) -> Vec<u8> {
        std::mem::take(&mut self.inner.lock().written)
    }

    /// Wake a blocked read without producing data.
    pub fn interrupt(&self) {
        let mut state = self.inner.lock();
        state.interrupted = true;
        drop(state);
        self.inner.notify();
    }

    /// The device name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(super) fn shared(&self) -> Arc<Shared> {
        self.inner.clone()
    }
}

impl std::fmt::Debug for MockPortHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockPortHandle").field("name", &self.name).finish()
    }
}

/// Interrupt handle for a mock port: wakes a blocked read immediately.
pub struct MockInterrupt {
    inner: Arc<Shared>,
}

impl ReadInterrupt for MockInterrupt {
    fn interrupt(&self) {
        let mut state = self.inner.lock();
        state.interrupted = true;
        drop(state);
        self.inner.notify();
    }
}

impl std::fmt::Debug for MockInterrupt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockInterrupt").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_read() {
        let (mut port, handle) = MockPort::new("/dev/mock0");
        handle.push_bytes(b"hello");

        let mut buf = [0u8; 16];
        let n = port.read(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"hello");
    }

    #[test]
    fn test_read_drains_in_buffer_sized_chunks() {
        let (mut port, handle) = MockPort::new("/dev/mock0");
        handle.push_bytes(&[1, 2, 3, 4, 5]);

        let mut buf = [0u8; 2];
        assert_eq!(port.read(&mut buf).unwrap(), 2);
        assert_eq!(buf, [1, 2]);
        assert_eq!(port.read(&mut buf).unwrap(), 2);
        assert_eq!(buf, [3, 4]);
        assert_eq!(port.read(&mut buf).unwrap(), 1);
        assert_eq!(buf[0], 5);
    }

    #[test]
    fn test_read_times_out_without_data() {
        let (mut port, _handle) = MockPort::with_timeout("/dev/mock0", Duration::from_millis(20));

        let start = Instant::now();
        let mut buf = [0u8; 4];
        let err = port.read(&mut buf).unwrap_err();
        assert!(err.is_timeout());
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn test_interrupt_wakes_blocked_read() {
        let (mut port, handle) = MockPort::with_timeout("/dev/mock0", Duration::from_secs(10));

        let reader = std::thread::spawn(move || {
            let mut buf = [0u8; 4];
            let start = Instant::now();
            let result = port.read(&mut buf);
            (result, start.elapsed())
        });

        std::thread::sleep(Duration::from_millis(50));
        handle.interrupt();

        let (result, elapsed) = reader.join().expect("reader thread panicked");
        assert!(result.unwrap_err().is_timeout());
        // Woke well before the 10s timeout
        assert!(elapsed < Duration::from_secs(1));
    }

    #[test]
    fn test_disconnect_reports_eof_after_draining() {
        let (mut port, handle) = MockPort::new("/dev/mock0");
        handle.push_bytes(b"last");
        handle.disconnect();

        let mut buf = [0u8; 16];
        assert_eq!(port.read(&mut buf).unwrap(), 4);
        assert_eq!(port.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn test_injected_read_failure() {
        let (mut port, handle) = MockPort::new("/dev/mock0");
        handle.fail_next_read("cable yanked");

        let mut buf = [0u8; 4];
        let err = port.read(&mut buf).unwrap_err();
        assert!(matches!(err, PortError::Disconnected(msg) if msg == "cable yanked"));
    }

    #[test]
    fn test_injected_write_failure_is_one_shot() {
        let (mut port, handle) = MockPort::new("/dev/mock0");
        handle.fail_next_write("bus fault");

        assert!(port.write_all(b"x").is_err());
        assert!(port.write_all(b"y").is_ok());
        assert_eq!(handle.written(), b"y");
    }

    #[test]
    fn test_loopback_echoes_writes() {
        let (mut port, handle) = MockPort::new("/dev/mock0");
        handle.set_loopback(true);

        port.write_all(b"echo").unwrap();

        let mut buf = [0u8; 16];
        let n = port.read(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"echo");
        // The write is still recorded
        assert_eq!(handle.written(), b"echo");
    }

    #[test]
    fn test_take_written_drains() {
        let (mut port, handle) = MockPort::new("/dev/mock0");
        port.write_all(b"one").unwrap();
        assert_eq!(handle.take_written(), b"one");
        assert!(handle.take_written().is_empty());
    }
}
