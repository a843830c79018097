//! Production serial backend built on the `serialport` crate.
//!
//! [`SystemBackend`] implements both collaborator traits: it opens real
//! devices and enumerates the ports the operating system reports. The
//! returned connection wraps `Box<dyn serialport::SerialPort>` behind the
//! crate's own [`SerialConnection`] trait so the bridge core never touches
//! the `serialport` API directly.

use crate::error::{PortError, Result};
use crate::traits::{PortEnumerator, PortOpener, ReadInterrupt, SerialConnection};
use portway_core::{BaudRate, PortInfo};
use std::io::{Read, Write};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// An open system serial port.
pub struct SystemPort {
    /// The underlying serial port implementation.
    port: Box<dyn serialport::SerialPort>,
    /// The port path for identification.
    name: String,
}

impl SerialConnection for SystemPort {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        match self.port.read(buf) {
            Ok(n) => Ok(n),
            Err(e)
                if e.kind() == std::io::ErrorKind::TimedOut
                    || e.kind() == std::io::ErrorKind::WouldBlock =>
            {
                Err(PortError::Timeout)
            }
            Err(e) => Err(PortError::Io(e)),
        }
    }

    fn write_all(&mut self, data: &[u8]) -> Result<()> {
        self.port.write_all(data)?;
        self.port.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for SystemPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemPort")
            .field("name", &self.name)
            .field("baud_rate", &self.port.baud_rate().ok())
            .finish()
    }
}

/// Interrupt handle for system ports.
///
/// The `serialport` crate has no way to wake a read from another thread, so
/// this is a no-op: cancellation latency is bounded by the read timeout the
/// port was opened with instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopInterrupt;

impl ReadInterrupt for NoopInterrupt {
    fn interrupt(&self) {}
}

/// Serial backend for real operating-system devices.
///
/// # Examples
///
/// ```no_run
/// use portway_serial::{PortEnumerator, SystemBackend};
///
/// let backend = SystemBackend::new();
/// for port in backend.ports()? {
///     println!("{}", port.device);
/// }
/// # Ok::<(), portway_serial::PortError>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBackend;

impl SystemBackend {
    /// Create a new system backend.
    pub fn new() -> Self {
        SystemBackend
    }
}

impl PortOpener for SystemBackend {
    type Conn = SystemPort;

    fn open(
        &self,
        port: &str,
        baud: BaudRate,
        timeout: Duration,
    ) -> Result<(Self::Conn, Arc<dyn ReadInterrupt>)> {
        let handle = serialport::new(port, baud.as_u32())
            .timeout(timeout)
            .open()
            .map_err(|e| match e.kind() {
                serialport::ErrorKind::NoDevice => PortError::not_found(port),
                _ => PortError::open_failed(port, e.to_string()),
            })?;

        debug!(port, baud = baud.as_u32(), timeout_ms = timeout.as_millis() as u64, "Opened serial port");

        let conn = SystemPort {
            port: handle,
            name: port.to_string(),
        };
        Ok((conn, Arc::new(NoopInterrupt)))
    }
}

impl PortEnumerator for SystemBackend {
    /// List available serial ports.
    ///
    /// On macOS, `/dev/tty.*` devices are filtered out in favor of their
    /// `/dev/cu.*` siblings: the cu (calling unit) devices are non-blocking,
    /// while the tty devices block on open waiting for carrier detect.
    fn ports(&self) -> Result<Vec<PortInfo>> {
        let ports =
            serialport::available_ports().map_err(|e| PortError::enumeration(e.to_string()))?;

        Ok(ports
            .into_iter()
            .filter(|_p| {
                #[cfg(target_os = "macos")]
                {
                    !_p.port_name.starts_with("/dev/tty.")
                }
                #[cfg(not(target_os = "macos"))]
                {
                    true
                }
            })
            .map(describe_port)
            .collect())
    }
}

/// Map one `serialport` enumeration entry into the wire-level snapshot.
fn describe_port(entry: serialport::SerialPortInfo) -> PortInfo {
    let mut info = PortInfo::new(entry.port_name.clone());
    info.name = Some(basename(&entry.port_name).to_string());

    match entry.port_type {
        serialport::SerialPortType::UsbPort(usb) => {
            info.hwid = Some(usb_hwid(usb.vid, usb.pid, usb.serial_number.as_deref()));
            info.vid = Some(usb.vid);
            info.pid = Some(usb.pid);
            info.serial = usb.serial_number;
            info.manufacturer = usb.manufacturer;
            info.description = usb.product.clone();
            info.product = usb.product;
        }
        serialport::SerialPortType::BluetoothPort => {
            info.description = Some("Bluetooth serial port".to_string());
        }
        serialport::SerialPortType::PciPort => {
            info.description = Some("PCI serial port".to_string());
        }
        serialport::SerialPortType::Unknown => {}
    }

    info
}

/// Hardware ID string in the `USB VID:PID=xxxx:xxxx` convention.
fn usb_hwid(vid: u16, pid: u16, serial: Option<&str>) -> String {
    match serial {
        Some(serial) => format!("USB VID:PID={vid:04X}:{pid:04X} SER={serial}"),
        None => format!("USB VID:PID={vid:04X}:{pid:04X}"),
    }
}

/// Final path component of a device path; `COM`-style names pass through.
fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
