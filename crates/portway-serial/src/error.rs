//! Error types for serial device operations.
//!
//! [`PortError::Timeout`] is deliberately a first-class variant rather than
//! an I/O error: a bounded read that returns no bytes is the normal idle
//! state of the reader loop, not a failure.

/// Result type alias for serial device operations.
pub type Result<T> = std::result::Result<T, PortError>;

/// Errors that can occur while enumerating, opening, or using a serial port.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    /// No device with the requested name exists.
    #[error("Port not found: {0}")]
    NotFound(String),

    /// The device exists but could not be opened.
    #[error("Failed to open {port}: {message}")]
    OpenFailed { port: String, message: String },

    /// A bounded read elapsed without data. Expected during idle periods;
    /// callers loop on it.
    #[error("Read timed out")]
    Timeout,

    /// The device went away or reported end of stream.
    #[error("Device disconnected: {0}")]
    Disconnected(String),

    /// Port enumeration failed.
    #[error("Enumeration failed: {0}")]
    Enumeration(String),

    /// Generic I/O error from the device.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PortError {
    /// Create a new not-found error.
    pub fn not_found(port: impl Into<String>) -> Self {
        Self::NotFound(port.into())
    }

    /// Create a new open-failed error.
    pub fn open_failed(port: impl Into<String>, message: impl Into<String>) -> Self {
        Self::OpenFailed {
            port: port.into(),
            message: message.into(),
        }
    }

    /// Create a new disconnected error.
    pub fn disconnected(message: impl Into<String>) -> Self {
        Self::Disconnected(message.into())
    }

    /// Create a new enumeration error.
    pub fn enumeration(message: impl Into<String>) -> Self {
        Self::Enumeration(message.into())
    }

    /// Whether this is the benign bounded-read timeout.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, PortError::Timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let error = PortError::not_found("/dev/ttyUSB9");
        assert_eq!(error.to_string(), "Port not found: /dev/ttyUSB9");
    }

    #[test]
    fn test_open_failed_display() {
        let error = PortError::open_failed("COM3", "Access denied");
        assert_eq!(error.to_string(), "Failed to open COM3: Access denied");
    }

    #[test]
    fn test_timeout_classification() {
        assert!(PortError::Timeout.is_timeout());
        assert!(!PortError::disconnected("gone").is_timeout());
    }
}
