//! Event serialization for the bridge's output stream.
//!
//! One event is one JSON object on one output line, with the `EVENT` field
//! selecting the variant. Events are transient: produced, serialized, and
//! forgotten.

use portway_core::PortInfo;
use serde::Serialize;

/// One structured notification emitted to the parent process.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "EVENT")]
pub enum Event {
    /// Emitted once at startup.
    #[serde(rename = "INIT")]
    Init {
        #[serde(rename = "VERSION")]
        version: String,
    },

    /// Result of a `LIST` command: all discoverable ports, enumerator order.
    #[serde(rename = "PORT")]
    PortList {
        #[serde(rename = "PORTS")]
        ports: Vec<PortInfo>,
    },

    /// A connection was opened on the named port.
    #[serde(rename = "OPENED")]
    Opened {
        #[serde(rename = "PORT")]
        port: String,
    },

    /// The connection on the named port was closed; the reader has fully
    /// stopped before this is emitted.
    #[serde(rename = "CLOSED")]
    Closed {
        #[serde(rename = "PORT")]
        port: String,
    },

    /// Inbound bytes from the device, hex-encoded.
    #[serde(rename = "DATA")]
    Data {
        #[serde(rename = "DATA")]
        data: String,
    },

    /// A command failed; the command loop continues.
    #[serde(rename = "ERROR")]
    Error {
        #[serde(rename = "MESSAGE")]
        message: String,
    },

    /// A protocol-level notice (unknown command, reader exit).
    #[serde(rename = "ALERT")]
    Alert {
        #[serde(rename = "MESSAGE")]
        message: String,
    },
}

impl Event {
    /// The startup event carrying the bridge version.
    pub fn init() -> Self {
        Event::Init {
            version: portway_core::VERSION.to_string(),
        }
    }

    /// A `DATA` event carrying the given bytes hex-encoded.
    ///
    /// # Examples
    ///
    /// ```
    /// use portway_protocol::Event;
    ///
    /// let event = Event::data_from_bytes(b"Hello");
    /// assert_eq!(event, Event::Data { data: "48656c6c6f".to_string() });
    /// ```
    pub fn data_from_bytes(bytes: &[u8]) -> Self {
        Event::Data {
            data: hex::encode(bytes),
        }
    }

    /// An `OPENED` acknowledgement for the named port.
    pub fn opened(port: impl Into<String>) -> Self {
        Event::Opened { port: port.into() }
    }

    /// A `CLOSED` acknowledgement for the named port.
    pub fn closed(port: impl Into<String>) -> Self {
        Event::Closed { port: port.into() }
    }

    /// An `ERROR` event with the given message.
    pub fn error(message: impl Into<String>) -> Self {
        Event::Error {
            message: message.into(),
        }
    }

    /// An `ALERT` event with the given message.
    pub fn alert(message: impl Into<String>) -> Self {
        Event::Alert {
            message: message.into(),
        }
    }

    /// Serialize to a single JSON line (no trailing newline).
    ///
    /// # Errors
    ///
    /// Returns a `serde_json::Error` if serialization fails; with these
    /// variants that only happens on formatter-level I/O problems.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
