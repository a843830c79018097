//! Command decoding for the bridge's input stream.
//!
//! One input line is one JSON object whose `CMD` field selects the command.
//! Parsing is deliberately two-staged: the envelope (valid JSON object with a
//! string `CMD`) is checked first, then the arguments of the selected
//! variant. The stages fail with different [`ParseError`] classes so one bad
//! line can be answered appropriately without ever stopping the dispatcher.

use crate::error::{ParseError, Result};
use portway_core::BaudRate;
use serde::Deserialize;
use serde_json::Value;

/// One decoded command from the parent process.
///
/// Transient: a `Command` exists only for the duration of processing one
/// input line.
///
/// # Examples
///
/// ```
/// use portway_protocol::Command;
///
/// let cmd = Command::parse_line(r#"{"CMD":"OPEN","PORT":"/dev/ttyUSB0","BAUD":"9600"}"#).unwrap();
/// match cmd {
///     Command::Open { port, baud } => {
///         assert_eq!(port, "/dev/ttyUSB0");
///         assert_eq!(baud.as_u32(), 9600);
///     }
///     _ => panic!("expected OPEN"),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Enumerate available serial ports.
    List,

    /// Open the named port at the given rate.
    Open { port: String, baud: BaudRate },

    /// Close the open connection.
    Close,

    /// Write hex-encoded bytes to the open connection.
    Write { data: String },
}

/// The `BAUD` field arrives as either a JSON number or a decimal string;
/// both are accepted.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BaudField {
    Number(u64),
    Text(String),
}

impl BaudField {
    fn into_baud_rate(self) -> std::result::Result<BaudRate, String> {
        match self {
            BaudField::Number(n) => {
                let rate = u32::try_from(n).map_err(|_| format!("Baud rate out of range: {n}"))?;
                BaudRate::new(rate).map_err(|e| e.to_string())
            }
            BaudField::Text(s) => s.parse().map_err(|e: portway_core::Error| e.to_string()),
        }
    }
}

impl Command {
    /// Parse one input line into a command.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Syntax`], [`ParseError::NotAnObject`] or
    /// [`ParseError::MissingCommand`] for malformed input,
    /// [`ParseError::UnknownCommand`] for a well-formed envelope with an
    /// unrecognized `CMD` tag, and [`ParseError::InvalidArguments`] when a
    /// known command carries bad arguments.
    ///
    /// # Examples
    ///
    /// ```
    /// use portway_protocol::{Command, ParseError};
    ///
    /// assert_eq!(Command::parse_line(r#"{"CMD":"LIST"}"#).unwrap(), Command::List);
    ///
    /// let err = Command::parse_line(r#"{"CMD":"REBOOT"}"#).unwrap_err();
    /// assert!(matches!(err, ParseError::UnknownCommand(_)));
    /// ```
    pub fn parse_line(line: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(line)?;
        let object = value.as_object().ok_or(ParseError::NotAnObject)?;
        let tag = object
            .get("CMD")
            .and_then(Value::as_str)
            .ok_or(ParseError::MissingCommand)?;

        match tag {
            "LIST" => Ok(Command::List),
            "CLOSE" => Ok(Command::Close),
            "OPEN" => Self::parse_open(object),
            "WRITE" => Self::parse_write(object),
            other => Err(ParseError::UnknownCommand(other.to_string())),
        }
    }

    fn parse_open(object: &serde_json::Map<String, Value>) -> Result<Self> {
        let port = object
            .get("PORT")
            .and_then(Value::as_str)
            .ok_or_else(|| ParseError::invalid_arguments("OPEN", "Missing PORT field"))?
            .to_string();

        let baud_value = object
            .get("BAUD")
            .cloned()
            .ok_or_else(|| ParseError::invalid_arguments("OPEN", "Missing BAUD field"))?;
        let baud = serde_json::from_value::<BaudField>(baud_value)
            .map_err(|_| ParseError::invalid_arguments("OPEN", "BAUD must be a number or string"))?
            .into_baud_rate()
            .map_err(|message| ParseError::invalid_arguments("OPEN", message))?;

        Ok(Command::Open { port, baud })
    }

    fn parse_write(object: &serde_json::Map<String, Value>) -> Result<Self> {
        let data = object
            .get("DATA")
            .and_then(Value::as_str)
            .ok_or_else(|| ParseError::invalid_arguments("WRITE", "Missing DATA field"))?
            .to_string();

        Ok(Command::Write { data })
    }
}
