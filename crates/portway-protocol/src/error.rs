//! Error types for wire protocol parsing.
//!
//! Parse failures are classified by how the dispatcher must answer them:
//! malformed input never becomes an event, unknown command tags become an
//! `ALERT`, and bad arguments to a known command become an `ERROR`.

use thiserror::Error;

/// Result type alias for protocol parsing.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Errors produced while decoding one input line into a [`Command`].
///
/// [`Command`]: crate::Command
#[derive(Debug, Error)]
pub enum ParseError {
    /// The line is not valid JSON.
    #[error("Malformed JSON: {0}")]
    Syntax(#[from] serde_json::Error),

    /// The line parsed as JSON but is not an object.
    #[error("Input line is not a JSON object")]
    NotAnObject,

    /// The object has no string `CMD` field.
    #[error("Missing CMD field")]
    MissingCommand,

    /// The `CMD` tag is well-formed but not a command this bridge knows.
    #[error("Invalid Protocol: unknown command {0:?}")]
    UnknownCommand(String),

    /// A known command carried missing or invalid arguments.
    #[error("{command}: {message}")]
    InvalidArguments {
        command: &'static str,
        message: String,
    },
}

impl ParseError {
    /// Create an invalid-arguments error for the given command.
    pub fn invalid_arguments(command: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidArguments {
            command,
            message: message.into(),
        }
    }

    /// Whether this failure is malformed input rather than a protocol-level
    /// problem. Malformed input is reported on the diagnostic channel and
    /// never answered with an event.
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            ParseError::Syntax(_) | ParseError::NotAnObject | ParseError::MissingCommand
        )
    }
}
