//! Wire protocol for the Portway serial bridge.
//!
//! This crate defines the line-delimited JSON protocol spoken over standard
//! input and output: [`Command`] is one decoded input line from the parent
//! process, [`Event`] is one structured notification serialized back to it.
//!
//! # Wire Format
//!
//! Commands select their variant with the `CMD` field:
//!
//! ```text
//! {"CMD":"LIST"}
//! {"CMD":"OPEN","PORT":"/dev/ttyUSB0","BAUD":115200}
//! {"CMD":"CLOSE"}
//! {"CMD":"WRITE","DATA":"48656c6c6f"}
//! ```
//!
//! Events select their variant with the `EVENT` field:
//!
//! ```text
//! {"EVENT":"OPENED","PORT":"/dev/ttyUSB0"}
//! {"EVENT":"DATA","DATA":"48656c6c6f"}
//! {"EVENT":"ERROR","MESSAGE":"..."}
//! ```
//!
//! # Parse Error Taxonomy
//!
//! [`Command::parse_line`] distinguishes three failure classes so the
//! dispatcher can route each one correctly:
//!
//! - malformed input (bad JSON, not an object, no `CMD` key): a stderr
//!   diagnostic, never an event;
//! - a well-formed envelope with an unknown `CMD` tag: answered with an
//!   `ALERT` event;
//! - a known command with missing or invalid arguments: answered with an
//!   `ERROR` event.

pub mod command;
pub mod error;
pub mod event;

pub use command::Command;
pub use error::{ParseError, Result};
pub use event::Event;
