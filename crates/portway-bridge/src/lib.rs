//! Connection lifecycle core for the Portway serial bridge.
//!
//! This crate owns the part of the bridge with real correctness hazards: one
//! serial connection shared between a command-consuming task and a
//! data-producing task, with open/close/write/read interleaving safely and
//! shutdown never leaving a reader touching a released handle.
//!
//! # Components
//!
//! - [`Dispatcher`]: the command loop. Consumes one command per input line,
//!   mutates the connection state, starts and stops the reader, and answers
//!   with acknowledgement or error events. Every per-command failure is
//!   converted to an `ERROR` event at the command boundary; nothing unwinds
//!   past the loop.
//! - [`ConnectionState`]: the single source of truth for whether a device is
//!   open. A reader task exists if and only if the state is `Open`, and
//!   there is never more than one.
//! - reader loop (internal): drains the device with bounded-timeout reads,
//!   emitting hex-encoded `DATA` events until cancelled or the device dies.
//! - [`EventWriter`]: the shared output sink. One event becomes exactly one
//!   line, atomically with respect to concurrent emitters.
//!
//! # Close Ordering
//!
//! Closing follows a mandatory sequence: set the cancellation flag, wake any
//! blocked read, await the reader task, release the device handle, and only
//! then emit `CLOSED`. This guarantees `CLOSED` is never observed while the
//! reader can still produce `DATA`, and that the reader never touches a
//! released handle.

pub mod dispatcher;
pub mod emitter;
pub mod error;
pub mod state;

mod reader;

pub use dispatcher::Dispatcher;
pub use emitter::EventWriter;
pub use error::{BridgeError, Result};
pub use state::{ConnectionState, OpenConnection};
