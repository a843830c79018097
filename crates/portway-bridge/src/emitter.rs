//! Line-atomic event emission.
//!
//! The dispatcher and the reader loop both write to the same output stream
//! from different tasks. [`EventWriter`] guarantees line atomicity: one
//! event becomes exactly one `\n`-terminated JSON line, and two events
//! emitted concurrently never interleave their bytes.

use portway_protocol::Event;
use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

/// Serializes events to a shared output stream, one JSON line per event.
///
/// Shared between the dispatcher and the reader loop as
/// `Arc<EventWriter>`. The sink is locked for the duration of one
/// write-and-flush, which is what makes concurrent emission safe.
///
/// # Examples
///
/// ```
/// use portway_bridge::EventWriter;
/// use portway_protocol::Event;
///
/// let writer = EventWriter::new(Vec::new());
/// writer.emit(&Event::opened("/dev/ttyUSB0")).unwrap();
/// ```
pub struct EventWriter {
    sink: Mutex<Box<dyn Write + Send>>,
}

impl EventWriter {
    /// Create an event writer over any byte sink.
    pub fn new(sink: impl Write + Send + 'static) -> Self {
        EventWriter {
            sink: Mutex::new(Box::new(sink)),
        }
    }

    /// Create the production event writer over standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// Serialize one event as a single output line and flush it.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the sink is gone (for the real
    /// bridge that means the parent process closed its end).
    pub fn emit(&self, event: &Event) -> io::Result<()> {
        let mut line = event.to_json().map_err(io::Error::other)?;
        line.push('\n');

        let mut sink = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
        sink.write_all(line.as_bytes())?;
        sink.flush()
    }
}

impl std::fmt::Debug for EventWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventWriter").finish()
    }
}
