//! The command dispatcher: one command per input line, forever.
//!
//! The dispatcher is the only mutator of the connection state. It runs as an
//! async task decoupled from the reader loop, so a slow command never stalls
//! inbound `DATA` events and a busy device never stalls command handling.
//!
//! # Error Isolation
//!
//! Each handler returns `Result<Option<Event>, BridgeError>`; the loop emits
//! the event on success and converts the error into an `ERROR` event on
//! failure. Malformed input lines are logged to the diagnostic channel and
//! skipped. One bad line never terminates the dispatcher.

use crate::emitter::EventWriter;
use crate::error::{BridgeError, Result};
use crate::reader;
use crate::state::{ConnectionState, OpenConnection, ReaderTask};
use portway_core::BaudRate;
use portway_serial::SerialConnection;
use portway_core::constants::DEFAULT_READ_TIMEOUT_MS;
use portway_protocol::{Command, Event, ParseError};
use portway_serial::{PortEnumerator, PortOpener};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info, warn};

/// The command-consuming control loop.
///
/// Generic over the backend that provides the two external collaborators
/// (port enumeration and connection acquisition), so the full lifecycle runs
/// identically against the system backend and the mock backend.
///
/// # Examples
///
/// ```
/// use portway_bridge::{Dispatcher, EventWriter};
/// use portway_serial::mock::MockBackend;
/// use std::sync::Arc;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let backend = MockBackend::new();
/// backend.add_port("/dev/mock0");
///
/// let events = Arc::new(EventWriter::new(Vec::new()));
/// let mut dispatcher = Dispatcher::new(backend, events);
///
/// dispatcher.dispatch_line(r#"{"CMD":"OPEN","PORT":"/dev/mock0","BAUD":9600}"#).await;
/// assert!(dispatcher.is_open());
///
/// dispatcher.dispatch_line(r#"{"CMD":"CLOSE"}"#).await;
/// assert!(!dispatcher.is_open());
/// # }
/// ```
pub struct Dispatcher<B>
where
    B: PortOpener + PortEnumerator,
{
    backend: B,
    events: Arc<EventWriter>,
    state: ConnectionState<B::Conn>,
    read_timeout: Duration,
}

impl<B> Dispatcher<B>
where
    B: PortOpener + PortEnumerator,
{
    /// Create a dispatcher with the default bounded read timeout.
    pub fn new(backend: B, events: Arc<EventWriter>) -> Self {
        Self::with_read_timeout(backend, events, Duration::from_millis(DEFAULT_READ_TIMEOUT_MS))
    }

    /// Create a dispatcher with a custom bounded read timeout.
    ///
    /// The timeout is handed to the backend at open time and caps both the
    /// reader's cancellation-check interval and close latency.
    pub fn with_read_timeout(backend: B, events: Arc<EventWriter>, read_timeout: Duration) -> Self {
        Dispatcher {
            backend,
            events,
            state: ConnectionState::Closed,
            read_timeout,
        }
    }

    /// Whether a connection is currently open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    /// Consume input lines until end of input, then shut down.
    ///
    /// This is the bridge's main loop: it returns when the input stream
    /// closes, after any open connection has been torn down in the full
    /// close sequence.
    ///
    /// # Errors
    ///
    /// Returns an error only if reading the input stream itself fails.
    pub async fn run<R>(mut self, input: R) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            self.dispatch_line(&line).await;
        }

        debug!("End of input, shutting down");
        self.shutdown().await;
        Ok(())
    }

    /// Process one input line: parse, handle, answer.
    pub async fn dispatch_line(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }

        let command = match Command::parse_line(line) {
            Ok(command) => command,
            Err(e) if e.is_malformed() => {
                warn!(error = %e, line, "Skipping malformed input line");
                return;
            }
            Err(e @ ParseError::UnknownCommand(_)) => {
                self.emit(&Event::alert(e.to_string()));
                return;
            }
            Err(e) => {
                self.emit(&Event::error(e.to_string()));
                return;
            }
        };

        match self.handle(command).await {
            Ok(Some(event)) => self.emit(&event),
            Ok(None) => {}
            Err(e) => self.emit(&Event::error(e.to_string())),
        }
    }

    /// Close any open connection and release its resources.
    ///
    /// Used at end of input; safe to call with nothing open.
    pub async fn shutdown(&mut self) {
        if let ConnectionState::Open(open) = std::mem::replace(&mut self.state, ConnectionState::Closed)
        {
            match open.shutdown().await {
                Ok(port) => {
                    info!(port = %port, "Serial connection closed at shutdown");
                    let _ = self.events.emit(&Event::closed(port));
                }
                Err(e) => warn!(error = %e, "Reader did not shut down cleanly"),
            }
        }
    }

    async fn handle(&mut self, command: Command) -> Result<Option<Event>> {
        match command {
            Command::List => self.handle_list(),
            Command::Open { port, baud } => self.handle_open(port, baud),
            Command::Close => self.handle_close().await,
            Command::Write { data } => self.handle_write(data).await,
        }
    }

    fn handle_list(&mut self) -> Result<Option<Event>> {
        let ports = self.backend.ports()?;
        debug!(count = ports.len(), "Enumerated serial ports");
        Ok(Some(Event::PortList { ports }))
    }

    fn handle_open(&mut self, port: String, baud: BaudRate) -> Result<Option<Event>> {
        if port.trim().is_empty() {
            return Err(BridgeError::EmptyPortName);
        }
        if let ConnectionState::Open(open) = &self.state {
            return Err(BridgeError::AlreadyOpen(open.port_name().to_string()));
        }

        let (conn, interrupter) = self.backend.open(&port, baud, self.read_timeout)?;
        let conn = Arc::new(Mutex::new(conn));
        let cancel = Arc::new(AtomicBool::new(false));
        let handle = reader::spawn(conn.clone(), self.events.clone(), cancel.clone());

        self.state = ConnectionState::Open(OpenConnection::new(
            port.clone(),
            baud,
            conn,
            interrupter,
            ReaderTask { cancel, handle },
        ));

        info!(port = %port, baud = baud.as_u32(), "Serial connection opened");
        Ok(Some(Event::opened(port)))
    }

    async fn handle_close(&mut self) -> Result<Option<Event>> {
        match std::mem::replace(&mut self.state, ConnectionState::Closed) {
            ConnectionState::Closed => Err(BridgeError::NotOpen),
            ConnectionState::Open(open) => {
                let port = open.shutdown().await?;
                info!(port = %port, "Serial connection closed");
                Ok(Some(Event::closed(port)))
            }
        }
    }

    async fn handle_write(&mut self, data: String) -> Result<Option<Event>> {
        let ConnectionState::Open(open) = &self.state else {
            return Err(BridgeError::NotOpen);
        };

        let bytes = hex::decode(data.trim())?;
        let conn = open.conn_handle();
        let written = bytes.len();

        tokio::task::spawn_blocking(move || {
            let mut conn = conn.lock().unwrap_or_else(PoisonError::into_inner);
            conn.write_all(&bytes)
        })
        .await
        .map_err(|e| BridgeError::Join(e.to_string()))??;

        debug!(bytes = written, "Wrote to serial connection");
        // Fire and forget: a successful write has no acknowledgement event
        Ok(None)
    }

    fn emit(&self, event: &Event) {
        if let Err(e) = self.events.emit(event) {
            warn!(error = %e, "Failed to emit event");
        }
    }
}
