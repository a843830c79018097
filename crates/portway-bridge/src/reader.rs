//! The reader loop: drains an open device into `DATA` events.
//!
//! Runs as a blocking task. Every read is bounded by the connection's
//! timeout, so the cancellation flag is observed at least that often; close
//! latency is bounded by the timeout even when the device is silent. The
//! loop isolates its own failures: a dead device ends the loop with an
//! `ALERT`, never a panic.

use crate::emitter::EventWriter;
use portway_protocol::Event;
use portway_serial::SerialConnection;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Why the reader loop ended.
enum ExitReason {
    /// The deliberate close sequence; the exit alert is suppressed.
    Cancelled,
    /// The device reported end of stream.
    Disconnected,
    /// A non-recoverable read error.
    Failed(String),
    /// The output sink is gone; nothing further can be reported.
    SinkClosed,
}

/// Spawn the reader loop for one open connection.
pub(crate) fn spawn<C: SerialConnection + 'static>(
    conn: Arc<Mutex<C>>,
    events: Arc<EventWriter>,
    cancel: Arc<AtomicBool>,
) -> JoinHandle<()> {
    tokio::task::spawn_blocking(move || run(conn, events, cancel))
}

fn run<C: SerialConnection>(
    conn: Arc<Mutex<C>>,
    events: Arc<EventWriter>,
    cancel: Arc<AtomicBool>,
) {
    let mut buf = [0u8; portway_core::constants::READ_BUFFER_SIZE];

    let reason = loop {
        if cancel.load(Ordering::SeqCst) {
            break ExitReason::Cancelled;
        }

        // Lock only for the duration of one bounded read so writes and the
        // close sequence are never starved.
        let result = {
            let mut conn = conn.lock().unwrap_or_else(PoisonError::into_inner);
            conn.read(&mut buf)
        };

        match result {
            Ok(0) => break ExitReason::Disconnected,
            Ok(n) => {
                if events.emit(&Event::data_from_bytes(&buf[..n])).is_err() {
                    break ExitReason::SinkClosed;
                }
            }
            Err(e) if e.is_timeout() => {}
            Err(e) => {
                warn!(error = %e, "Serial read failed");
                break ExitReason::Failed(e.to_string());
            }
        }
    };

    match reason {
        ExitReason::Cancelled => debug!("Reader loop ended by close"),
        ExitReason::Disconnected => {
            let _ = events.emit(&Event::alert("Serial read path ended: device disconnected"));
        }
        ExitReason::Failed(message) => {
            let _ = events.emit(&Event::alert(format!("Serial read path ended: {message}")));
        }
        ExitReason::SinkClosed => warn!("Reader loop ended: event stream closed"),
    }
}
