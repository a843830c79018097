//! Shared helpers for bridge integration tests.

use portway_bridge::EventWriter;
use serde_json::Value;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Byte sink sharing one buffer across clones, so the test keeps a view of
/// everything the bridge emits.
#[derive(Clone, Default)]
pub struct SharedSink(Arc<Mutex<Vec<u8>>>);

impl SharedSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// An event writer over this sink.
    pub fn writer(&self) -> Arc<EventWriter> {
        Arc::new(EventWriter::new(self.clone()))
    }

    /// Every emitted line, parsed. Panics on a line that is not valid JSON,
    /// which is itself a protocol violation worth failing on.
    pub fn lines(&self) -> Vec<Value> {
        let buffer = self.0.lock().unwrap().clone();
        let text = String::from_utf8(buffer).expect("event stream is not UTF-8");
        text.lines()
            .map(|line| {
                serde_json::from_str(line)
                    .unwrap_or_else(|e| panic!("event line {line:?} is not valid JSON: {e}"))
            })
            .collect()
    }

    /// Emitted events with the given `EVENT` tag, in emission order.
    pub fn events(&self, tag: &str) -> Vec<Value> {
        self.lines()
            .into_iter()
            .filter(|value| value["EVENT"] == tag)
            .collect()
    }

    /// Poll until an event with the given tag appears, or give up.
    pub async fn wait_for_event(&self, tag: &str, timeout: Duration) -> Option<Value> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if let Some(event) = self.events(tag).into_iter().next() {
                return Some(event);
            }
            if tokio::time::Instant::now() >= deadline {
                return None;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}

impl Write for SharedSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
