//! The `portway` binary: a stdio JSON bridge to one serial device.
//!
//! Commands arrive one JSON object per line on stdin; events leave one JSON
//! object per line on stdout. Diagnostics go to stderr only (controlled by
//! `RUST_LOG`), so the event stream stays machine-parseable. The process
//! runs until its input stream closes.

use anyhow::Context;
use portway_bridge::{Dispatcher, EventWriter};
use portway_protocol::Event;
use portway_serial::SystemBackend;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries the event stream; diagnostics must stay on stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let events = Arc::new(EventWriter::stdout());
    events
        .emit(&Event::init())
        .context("failed to emit INIT event")?;

    info!(version = portway_core::VERSION, "Portway bridge started");

    let dispatcher = Dispatcher::new(SystemBackend::new(), events);
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    dispatcher
        .run(stdin)
        .await
        .context("failed reading command stream")?;

    info!("Input stream closed, exiting");
    Ok(())
}
