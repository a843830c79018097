//! Core constants for the serial bridge.
//!
//! This module centralizes the timing and sizing parameters shared by the
//! bridge's command loop and reader loop. The values here define the
//! responsiveness contract of the bridge: how quickly a blocked read observes
//! cancellation, and how much inbound data a single read may return.

// ============================================================================
// Reader Timing
// ============================================================================

/// Default bounded read timeout for an open serial connection (milliseconds).
///
/// The reader loop never blocks indefinitely on the device: every read is
/// bounded by this timeout so the loop re-checks its cancellation flag at
/// least this often. Close latency is therefore bounded by roughly twice this
/// value even when the device produces no bytes at all.
///
/// # Value: 100ms
///
/// Short enough that closing a silent connection feels immediate, long enough
/// that an idle reader does not spin.
///
/// # Examples
///
/// ```
/// use portway_core::constants::DEFAULT_READ_TIMEOUT_MS;
/// use std::time::Duration;
///
/// let timeout = Duration::from_millis(DEFAULT_READ_TIMEOUT_MS);
/// assert_eq!(timeout.as_millis(), 100);
/// ```
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 100;

// ============================================================================
// Buffer Sizing
// ============================================================================

/// Read buffer size for the reader loop (bytes).
///
/// One read call returns at most this many bytes; whatever arrives is
/// immediately hex-encoded and emitted as a `DATA` event, so the buffer also
/// caps the payload size of a single event line.
///
/// # Value: 1024 bytes
pub const READ_BUFFER_SIZE: usize = 1024;

// ============================================================================
// Baud Rate Constraints
// ============================================================================

/// Lowest baud rate accepted by an `OPEN` command.
///
/// Zero is never a valid rate; anything positive is passed through to the
/// device layer, which rejects rates the hardware cannot do.
///
/// # Value: 1
pub const MIN_BAUD_RATE: u32 = 1;
