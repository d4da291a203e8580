//! Line accessor traits for the transport layer

use async_trait::async_trait;
use sbb_core::SbbResult;

/// Line-oriented access to a physical stream to a controller
///
/// Every suspending operation is bounded by the transport's timeout; an
/// expired deadline is reported as [`SbbError::Timeout`](sbb_core::SbbError::Timeout).
#[async_trait]
pub trait LineAccessor: Send {
    /// Write an already framed line and flush it
    ///
    /// # Arguments
    ///
    /// * `line` - Bytes to send, terminator included
    async fn send_line(&mut self, line: &[u8]) -> SbbResult<()>;

    /// Read one line from the stream
    ///
    /// # Returns
    ///
    /// The raw line, terminator included. A line cut short by end of stream
    /// is returned as-is; the following read reports the closed stream.
    async fn read_line(&mut self) -> SbbResult<Vec<u8>>;

    /// Check if the stream is closed
    fn is_closed(&self) -> bool;

    /// Close the stream
    async fn close(&mut self) -> SbbResult<()>;
}

/// Transport layer trait that extends LineAccessor
#[async_trait]
pub trait TransportLayer: LineAccessor {
    /// Open the physical layer connection
    async fn open(&mut self) -> SbbResult<()>;
}
