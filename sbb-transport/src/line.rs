//! Buffered CRLF line stream over any async byte stream

use crate::stream::LineAccessor;
use crate::timeout::guarded;
use async_trait::async_trait;
use sbb_core::{SbbError, SbbResult};
use std::fmt;
use std::time::Duration;
use tokio::io::{
    AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter,
    ReadHalf, WriteHalf,
};

/// Line stream with a bounded read buffer and a per-operation timeout
///
/// The stream is split into a buffered reader and a buffered writer. A line
/// longer than the read buffer capacity is rejected with
/// [`SbbError::LineTooLong`].
pub struct LineStream<S> {
    reader: BufReader<ReadHalf<S>>,
    writer: BufWriter<WriteHalf<S>>,
    timeout: Duration,
    capacity: usize,
    closed: bool,
}

impl<S> fmt::Debug for LineStream<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineStream")
            .field("timeout", &self.timeout)
            .field("capacity", &self.capacity)
            .field("closed", &self.closed)
            .finish()
    }
}

impl<S> LineStream<S>
where
    S: AsyncRead + AsyncWrite + Send,
{
    /// Wrap a connected stream
    ///
    /// # Arguments
    /// * `stream` - Connected byte stream
    /// * `timeout` - Deadline for each send and each line read
    /// * `capacity` - Read buffer capacity, also the maximum line length
    pub fn new(stream: S, timeout: Duration, capacity: usize) -> Self {
        let (read_half, write_half) = tokio::io::split(stream);
        Self {
            reader: BufReader::with_capacity(capacity, read_half),
            writer: BufWriter::new(write_half),
            timeout,
            capacity,
            closed: false,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn fail<T>(&mut self, error: SbbError) -> SbbResult<T> {
        self.closed = true;
        Err(error)
    }
}

#[async_trait]
impl<S> LineAccessor for LineStream<S>
where
    S: AsyncRead + AsyncWrite + Send,
{
    async fn send_line(&mut self, line: &[u8]) -> SbbResult<()> {
        if self.closed {
            return Err(SbbError::NotConnected);
        }

        let writer = &mut self.writer;
        let result = guarded(self.timeout, async {
            writer.write_all(line).await?;
            writer.flush().await
        })
        .await;

        match result {
            Ok(()) => Ok(()),
            Err(e) => self.fail(e),
        }
    }

    async fn read_line(&mut self) -> SbbResult<Vec<u8>> {
        if self.closed {
            return Err(SbbError::NotConnected);
        }

        let limit = self.capacity;
        let reader = &mut self.reader;
        let mut line = Vec::new();
        let result = guarded(self.timeout, async {
            (&mut *reader)
                .take(limit as u64)
                .read_until(b'\n', &mut line)
                .await
        })
        .await;

        match result {
            Ok(0) => self.fail(SbbError::ConnectionClosed),
            Ok(n) if n >= limit && !line.ends_with(b"\n") => self.fail(SbbError::LineTooLong(limit)),
            Ok(_) => Ok(line),
            Err(e) => self.fail(e),
        }
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    async fn close(&mut self) -> SbbResult<()> {
        if !self.closed {
            self.closed = true;
            let writer = &mut self.writer;
            // The peer may already be gone
            let _ = guarded(self.timeout, writer.shutdown()).await;
        }
        Ok(())
    }
}
