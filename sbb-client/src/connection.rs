//! Connection to a controller
//!
//! Wraps the transport with a Connected/Disconnected state. A connection
//! only becomes Connected once the stream is open and the handshake went
//! through; any fault puts it back to Disconnected.

use crate::transactor::Transactor;
use sbb_core::{SbbError, SbbResult, HANDSHAKE_COMMANDS};
use sbb_transport::TransportLayer;
use std::time::Duration;

/// Connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// No usable stream (initial state)
    #[default]
    Disconnected,
    /// Stream open and handshake done
    Connected,
}

/// A transport plus its connection state
#[derive(Debug)]
pub struct Connection<T> {
    transport: T,
    state: ConnectionState,
}

impl<T: TransportLayer> Connection<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            state: ConnectionState::Disconnected,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Connect and handshake unless already connected
    ///
    /// The transport bounds the connect with its own timeout; the handshake
    /// gets a separate `handshake_timeout` on top of its per-operation
    /// deadlines. On failure the connection is left Disconnected.
    pub async fn ensure_ready(
        &mut self,
        transactor: &Transactor,
        handshake_timeout: Duration,
    ) -> SbbResult<()> {
        if self.is_connected() {
            return Ok(());
        }

        match self.open_and_handshake(transactor, handshake_timeout).await {
            Ok(()) => Ok(()),
            Err(e) => {
                self.mark_disconnected().await;
                Err(e)
            }
        }
    }

    async fn open_and_handshake(
        &mut self,
        transactor: &Transactor,
        handshake_timeout: Duration,
    ) -> SbbResult<()> {
        if !self.transport.is_closed() {
            // Left over from a connection that was marked lost
            self.transport.close().await?;
        }
        self.transport.open().await?;
        self.state = ConnectionState::Connected;

        let outcome = tokio::time::timeout(
            handshake_timeout,
            transactor.run(&mut self.transport, &HANDSHAKE_COMMANDS),
        )
        .await
        .map_err(|_| SbbError::Timeout)?;

        match outcome.fault {
            Some(fault) => Err(fault),
            None => Ok(()),
        }
    }

    /// Drop the stream and go back to Disconnected
    pub async fn mark_disconnected(&mut self) {
        // The stream is unusable either way
        let _ = self.transport.close().await;
        self.state = ConnectionState::Disconnected;
    }
}
