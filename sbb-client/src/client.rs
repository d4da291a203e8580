//! SBB controller client
//!
//! [`SbbClient`] owns one connection behind a [`TransactionLock`]. Every call
//! runs as two separate lock acquisitions:
//!
//! 1. `connect_and_handshake` connects and sends the handshake commands if
//!    the connection is down, then releases the lock.
//! 2. `run_transaction` takes the lock again and runs the caller's commands.
//!
//! The handshake never runs while a transaction holds the lock, so there is
//! no re-entrancy. Another task may slip in between the two phases; if it
//! lost the connection, phase 2 finds it Disconnected and returns an
//! acknowledgment without sending anything.

use crate::builder::ClientBuilder;
use crate::connection::{Connection, ConnectionState};
use crate::lock::TransactionLock;
use crate::log_sink::{LevelSink, LogSink};
use crate::transactor::Transactor;
use sbb_core::{ClientConfig, Reply, SbbResult};
use sbb_transport::{TcpSettings, TcpTransport, TransportLayer};
use std::fmt;
use std::sync::Arc;

/// Client for one SBB controller
pub struct SbbClient<T = TcpTransport> {
    config: ClientConfig,
    transactor: Transactor,
    lock: TransactionLock<Connection<T>>,
    sink: Arc<dyn LogSink>,
}

impl<T> fmt::Debug for SbbClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SbbClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SbbClient<TcpTransport> {
    /// Create a client for the controller at `address` with default settings
    ///
    /// No connection is made until the first call.
    ///
    /// # Errors
    /// Returns [`SbbError::InvalidAddress`](sbb_core::SbbError::InvalidAddress)
    /// if `address` is not an IPv4 dotted-quad
    pub fn new(address: &str) -> SbbResult<Self> {
        Ok(Self::from_config(ClientConfig::new(address)?))
    }

    /// Create a client from a validated configuration
    pub fn from_config(config: ClientConfig) -> Self {
        let sink = Arc::new(LevelSink::new(config.verbosity()));
        Self::from_config_with_sink(config, sink)
    }

    pub fn from_config_with_sink(config: ClientConfig, sink: Arc<dyn LogSink>) -> Self {
        let transport = TcpTransport::new(TcpSettings::from(&config));
        Self::with_transport(config, transport, sink)
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }
}

impl<T: TransportLayer> SbbClient<T> {
    /// Create a client over a custom transport
    pub fn with_transport(config: ClientConfig, transport: T, sink: Arc<dyn LogSink>) -> Self {
        Self {
            config,
            transactor: Transactor::new(sink.clone()),
            lock: TransactionLock::new(Connection::new(transport)),
            sink,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Run a batch of commands, connecting first if needed
    ///
    /// Never fails. Timeouts and other connection losses are logged, the
    /// connection is marked Disconnected and whatever payloads arrived before
    /// the fault are returned.
    pub async fn call<I, S>(&self, commands: I) -> Reply
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str> + Sync,
    {
        let commands: Vec<S> = commands.into_iter().collect();
        if !self.connect_and_handshake().await {
            return Reply::Ack;
        }
        self.run_transaction(&commands).await
    }

    /// Phase 1: make sure the connection is up
    ///
    /// Returns whether the connection is ready. Holds the transaction lock
    /// only for the duration of this call.
    pub async fn connect_and_handshake(&self) -> bool {
        let mut connection = self.lock.acquire().await;
        if connection.is_connected() {
            return true;
        }

        let addr = self.config.socket_addr();
        self.sink.progress(&format!("Connecting to {}", addr));
        match connection
            .ensure_ready(&self.transactor, self.config.timeout())
            .await
        {
            Ok(()) => {
                self.sink.progress(&format!("Connected to {}", addr));
                true
            }
            Err(e) => {
                self.sink
                    .fault(&format!("Failed to connect to {}: {}", addr, e));
                false
            }
        }
    }

    /// Phase 2: run `commands` as one transaction on the current connection
    pub async fn run_transaction<S>(&self, commands: &[S]) -> Reply
    where
        S: AsRef<str> + Sync,
    {
        let mut connection = self.lock.acquire().await;
        if !connection.is_connected() {
            self.sink.fault(&format!(
                "Transaction skipped, not connected to {}",
                self.config.socket_addr()
            ));
            return Reply::Ack;
        }

        self.sink.progress("Starting transaction");
        let outcome = self
            .transactor
            .run(connection.transport_mut(), commands)
            .await;
        if let Some(fault) = &outcome.fault {
            connection.mark_disconnected().await;
            self.sink.fault(&format!(
                "Transaction aborted, connection to {} lost: {}",
                self.config.socket_addr(),
                fault
            ));
        }
        self.sink.progress(&format!(
            "Transaction finished with {} payloads",
            outcome.payloads.len()
        ));
        outcome.into_reply()
    }

    pub async fn state(&self) -> ConnectionState {
        self.lock.acquire().await.state()
    }

    pub async fn is_connected(&self) -> bool {
        self.state().await == ConnectionState::Connected
    }

    /// Whether no call currently holds the transaction lock
    pub fn is_idle(&self) -> bool {
        self.lock.is_idle()
    }

    /// Close the connection; the next call reconnects and handshakes
    pub async fn disconnect(&self) {
        let mut connection = self.lock.acquire().await;
        if connection.is_connected() {
            self.sink
                .progress(&format!("Disconnecting from {}", self.config.socket_addr()));
        }
        connection.mark_disconnected().await;
    }
}
