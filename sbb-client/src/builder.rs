//! Client builder
//!
//! # Usage Example
//!
//! ```rust,no_run
//! use sbb_client::ClientBuilder;
//!
//! # fn example() -> sbb_core::SbbResult<()> {
//! let client = ClientBuilder::new()
//!     .address("10.0.0.5")
//!     .timeout_secs(2.0)
//!     .verbose(true)
//!     .build()?;
//! # Ok(())
//! # }
//! ```

use crate::client::SbbClient;
use crate::log_sink::{LevelSink, LogSink};
use sbb_core::config::{DEFAULT_PORT, DEFAULT_READ_BUFFER_CAPACITY, DEFAULT_TIMEOUT};
use sbb_core::{ClientConfig, SbbError, SbbResult, Verbosity};
use sbb_transport::{TcpSettings, TcpTransport, TransportLayer};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Builder for [`SbbClient`]
///
/// Values are only checked in [`build`](ClientBuilder::build), which runs
/// every one of them through the [`ClientConfig`] validators.
#[derive(Clone)]
pub struct ClientBuilder {
    address: Option<String>,
    port: u16,
    timeout: Timeout,
    verbosity: Verbosity,
    read_buffer_capacity: usize,
    sink: Option<Arc<dyn LogSink>>,
}

#[derive(Debug, Clone, Copy)]
enum Timeout {
    Duration(Duration),
    Secs(f64),
}

impl fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("address", &self.address)
            .field("port", &self.port)
            .field("timeout", &self.timeout)
            .field("verbosity", &self.verbosity)
            .field("read_buffer_capacity", &self.read_buffer_capacity)
            .field("custom_sink", &self.sink.is_some())
            .finish()
    }
}

impl ClientBuilder {
    /// Create a new builder with default settings
    ///
    /// # Default Settings
    /// - Port: 6000
    /// - Timeout: 1 second per network operation
    /// - Verbosity: quiet (progress at debug level)
    /// - Read buffer: 1 MiB
    pub fn new() -> Self {
        Self {
            address: None,
            port: DEFAULT_PORT,
            timeout: Timeout::Duration(DEFAULT_TIMEOUT),
            verbosity: Verbosity::Quiet,
            read_buffer_capacity: DEFAULT_READ_BUFFER_CAPACITY,
            sink: None,
        }
    }

    /// Device IPv4 address (required)
    pub fn address(mut self, address: &str) -> Self {
        self.address = Some(address.to_string());
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Timeout applied to each connect, send and line read
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Timeout::Duration(timeout);
        self
    }

    pub fn timeout_secs(mut self, secs: f64) -> Self {
        self.timeout = Timeout::Secs(secs);
        self
    }

    /// Log progress at info instead of debug level
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbosity = verbose.into();
        self
    }

    pub fn read_buffer_capacity(mut self, capacity: usize) -> Self {
        self.read_buffer_capacity = capacity;
        self
    }

    /// Send progress and fault lines to `sink` instead of the `log` facade
    pub fn log_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Validate all settings into a [`ClientConfig`]
    ///
    /// # Errors
    /// - [`SbbError::InvalidConfig`] if no address was given or a value is
    ///   out of range
    /// - [`SbbError::InvalidAddress`] if the address is not a dotted-quad
    pub fn config(&self) -> SbbResult<ClientConfig> {
        let address = self
            .address
            .as_deref()
            .ok_or_else(|| SbbError::InvalidConfig("address must be configured".to_string()))?;

        let config = ClientConfig::new(address)?
            .with_port(self.port)?
            .with_read_buffer_capacity(self.read_buffer_capacity)?
            .with_verbosity(self.verbosity);
        match self.timeout {
            Timeout::Duration(timeout) => config.with_timeout(timeout),
            Timeout::Secs(secs) => config.with_timeout_secs(secs),
        }
    }

    /// Build a TCP client
    pub fn build(self) -> SbbResult<SbbClient> {
        let config = self.config()?;
        let transport = TcpTransport::new(TcpSettings::from(&config));
        Ok(self.assemble(config, transport))
    }

    /// Build a client over a custom transport
    pub fn build_with_transport<T: TransportLayer>(self, transport: T) -> SbbResult<SbbClient<T>> {
        let config = self.config()?;
        Ok(self.assemble(config, transport))
    }

    fn assemble<T: TransportLayer>(self, config: ClientConfig, transport: T) -> SbbClient<T> {
        let sink: Arc<dyn LogSink> = match self.sink {
            Some(sink) => sink,
            None => Arc::new(LevelSink::new(config.verbosity())),
        };
        SbbClient::with_transport(config, transport, sink)
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
