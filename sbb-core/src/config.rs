//! Validated client configuration
//!
//! [`ClientConfig`] is immutable once built. Every field goes through an
//! explicit validation function, whether the value comes from code
//! (`ClientConfig::new` plus the `with_*` setters) or from a settings
//! document deserialized through [`ClientSettings`].

use crate::address::validate_address;
use crate::error::{SbbError, SbbResult};
use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::Duration;

/// TCP port SBB controllers listen on
pub const DEFAULT_PORT: u16 = 6000;

/// Timeout applied to every network operation
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// Read buffer capacity per connection (1 MiB)
pub const DEFAULT_READ_BUFFER_CAPACITY: usize = 1024 * 1024;

/// Severity the client writes its progress lines at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    /// Progress lines are debug-only
    #[default]
    Quiet,
    /// Progress lines are informational
    Verbose,
}

impl From<bool> for Verbosity {
    fn from(verbose: bool) -> Self {
        if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Quiet
        }
    }
}

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "ClientSettings")]
pub struct ClientConfig {
    address: Ipv4Addr,
    port: u16,
    timeout: Duration,
    verbosity: Verbosity,
    read_buffer_capacity: usize,
}

impl ClientConfig {
    /// Create a configuration for the device at `address` with default settings
    ///
    /// # Errors
    /// Returns [`SbbError::InvalidAddress`] if `address` is not an IPv4 dotted-quad
    pub fn new(address: &str) -> SbbResult<Self> {
        Ok(Self {
            address: validate_address(address)?,
            port: DEFAULT_PORT,
            timeout: DEFAULT_TIMEOUT,
            verbosity: Verbosity::default(),
            read_buffer_capacity: DEFAULT_READ_BUFFER_CAPACITY,
        })
    }

    /// Set the device port
    pub fn with_port(mut self, port: u16) -> SbbResult<Self> {
        self.port = validate_port(port)?;
        Ok(self)
    }

    /// Set the per-operation timeout
    pub fn with_timeout(mut self, timeout: Duration) -> SbbResult<Self> {
        self.timeout = validate_timeout(timeout)?;
        Ok(self)
    }

    /// Set the per-operation timeout in (fractional) seconds
    pub fn with_timeout_secs(self, secs: f64) -> SbbResult<Self> {
        let timeout = timeout_from_secs(secs)?;
        self.with_timeout(timeout)
    }

    /// Set the verbosity
    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set the read buffer capacity, which also bounds the length of one line
    pub fn with_read_buffer_capacity(mut self, capacity: usize) -> SbbResult<Self> {
        self.read_buffer_capacity = validate_read_buffer_capacity(capacity)?;
        Ok(self)
    }

    pub fn address(&self) -> Ipv4Addr {
        self.address
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Socket address of the device
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::V4(SocketAddrV4::new(self.address, self.port))
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    pub fn read_buffer_capacity(&self) -> usize {
        self.read_buffer_capacity
    }
}

/// Unvalidated settings as found in a configuration document
///
/// Convert with `ClientConfig::try_from`; deserializing a [`ClientConfig`]
/// goes through this type automatically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientSettings {
    pub address: String,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub timeout_secs: Option<f64>,
    #[serde(default)]
    pub verbose: bool,
    #[serde(default)]
    pub read_buffer_capacity: Option<usize>,
}

impl TryFrom<ClientSettings> for ClientConfig {
    type Error = SbbError;

    fn try_from(settings: ClientSettings) -> SbbResult<Self> {
        let mut config =
            ClientConfig::new(&settings.address)?.with_verbosity(settings.verbose.into());
        if let Some(port) = settings.port {
            config = config.with_port(port)?;
        }
        if let Some(secs) = settings.timeout_secs {
            config = config.with_timeout_secs(secs)?;
        }
        if let Some(capacity) = settings.read_buffer_capacity {
            config = config.with_read_buffer_capacity(capacity)?;
        }
        Ok(config)
    }
}

fn validate_port(port: u16) -> SbbResult<u16> {
    if port == 0 {
        return Err(SbbError::InvalidConfig("port must be non-zero".to_string()));
    }
    Ok(port)
}

fn validate_timeout(timeout: Duration) -> SbbResult<Duration> {
    if timeout.is_zero() {
        return Err(SbbError::InvalidConfig(
            "timeout must be a positive duration".to_string(),
        ));
    }
    Ok(timeout)
}

fn timeout_from_secs(secs: f64) -> SbbResult<Duration> {
    if !secs.is_finite() || secs <= 0.0 {
        return Err(SbbError::InvalidConfig(format!(
            "timeout must be a positive number of seconds, got {}",
            secs
        )));
    }
    Duration::try_from_secs_f64(secs)
        .map_err(|e| SbbError::InvalidConfig(format!("timeout {}: {}", secs, e)))
}

fn validate_read_buffer_capacity(capacity: usize) -> SbbResult<usize> {
    if capacity == 0 {
        return Err(SbbError::InvalidConfig(
            "read buffer capacity must be non-zero".to_string(),
        ));
    }
    Ok(capacity)
}
