//! TCP transport implementation

use crate::line::LineStream;
use crate::stream::{LineAccessor, TransportLayer};
use crate::timeout::guarded;
use async_trait::async_trait;
use sbb_core::config::{ClientConfig, DEFAULT_READ_BUFFER_CAPACITY, DEFAULT_TIMEOUT};
use sbb_core::{SbbError, SbbResult};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpStream;

/// TCP transport layer settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TcpSettings {
    pub address: SocketAddr,
    /// Deadline for connect, for each send and for each line read
    pub timeout: Duration,
    pub read_buffer_capacity: usize,
}

impl TcpSettings {
    /// Create new TCP settings
    pub fn new(address: SocketAddr) -> Self {
        Self {
            address,
            timeout: DEFAULT_TIMEOUT,
            read_buffer_capacity: DEFAULT_READ_BUFFER_CAPACITY,
        }
    }

    /// Create TCP settings with timeout
    pub fn with_timeout(address: SocketAddr, timeout: Duration) -> Self {
        Self {
            timeout,
            ..Self::new(address)
        }
    }
}

impl From<&ClientConfig> for TcpSettings {
    fn from(config: &ClientConfig) -> Self {
        Self {
            address: config.socket_addr(),
            timeout: config.timeout(),
            read_buffer_capacity: config.read_buffer_capacity(),
        }
    }
}

/// TCP transport layer implementation
#[derive(Debug)]
pub struct TcpTransport {
    stream: Option<LineStream<TcpStream>>,
    settings: TcpSettings,
}

impl TcpTransport {
    /// Create a new TCP transport layer
    pub fn new(settings: TcpSettings) -> Self {
        Self {
            stream: None,
            settings,
        }
    }

    pub fn settings(&self) -> &TcpSettings {
        &self.settings
    }

    fn stream_mut(&mut self) -> SbbResult<&mut LineStream<TcpStream>> {
        self.stream.as_mut().ok_or(SbbError::NotConnected)
    }
}

#[async_trait]
impl TransportLayer for TcpTransport {
    async fn open(&mut self) -> SbbResult<()> {
        if !self.is_closed() {
            return Err(SbbError::Connection(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Connection has already been opened",
            )));
        }

        let stream = guarded(self.settings.timeout, TcpStream::connect(self.settings.address)).await?;
        // Commands are single short lines; don't let Nagle hold them back
        stream.set_nodelay(true)?;

        self.stream = Some(LineStream::new(
            stream,
            self.settings.timeout,
            self.settings.read_buffer_capacity,
        ));
        Ok(())
    }
}

#[async_trait]
impl LineAccessor for TcpTransport {
    async fn send_line(&mut self, line: &[u8]) -> SbbResult<()> {
        self.stream_mut()?.send_line(line).await
    }

    async fn read_line(&mut self) -> SbbResult<Vec<u8>> {
        self.stream_mut()?.read_line().await
    }

    fn is_closed(&self) -> bool {
        self.stream.as_ref().is_none_or(|stream| stream.is_closed())
    }

    async fn close(&mut self) -> SbbResult<()> {
        if let Some(mut stream) = self.stream.take() {
            stream.close().await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
    use tokio::net::TcpListener;

    #[test]
    fn test_tcp_settings() {
        let addr: SocketAddr = "127.0.0.1:6000".parse().unwrap();
        let settings = TcpSettings::new(addr);
        assert_eq!(settings.address, addr);
        assert_eq!(settings.timeout, Duration::from_secs(1));
        assert_eq!(settings.read_buffer_capacity, 1024 * 1024);

        let settings = TcpSettings::with_timeout(addr, Duration::from_millis(250));
        assert_eq!(settings.timeout, Duration::from_millis(250));
    }

    #[test]
    fn test_settings_from_config() {
        let config = ClientConfig::new("10.0.0.5")
            .unwrap()
            .with_timeout_secs(2.0)
            .unwrap();
        let settings = TcpSettings::from(&config);
        assert_eq!(settings.address, "10.0.0.5:6000".parse::<SocketAddr>().unwrap());
        assert_eq!(settings.timeout, Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_not_connected_before_open() {
        let mut transport = TcpTransport::new(TcpSettings::new("127.0.0.1:6000".parse::<SocketAddr>().unwrap()));
        assert!(transport.is_closed());
        assert!(matches!(
            transport.read_line().await,
            Err(SbbError::NotConnected)
        ));
    }

    #[tokio::test]
    async fn test_open_exchange_close() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let device = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let (read_half, mut write_half) = stream.into_split();
            let mut lines = BufReader::new(read_half).lines();
            let command = lines.next_line().await.unwrap().unwrap();
            write_half
                .write_all(format!("{}\r\nok\r\n", command).as_bytes())
                .await
                .unwrap();
            // Wait for the client to hang up
            assert!(lines.next_line().await.unwrap().is_none());
            command
        });

        let mut transport =
            TcpTransport::new(TcpSettings::with_timeout(addr, Duration::from_millis(500)));
        transport.open().await.unwrap();
        assert!(!transport.is_closed());
        assert!(transport.open().await.is_err());

        transport.send_line(b"status\r\n").await.unwrap();
        assert_eq!(transport.read_line().await.unwrap(), b"status\r\n");
        assert_eq!(transport.read_line().await.unwrap(), b"ok\r\n");

        transport.close().await.unwrap();
        assert!(transport.is_closed());
        assert_eq!(device.await.unwrap(), "status");
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let mut transport =
            TcpTransport::new(TcpSettings::with_timeout(addr, Duration::from_millis(500)));
        assert!(matches!(
            transport.open().await,
            Err(SbbError::Connection(_))
        ));
        assert!(transport.is_closed());
    }

    #[tokio::test]
    async fn test_reopen_after_timeout() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let device = tokio::spawn(async move {
            let (first, _) = listener.accept().await.unwrap();
            let (second, _) = listener.accept().await.unwrap();
            (first, second)
        });

        let mut transport =
            TcpTransport::new(TcpSettings::with_timeout(addr, Duration::from_millis(50)));
        transport.open().await.unwrap();
        assert!(matches!(transport.read_line().await, Err(SbbError::Timeout)));
        assert!(transport.is_closed());

        transport.open().await.unwrap();
        assert!(!transport.is_closed());
        drop(device.await.unwrap());
    }
}
