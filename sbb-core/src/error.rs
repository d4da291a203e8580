use thiserror::Error;

/// Main error type for SBB operations
#[derive(Error, Debug)]
pub enum SbbError {
    #[error("Connection error: {0}")]
    Connection(#[from] std::io::Error),

    #[error("Timeout")]
    Timeout,

    #[error("Connection closed by peer")]
    ConnectionClosed,

    #[error("Line exceeds read buffer capacity of {0} bytes")]
    LineTooLong(usize),

    #[error("Not connected")]
    NotConnected,

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl SbbError {
    /// Whether this error means the connection can no longer be used
    ///
    /// Construction errors are the only kind that do not.
    pub fn is_connection_loss(&self) -> bool {
        !matches!(self, SbbError::InvalidAddress(_) | SbbError::InvalidConfig(_))
    }
}

/// Result type alias for SBB operations
pub type SbbResult<T> = Result<T, SbbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_loss_classification() {
        assert!(SbbError::Timeout.is_connection_loss());
        assert!(SbbError::ConnectionClosed.is_connection_loss());
        assert!(SbbError::LineTooLong(16).is_connection_loss());
        assert!(!SbbError::InvalidAddress("x".to_string()).is_connection_loss());
        assert!(!SbbError::InvalidConfig("x".to_string()).is_connection_loss());
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
        let err: SbbError = io.into();
        assert!(matches!(err, SbbError::Connection(_)));
        assert!(err.to_string().starts_with("Connection error"));
    }
}
