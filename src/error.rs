//! Error types for metricwire
//!
//! Every failure a caller can observe is a [`ClientError`]. Raw transport
//! errors are folded into protocol-level variants before they leave the crate.

use std::io;

use thiserror::Error;

/// Result type alias using ClientError
pub type Result<T> = std::result::Result<T, ClientError>;

/// Unified error type for client operations
#[derive(Debug, Error)]
pub enum ClientError {
    // -------------------------------------------------------------------------
    // Connection Errors
    // -------------------------------------------------------------------------
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("operation timed out")]
    Timeout,

    #[error("connection closed by server")]
    ConnectionClosed,

    #[error("IO error: {0}")]
    Io(io::Error),

    /// A previous exchange failed part-way; the framing state is unknown.
    #[error("connection is unusable after a failed exchange")]
    ConnectionBroken,

    #[error("client is closed")]
    Closed,

    // -------------------------------------------------------------------------
    // Request Errors
    // -------------------------------------------------------------------------
    #[error("metric name is required")]
    MissingMetric,

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("server rejected request: {0}")]
    Rejected(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// True if the error leaves the connection in an unknown framing state
    pub fn poisons_connection(&self) -> bool {
        matches!(
            self,
            ClientError::Timeout
                | ClientError::ConnectionClosed
                | ClientError::Io(_)
                | ClientError::Protocol(_)
        )
    }
}

impl From<io::Error> for ClientError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            // Unix reports an expired SO_RCVTIMEO as WouldBlock, Windows as TimedOut
            io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => ClientError::Timeout,
            io::ErrorKind::UnexpectedEof
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::BrokenPipe => ClientError::ConnectionClosed,
            _ => ClientError::Io(err),
        }
    }
}
