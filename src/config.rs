//! Configuration for the metrics client
//!
//! Centralized configuration with sensible defaults.

use std::time::Duration;

use crate::error::{ClientError, Result};

/// Connection settings for a [`MetricsClient`](crate::MetricsClient)
#[derive(Debug, Clone)]
pub struct ClientConfig {
    // -------------------------------------------------------------------------
    // Endpoint
    // -------------------------------------------------------------------------
    /// Server host name or IP address
    pub host: String,

    /// Server TCP port
    pub port: u16,

    // -------------------------------------------------------------------------
    // Socket Behaviour
    // -------------------------------------------------------------------------
    /// Timeout applied to connect, every read and every write.
    /// `None` blocks indefinitely.
    pub timeout: Option<Duration>,

    /// Bytes requested from the socket per read while accumulating a frame
    pub read_chunk_size: usize,

    /// Disable Nagle's algorithm
    pub nodelay: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8888,
            timeout: None,
            read_chunk_size: 1024,
            nodelay: true,
        }
    }
}

impl ClientConfig {
    /// Create a new config builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// `host:port` as passed to address resolution
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Reject settings the socket layer would refuse later
    pub fn validate(&self) -> Result<()> {
        if self.host.is_empty() {
            return Err(ClientError::Config("host must not be empty".to_string()));
        }
        if self.timeout == Some(Duration::ZERO) {
            return Err(ClientError::Config(
                "timeout must be non-zero (use None to block indefinitely)".to_string(),
            ));
        }
        if self.read_chunk_size == 0 {
            return Err(ClientError::Config(
                "read_chunk_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for ClientConfig
#[derive(Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the server host
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the server port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set the I/O timeout (`None` blocks indefinitely)
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the I/O timeout in milliseconds
    pub fn timeout_ms(mut self, ms: u64) -> Self {
        self.config.timeout = Some(Duration::from_millis(ms));
        self
    }

    /// Set the per-read chunk size (in bytes)
    pub fn read_chunk_size(mut self, size: usize) -> Self {
        self.config.read_chunk_size = size;
        self
    }

    /// Enable or disable TCP_NODELAY
    pub fn nodelay(mut self, enabled: bool) -> Self {
        self.config.nodelay = enabled;
        self
    }

    pub fn build(self) -> ClientConfig {
        self.config
    }
}
