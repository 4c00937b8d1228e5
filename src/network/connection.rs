//! Connection Handler
//!
//! Owns the TCP stream to the metrics server and runs one request/response
//! exchange at a time over it.

use std::io::{self, BufWriter};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};

use bytes::BytesMut;

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::protocol::{read_response, write_command, Command, Response};

/// A single connection to the metrics server
pub struct Connection {
    /// TCP stream reader (frames are accumulated in `buffer`)
    reader: TcpStream,

    /// TCP stream writer (buffered so a request line goes out in one write)
    writer: BufWriter<TcpStream>,

    /// Bytes read but not yet consumed as a frame
    buffer: BytesMut,

    read_chunk_size: usize,

    /// Peer address for logging
    peer_addr: String,

    /// Set once an exchange fails part-way
    broken: bool,
}

impl Connection {
    /// Connect to the configured server
    ///
    /// Applies the configured timeout to the connect itself and to every
    /// later read and write.
    pub fn open(config: &ClientConfig) -> Result<Self> {
        config.validate()?;

        let addr = config.addr();
        let stream = connect(config).map_err(|source| ClientError::Connect {
            addr: addr.clone(),
            source,
        })?;

        stream.set_nodelay(config.nodelay)?;
        stream.set_read_timeout(config.timeout)?;
        stream.set_write_timeout(config.timeout)?;

        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| addr.clone());

        // Clone stream for separate read/write handles
        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        tracing::debug!("Connected to {} ({})", addr, peer_addr);

        Ok(Self {
            reader: read_stream,
            writer: BufWriter::new(write_stream),
            buffer: BytesMut::with_capacity(config.read_chunk_size),
            read_chunk_size: config.read_chunk_size,
            peer_addr,
            broken: false,
        })
    }

    /// Send one command and wait for its response frame
    ///
    /// A timeout, disconnect or unreadable frame marks the connection broken;
    /// every later exchange then fails with [`ClientError::ConnectionBroken`].
    pub fn exchange(&mut self, command: &Command) -> Result<Response> {
        if self.broken {
            return Err(ClientError::ConnectionBroken);
        }

        tracing::trace!("Sending to {}: {:?}", self.peer_addr, command);

        let result = write_command(&mut self.writer, command).and_then(|()| {
            read_response(&mut self.reader, &mut self.buffer, self.read_chunk_size)
        });

        match result {
            Ok(response) => {
                tracing::trace!("Received from {}: {:?}", self.peer_addr, response);
                Ok(response)
            }
            Err(e) => {
                if e.poisons_connection() {
                    tracing::warn!(
                        "Exchange with {} failed, connection marked broken: {}",
                        self.peer_addr,
                        e
                    );
                    self.broken = true;
                }
                Err(e)
            }
        }
    }

    /// Shut down both directions of the socket
    ///
    /// Errors are ignored: the peer may already have gone away.
    pub fn shutdown(&mut self) {
        let _ = self.writer.get_ref().shutdown(Shutdown::Both);
        self.broken = true;
        tracing::debug!("Connection to {} closed", self.peer_addr);
    }

    /// True once an exchange has failed part-way or the socket was shut down
    pub fn is_broken(&self) -> bool {
        self.broken
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}

fn connect(config: &ClientConfig) -> io::Result<TcpStream> {
    let Some(timeout) = config.timeout else {
        return TcpStream::connect((config.host.as_str(), config.port));
    };

    let mut last_err = None;
    for addr in (config.host.as_str(), config.port).to_socket_addrs()? {
        match TcpStream::connect_timeout(&addr, timeout) {
            Ok(stream) => return Ok(stream),
            Err(e) => last_err = Some(e),
        }
    }

    Err(last_err.unwrap_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "host did not resolve to any address",
        )
    }))
}
