//! Client Module
//!
//! The public entry point: submit samples with `put`, read them back with
//! `get`.
//!
//! ## Concurrency Model
//!
//! The protocol allows exactly one outstanding request per connection. The
//! connection sits behind a mutex, so a `MetricsClient` can be shared between
//! threads and their exchanges are serialized rather than interleaved.
//!
//! ## Failure Model
//!
//! - No retries. Every failure is reported on the first attempt.
//! - A failed `put` may or may not have been stored by the server.
//! - After a timeout or a torn frame the connection is marked broken and
//!   later calls fail with [`ClientError::ConnectionBroken`]. Build a new
//!   client to continue.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::network::Connection;
use crate::protocol::{Command, Response, Status};
use crate::series::{parse_series, MetricSeries};

/// Blocking client for the metrics protocol
pub struct MetricsClient {
    config: ClientConfig,

    /// `None` once closed
    connection: Mutex<Option<Connection>>,
}

impl MetricsClient {
    /// Connect to `host:port`
    ///
    /// `timeout` bounds the connect and every later read and write;
    /// `None` blocks indefinitely.
    pub fn connect(host: impl Into<String>, port: u16, timeout: Option<Duration>) -> Result<Self> {
        let config = ClientConfig::builder()
            .host(host)
            .port(port)
            .timeout(timeout)
            .build();
        Self::with_config(config)
    }

    /// Connect using a full configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let connection = Connection::open(&config)?;
        Ok(Self {
            config,
            connection: Mutex::new(Some(connection)),
        })
    }

    /// Submit one sample
    ///
    /// Without a timestamp the current time in whole seconds is used. The
    /// metric name is sent as given; the server decides whether it is valid.
    /// Succeeds only if the server answers with a bare `ok`.
    pub fn put(&self, metric: &str, value: impl Into<f64>, timestamp: Option<i64>) -> Result<()> {
        let timestamp = match timestamp {
            Some(ts) => ts,
            None => unix_now()?,
        };
        let command = Command::Put {
            metric: metric.to_string(),
            value: value.into(),
            timestamp,
        };

        let response = self.exchange(&command)?;
        if response.is_bare_ok() {
            Ok(())
        } else {
            Err(ClientError::Rejected(describe(&response)))
        }
    }

    /// Fetch all samples for `metric`, or for every metric with `"*"`
    ///
    /// A missing (or empty) metric fails with [`ClientError::MissingMetric`]
    /// before anything is sent. A response that does not start with `ok` is
    /// treated as "no data" and yields an empty series, matching what
    /// deployed servers expect from this client.
    pub fn get<'a>(&self, metric: impl Into<Option<&'a str>>) -> Result<MetricSeries> {
        let metric = match metric.into() {
            Some(m) if !m.is_empty() => m,
            _ => return Err(ClientError::MissingMetric),
        };
        let command = Command::Get {
            metric: metric.to_string(),
        };

        let response = self.exchange(&command)?;
        match response.status {
            Status::Ok => match response.payload.as_deref() {
                Some(payload) => parse_series(payload),
                None => Ok(MetricSeries::new()),
            },
            _ => {
                tracing::warn!(
                    "get {} answered with {:?}, returning no data",
                    metric,
                    describe(&response)
                );
                Ok(MetricSeries::new())
            }
        }
    }

    /// Close the connection
    ///
    /// Safe to call more than once. Later `put`/`get` calls fail with
    /// [`ClientError::Closed`].
    pub fn close(&self) {
        if let Some(mut connection) = self.connection.lock().take() {
            connection.shutdown();
        }
    }

    /// Configuration the client was built with
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Server address, while the connection is open
    pub fn peer_addr(&self) -> Option<String> {
        self.connection
            .lock()
            .as_ref()
            .map(|c| c.peer_addr().to_string())
    }

    /// True if the connection is open and not broken
    pub fn is_usable(&self) -> bool {
        self.connection
            .lock()
            .as_ref()
            .map_or(false, |c| !c.is_broken())
    }

    fn exchange(&self, command: &Command) -> Result<Response> {
        let mut guard = self.connection.lock();
        let connection = guard.as_mut().ok_or(ClientError::Closed)?;
        connection.exchange(command)
    }
}

impl Drop for MetricsClient {
    fn drop(&mut self) {
        self.close();
    }
}

/// Current wall-clock time in whole seconds since the Unix epoch
pub fn unix_now() -> Result<i64> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .map_err(|e| ClientError::Config(format!("system clock is before the Unix epoch: {e}")))
}

fn describe(response: &Response) -> String {
    match &response.payload {
        Some(payload) => format!("{} {}", response.status.as_str(), payload),
        None => response.status.as_str().to_string(),
    }
}
