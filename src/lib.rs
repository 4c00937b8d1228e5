//! # metricwire
//!
//! A blocking client for a line-oriented time-series metrics protocol:
//! - One persistent TCP connection per client
//! - `put` submits a sample, `get` reads samples back sorted by timestamp
//! - Responses framed by a blank line (`\n\n`)
//! - Optional timeout on connect, reads and writes
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      MetricsClient                           │
//! │                 (put / get / close, Mutex)                   │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                      Connection                              │
//! │           (TcpStream, read buffer, broken flag)              │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │  Protocol   │          │   Series    │
//!   │   (codec)   │          │  (parsing)  │
//!   └─────────────┘          └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use std::time::Duration;
//! use metricwire::MetricsClient;
//!
//! # fn main() -> metricwire::Result<()> {
//! let client = MetricsClient::connect("127.0.0.1", 8888, Some(Duration::from_secs(15)))?;
//! client.put("palm.cpu", 0.5, Some(1150864247))?;
//! client.put("eardrum.memory", 4200000, None)?;
//! let series = client.get("*")?;
//! for (name, samples) in &series {
//!     println!("{name}: {samples:?}");
//! }
//! client.close();
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod series;
pub mod network;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{ClientError, Result};
pub use config::ClientConfig;
pub use client::MetricsClient;
pub use series::{MetricSeries, Sample};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of metricwire
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
