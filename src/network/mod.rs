//! Network Module
//!
//! TCP connection handling.
//!
//! ## Architecture
//! - One blocking socket per client
//! - One exchange in flight at a time
//! - Framing delegated to `protocol`

mod connection;

pub use connection::Connection;
