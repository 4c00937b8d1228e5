//! Command definitions
//!
//! Represents requests sent by the client.

/// Command types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandType {
    Put,
    Get,
}

impl CommandType {
    /// Keyword that starts the request line
    pub fn keyword(self) -> &'static str {
        match self {
            CommandType::Put => "put",
            CommandType::Get => "get",
        }
    }
}

/// A single request line
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Store one sample
    Put {
        metric: String,
        value: f64,
        timestamp: i64,
    },

    /// Fetch all samples of a metric, or of every metric with `*`
    Get { metric: String },
}

impl Command {
    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::Put { .. } => CommandType::Put,
            Command::Get { .. } => CommandType::Get,
        }
    }

    /// Metric name (or wildcard) the command refers to
    pub fn metric(&self) -> &str {
        match self {
            Command::Put { metric, .. } | Command::Get { metric } => metric,
        }
    }
}
