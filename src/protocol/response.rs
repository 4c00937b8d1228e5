//! Response definitions
//!
//! Represents server replies, one per frame.

/// Response status, taken from the first token of a frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Ok,
    Error,
    /// Any other leading token (including an empty frame)
    Other(String),
}

impl Status {
    pub fn as_str(&self) -> &str {
        match self {
            Status::Ok => "ok",
            Status::Error => "error",
            Status::Other(token) => token,
        }
    }

    pub(crate) fn from_token(token: &str) -> Self {
        match token {
            "ok" => Status::Ok,
            "error" => Status::Error,
            other => Status::Other(other.to_string()),
        }
    }
}

/// A decoded response frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Status code
    pub status: Status,

    /// Everything after the status token, trimmed (samples for `get`,
    /// a message for `error`)
    pub payload: Option<String>,
}

impl Response {
    /// Create an OK response with optional payload
    pub fn ok(payload: Option<String>) -> Self {
        Self {
            status: Status::Ok,
            payload,
        }
    }

    /// Create an ERROR response
    pub fn error(message: &str) -> Self {
        Self {
            status: Status::Error,
            payload: if message.is_empty() {
                None
            } else {
                Some(message.to_string())
            },
        }
    }

    /// True for the bare `ok` acknowledgement that a `put` expects
    pub fn is_bare_ok(&self) -> bool {
        self.status == Status::Ok && self.payload.is_none()
    }
}
