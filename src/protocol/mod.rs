//! Protocol Module
//!
//! Defines the text protocol spoken with the metrics server.
//!
//! ## Protocol Format
//!
//! One request line per exchange, one blank-line-terminated frame back.
//! Requests are never pipelined.
//!
//! ```text
//! C: put palm.cpu 0.5 1150864247\n
//! S: ok\n\n
//! C: get palm.cpu\n
//! S: ok\npalm.cpu 0.5 1150864247\n\n
//! C: get nothing\n
//! S: error\nwrong command\n\n
//! ```
//!
//! ### Status Tokens
//! - `ok`: request accepted, payload (if any) follows
//! - `error`: request rejected

mod command;
mod response;
mod codec;

pub use command::{Command, CommandType};
pub use response::{Response, Status};
pub use codec::{
    decode_command, decode_response, encode_command, encode_response, read_frame,
    read_response, write_command, FRAME_TERMINATOR, MAX_FRAME_SIZE,
};
