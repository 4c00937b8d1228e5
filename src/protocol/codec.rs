//! Protocol codec
//!
//! Encoding and decoding functions for the text wire protocol.
//!
//! ## Wire Format
//!
//! ### Request (Command) Format
//! ```text
//! put <metric> <value> <timestamp>\n
//! get <metric-or-*>\n
//! ```
//!
//! ### Response Format
//! ```text
//! <status> [payload...]\n\n
//! ```
//! A response ends at the first blank line. There is no length prefix, so
//! the reader accumulates bytes until it sees [`FRAME_TERMINATOR`].

use std::io::{self, Read, Write};

use bytes::{Bytes, BytesMut};

use super::{Command, CommandType, Response, Status};
use crate::error::{ClientError, Result};

/// Blank line that ends every response
pub const FRAME_TERMINATOR: &[u8] = b"\n\n";

/// Maximum accumulated response size (16 MB)
pub const MAX_FRAME_SIZE: usize = 16 * 1024 * 1024;

// =============================================================================
// Command Encoding/Decoding
// =============================================================================

/// Encode a command to its request line, including the trailing newline
///
/// Values use `f64`'s shortest round-trip representation.
pub fn encode_command(command: &Command) -> String {
    let keyword = command.command_type().keyword();
    match command {
        Command::Put {
            metric,
            value,
            timestamp,
        } => format!("{keyword} {metric} {value} {timestamp}\n"),
        Command::Get { metric } => format!("{keyword} {metric}\n"),
    }
}

/// Decode a request line (server side of the protocol)
pub fn decode_command(line: &str) -> Result<Command> {
    let mut tokens = line.split_whitespace();
    let keyword = tokens
        .next()
        .ok_or_else(|| ClientError::Protocol("empty command line".to_string()))?;
    let args: Vec<&str> = tokens.collect();

    if keyword == CommandType::Put.keyword() {
        let [metric, value, timestamp] = args[..] else {
            return Err(ClientError::Protocol(format!(
                "put: expected 3 arguments, got {}",
                args.len()
            )));
        };
        let value = value
            .parse::<f64>()
            .map_err(|e| ClientError::Protocol(format!("put: bad value {value:?}: {e}")))?;
        let timestamp = timestamp.parse::<i64>().map_err(|e| {
            ClientError::Protocol(format!("put: bad timestamp {timestamp:?}: {e}"))
        })?;
        Ok(Command::Put {
            metric: metric.to_string(),
            value,
            timestamp,
        })
    } else if keyword == CommandType::Get.keyword() {
        let [metric] = args[..] else {
            return Err(ClientError::Protocol(format!(
                "get: expected 1 argument, got {}",
                args.len()
            )));
        };
        Ok(Command::Get {
            metric: metric.to_string(),
        })
    } else {
        Err(ClientError::Protocol(format!("unknown command: {keyword:?}")))
    }
}

// =============================================================================
// Response Encoding/Decoding
// =============================================================================

/// Encode a response frame: status line, optional payload line, blank line
pub fn encode_response(response: &Response) -> String {
    match &response.payload {
        Some(payload) => format!("{}\n{}\n\n", response.status.as_str(), payload),
        None => format!("{}\n\n", response.status.as_str()),
    }
}

/// Decode a complete frame (terminator included or not)
///
/// The first whitespace-delimited token is the status; the trimmed rest is
/// the payload. An empty frame decodes to `Status::Other("")`.
pub fn decode_response(frame: &[u8]) -> Result<Response> {
    let text = std::str::from_utf8(frame)
        .map_err(|e| ClientError::Protocol(format!("response is not valid UTF-8: {e}")))?
        .trim();

    let (head, rest) = match text.find(char::is_whitespace) {
        Some(split) => (&text[..split], text[split..].trim_start()),
        None => (text, ""),
    };

    Ok(Response {
        status: Status::from_token(head),
        payload: if rest.is_empty() {
            None
        } else {
            Some(rest.to_string())
        },
    })
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Write a command to a stream
pub fn write_command<W: Write>(writer: &mut W, command: &Command) -> Result<()> {
    let line = encode_command(command);
    writer.write_all(line.as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Read one frame from a stream
///
/// Bytes already in `buffer` are consumed first. Reads `chunk_size` bytes at
/// a time until the buffer holds [`FRAME_TERMINATOR`], then splits the frame
/// (terminator included) off the front. Anything after the terminator stays
/// in `buffer`.
pub fn read_frame<R: Read>(
    reader: &mut R,
    buffer: &mut BytesMut,
    chunk_size: usize,
) -> Result<Bytes> {
    let mut chunk = vec![0u8; chunk_size.max(1)];
    let mut scanned: usize = 0;

    loop {
        // Back up one byte so a terminator split across reads is still found
        let from = scanned.saturating_sub(FRAME_TERMINATOR.len() - 1);
        if let Some(pos) = find_terminator(&buffer[from..]) {
            let end = from + pos + FRAME_TERMINATOR.len();
            return Ok(buffer.split_to(end).freeze());
        }
        scanned = buffer.len();

        if buffer.len() > MAX_FRAME_SIZE {
            return Err(ClientError::Protocol(format!(
                "response exceeds {} bytes without a terminator",
                MAX_FRAME_SIZE
            )));
        }

        let n = match reader.read(&mut chunk) {
            Ok(0) => return Err(ClientError::ConnectionClosed),
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        buffer.extend_from_slice(&chunk[..n]);
    }
}

/// Read and decode one response from a stream
pub fn read_response<R: Read>(
    reader: &mut R,
    buffer: &mut BytesMut,
    chunk_size: usize,
) -> Result<Response> {
    let frame = read_frame(reader, buffer, chunk_size)?;
    decode_response(&frame)
}

fn find_terminator(haystack: &[u8]) -> Option<usize> {
    haystack
        .windows(FRAME_TERMINATOR.len())
        .position(|window| window == FRAME_TERMINATOR)
}
