//! Codec Tests
//!
//! Tests for request encoding, response decoding and frame reading.

use std::io::{self, Cursor, Read};

use bytes::BytesMut;
use metricwire::protocol::{
    Command, Response, Status,
    encode_command, decode_command,
    encode_response, decode_response,
    read_frame, read_response, write_command,
    MAX_FRAME_SIZE,
};
use metricwire::ClientError;

// =============================================================================
// Command Encoding Tests
// =============================================================================

#[test]
fn test_encode_put() {
    let cmd = Command::Put {
        metric: "palm.cpu".to_string(),
        value: 10.6,
        timestamp: 1501864247,
    };
    assert_eq!(encode_command(&cmd), "put palm.cpu 10.6 1501864247\n");
}

#[test]
fn test_encode_put_integral_value() {
    let cmd = Command::Put {
        metric: "eardrum.memory".to_string(),
        value: 4200000.0,
        timestamp: 1150864250,
    };
    assert_eq!(encode_command(&cmd), "put eardrum.memory 4200000 1150864250\n");
}

#[test]
fn test_encode_get_wildcard() {
    let cmd = Command::Get {
        metric: "*".to_string(),
    };
    assert_eq!(encode_command(&cmd), "get *\n");
}

#[test]
fn test_write_command_to_stream() {
    let mut out = Vec::new();
    let cmd = Command::Get {
        metric: "palm.cpu".to_string(),
    };
    write_command(&mut out, &cmd).unwrap();
    assert_eq!(out, b"get palm.cpu\n");
}

// =============================================================================
// Command Decoding Tests
// =============================================================================

#[test]
fn test_decode_put() {
    let cmd = decode_command("put palm.cpu 0.5 1150864247\n").unwrap();
    assert_eq!(
        cmd,
        Command::Put {
            metric: "palm.cpu".to_string(),
            value: 0.5,
            timestamp: 1150864247,
        }
    );
    assert_eq!(cmd.metric(), "palm.cpu");
}

#[test]
fn test_decode_get() {
    let cmd = decode_command("get *").unwrap();
    assert_eq!(cmd, Command::Get { metric: "*".to_string() });
}

#[test]
fn test_decode_rejects_bad_lines() {
    for line in [
        "",
        "   ",
        "got palm.cpu",
        "get",
        "get a b",
        "put palm.cpu 0.5",
        "put palm.cpu abc 1",
        "put palm.cpu 0.5 soon",
    ] {
        assert!(
            matches!(decode_command(line), Err(ClientError::Protocol(_))),
            "{line:?} should not decode"
        );
    }
}

// =============================================================================
// Response Tests
// =============================================================================

#[test]
fn test_decode_bare_ok() {
    let response = decode_response(b"ok\n\n").unwrap();
    assert_eq!(response, Response::ok(None));
    assert!(response.is_bare_ok());
}

#[test]
fn test_decode_ok_with_payload() {
    let response = decode_response(b"ok\npalm.cpu 0.5 1150864247\n\n").unwrap();
    assert_eq!(response.status, Status::Ok);
    assert_eq!(response.payload.as_deref(), Some("palm.cpu 0.5 1150864247"));
    assert!(!response.is_bare_ok());
}

#[test]
fn test_decode_ok_payload_on_status_line() {
    let response = decode_response(b"ok palm.cpu 0.5 1\n\n").unwrap();
    assert_eq!(response.status, Status::Ok);
    assert_eq!(response.payload.as_deref(), Some("palm.cpu 0.5 1"));
}

#[test]
fn test_decode_error_and_unknown_status() {
    let response = decode_response(b"error\nwrong command\n\n").unwrap();
    assert_eq!(response, Response::error("wrong command"));

    let response = decode_response(b"okay\n\n").unwrap();
    assert_eq!(response.status, Status::Other("okay".to_string()));

    let response = decode_response(b"\n\n").unwrap();
    assert_eq!(response.status, Status::Other(String::new()));
    assert_eq!(response.payload, None);
}

#[test]
fn test_decode_invalid_utf8() {
    assert!(matches!(
        decode_response(b"ok\n\xff\xfe\n\n"),
        Err(ClientError::Protocol(_))
    ));
}

#[test]
fn test_encode_response_frames() {
    assert_eq!(encode_response(&Response::ok(None)), "ok\n\n");
    assert_eq!(
        encode_response(&Response::ok(Some("palm.cpu 0.5 1".to_string()))),
        "ok\npalm.cpu 0.5 1\n\n"
    );
    assert_eq!(encode_response(&Response::error("")), "error\n\n");
}

// =============================================================================
// Frame Reading Tests
// =============================================================================

/// Reader that hands out at most one byte per call
struct Trickle<R>(R);

impl<R: Read> Read for Trickle<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let len = buf.len().min(1);
        self.0.read(&mut buf[..len])
    }
}

#[test]
fn test_read_frame_keeps_trailing_bytes() {
    let mut reader = Cursor::new(b"ok\n\nerror\n\n".to_vec());
    let mut buffer = BytesMut::new();

    let first = read_frame(&mut reader, &mut buffer, 1024).unwrap();
    assert_eq!(&first[..], b"ok\n\n");
    assert_eq!(&buffer[..], b"error\n\n");

    let second = read_response(&mut reader, &mut buffer, 1024).unwrap();
    assert_eq!(second.status, Status::Error);
    assert!(buffer.is_empty());
}

#[test]
fn test_read_frame_terminator_split_across_reads() {
    let mut reader = Trickle(Cursor::new(b"ok\npalm.cpu 0.5 1\n\n".to_vec()));
    let mut buffer = BytesMut::new();

    let frame = read_frame(&mut reader, &mut buffer, 1024).unwrap();
    assert_eq!(&frame[..], b"ok\npalm.cpu 0.5 1\n\n");
}

#[test]
fn test_read_frame_eof_before_terminator() {
    let mut reader = Cursor::new(b"ok\npalm.cpu 0.5 1\n".to_vec());
    let mut buffer = BytesMut::new();

    assert!(matches!(
        read_frame(&mut reader, &mut buffer, 4),
        Err(ClientError::ConnectionClosed)
    ));
}

#[test]
fn test_read_frame_rejects_oversized_response() {
    let mut reader = io::repeat(b'x').take(MAX_FRAME_SIZE as u64 + 4096);
    let mut buffer = BytesMut::new();

    assert!(matches!(
        read_frame(&mut reader, &mut buffer, 64 * 1024),
        Err(ClientError::Protocol(_))
    ));
}

// =============================================================================
// Error Mapping Tests
// =============================================================================

#[test]
fn test_io_error_mapping() {
    let timeout: ClientError = io::Error::from(io::ErrorKind::WouldBlock).into();
    assert!(matches!(timeout, ClientError::Timeout));

    let timeout: ClientError = io::Error::from(io::ErrorKind::TimedOut).into();
    assert!(matches!(timeout, ClientError::Timeout));

    let closed: ClientError = io::Error::from(io::ErrorKind::ConnectionReset).into();
    assert!(matches!(closed, ClientError::ConnectionClosed));

    let other: ClientError = io::Error::from(io::ErrorKind::PermissionDenied).into();
    assert!(matches!(other, ClientError::Io(_)));
    assert!(other.poisons_connection());
    assert!(!ClientError::Rejected("error".to_string()).poisons_connection());
}
