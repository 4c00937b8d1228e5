//! In-process metrics server used by the integration tests.

#![allow(dead_code)]

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;

use metricwire::protocol::{decode_command, encode_response, Command, Response};
use metricwire::series::{format_series, MetricSeries, Sample};
use parking_lot::Mutex;

/// What the server does after reading a request line
pub enum Reply {
    /// Write these bytes back
    Send(String),
    /// Write nothing and keep the connection open
    Silent,
    /// Close the connection
    Hangup,
}

/// Serves a single client connection on 127.0.0.1
pub struct MockServer {
    port: u16,
    received: Arc<Mutex<Vec<String>>>,
}

impl MockServer {
    /// Start a server that answers each request line with `handler`
    pub fn start<F>(mut handler: F) -> Self
    where
        F: FnMut(&str) -> Reply + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let received = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&received);

        thread::spawn(move || {
            let Ok((stream, _)) = listener.accept() else {
                return;
            };
            serve(stream, &log, &mut handler);
        });

        Self { port, received }
    }

    /// Start a server that answers every request with the same bytes
    pub fn canned(reply: &'static str) -> Self {
        Self::start(move |_| Reply::Send(reply.to_string()))
    }

    /// Start a server that stores samples and answers `get` from memory
    pub fn storing() -> Self {
        let mut store = MetricSeries::new();
        Self::start(move |line| {
            let response = match decode_command(line) {
                Ok(Command::Put {
                    metric,
                    value,
                    timestamp,
                }) => {
                    store
                        .entry(metric)
                        .or_default()
                        .push(Sample::new(timestamp, value));
                    Response::ok(None)
                }
                Ok(Command::Get { metric }) => {
                    let selected: MetricSeries = store
                        .iter()
                        .filter(|(name, _)| metric == "*" || **name == metric)
                        .map(|(name, samples)| (name.clone(), samples.clone()))
                        .collect();
                    let payload = format_series(&selected);
                    Response::ok(if payload.is_empty() { None } else { Some(payload) })
                }
                Err(_) => Response::error("wrong command"),
            };
            Reply::Send(encode_response(&response))
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Request lines received so far, without the trailing newline
    pub fn received(&self) -> Vec<String> {
        self.received.lock().clone()
    }
}

fn serve<F>(stream: TcpStream, log: &Mutex<Vec<String>>, handler: &mut F)
where
    F: FnMut(&str) -> Reply,
{
    let mut writer = stream.try_clone().unwrap();
    let mut reader = BufReader::new(stream);
    let mut line = String::new();

    loop {
        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) | Err(_) => return,
            Ok(_) => {}
        }
        let request = line.trim_end_matches('\n').to_string();
        log.lock().push(request.clone());

        match handler(&request) {
            Reply::Send(bytes) => {
                if writer.write_all(bytes.as_bytes()).is_err() {
                    return;
                }
            }
            Reply::Silent => {}
            Reply::Hangup => return,
        }
    }
}
