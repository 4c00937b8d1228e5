//! Samples and series
//!
//! Turns a `get` payload into per-metric sample lists.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};

/// One observation of a metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Seconds since the Unix epoch
    pub timestamp: i64,
    pub value: f64,
}

impl Sample {
    pub fn new(timestamp: i64, value: f64) -> Self {
        Self { timestamp, value }
    }
}

impl From<(i64, f64)> for Sample {
    fn from((timestamp, value): (i64, f64)) -> Self {
        Self { timestamp, value }
    }
}

impl PartialEq<(i64, f64)> for Sample {
    fn eq(&self, other: &(i64, f64)) -> bool {
        self.timestamp == other.0 && self.value == other.1
    }
}

/// Samples grouped by metric name, each list ascending by timestamp
pub type MetricSeries = BTreeMap<String, Vec<Sample>>;

/// Parse the payload of an `ok` response to `get`
///
/// The payload is a flat run of `<name> <value> <timestamp>` triplets in
/// whatever order the server emitted them. Timestamps are parsed as floats
/// and truncated. Each list is stably sorted, so equal timestamps keep their
/// wire order.
pub fn parse_series(payload: &str) -> Result<MetricSeries> {
    let tokens: Vec<&str> = payload.split_whitespace().collect();
    if tokens.len() % 3 != 0 {
        return Err(ClientError::Protocol(format!(
            "payload has {} tokens, expected triplets of name/value/timestamp",
            tokens.len()
        )));
    }

    let mut series = MetricSeries::new();
    for triplet in tokens.chunks_exact(3) {
        let (name, value, timestamp) = (triplet[0], triplet[1], triplet[2]);
        let sample = Sample {
            timestamp: parse_timestamp(timestamp)?,
            value: parse_value(value)?,
        };
        series.entry(name.to_string()).or_default().push(sample);
    }

    for samples in series.values_mut() {
        samples.sort_by_key(|sample| sample.timestamp);
    }

    Ok(series)
}

/// Render a series as one `<name> <value> <timestamp>` line per sample
///
/// This is the payload layout servers of this protocol emit for `get`.
pub fn format_series(series: &MetricSeries) -> String {
    let mut out = String::new();
    for (name, samples) in series {
        for sample in samples {
            if !out.is_empty() {
                out.push('\n');
            }
            // Writing to a String cannot fail
            let _ = write!(out, "{} {} {}", name, sample.value, sample.timestamp);
        }
    }
    out
}

fn parse_value(token: &str) -> Result<f64> {
    token
        .parse::<f64>()
        .map_err(|e| ClientError::Protocol(format!("bad metric value {token:?}: {e}")))
}

fn parse_timestamp(token: &str) -> Result<i64> {
    let raw = token
        .parse::<f64>()
        .map_err(|e| ClientError::Protocol(format!("bad timestamp {token:?}: {e}")))?;
    if !raw.is_finite() {
        return Err(ClientError::Protocol(format!(
            "timestamp {token:?} is not finite"
        )));
    }
    Ok(raw.trunc() as i64)
}
