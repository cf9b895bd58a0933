//! The stream contract shared by every record kind.
//!
//! A stream owns cumulative counters for one identifier. Batches are
//! applied atomically: `process_batch` either folds the whole batch into
//! the counters or returns an error and leaves them untouched.

use std::fmt;
use std::str::FromStr;

use crate::config::EngineConfig;
use crate::error::{NexusError, Result};
use crate::event::EventStream;
use crate::record::Record;
use crate::sensor::SensorStream;
use crate::stats::StreamStats;
use crate::transaction::TransactionStream;

/// The record kinds a stream can aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    Sensor,
    Transaction,
    Event,
}

impl StreamKind {
    pub fn name(&self) -> &'static str {
        match self {
            StreamKind::Sensor => "sensor",
            StreamKind::Transaction => "transaction",
            StreamKind::Event => "event",
        }
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StreamKind {
    type Err = NexusError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sensor" => Ok(StreamKind::Sensor),
            "transaction" => Ok(StreamKind::Transaction),
            "event" => Ok(StreamKind::Event),
            _ => Err(NexusError::UnknownKind(s.to_string())),
        }
    }
}

/// Result of one applied batch, carrying the cumulative stats after it.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub stream_id: String,
    pub kind: StreamKind,
    /// Number of records in the batch just applied.
    pub batch_len: usize,
    pub stats: StreamStats,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stat = |name: &str| self.stats.get(name);
        match self.kind {
            StreamKind::Sensor => {
                let count = stat("processed_count").and_then(|v| v.as_i64()).unwrap_or(0);
                let avg = stat("average_temperature").map_or(0.0, |v| v.as_f64());
                write!(f, "{count} readings processed, avg temp: {avg:.1}°C")
            }
            StreamKind::Transaction => {
                let ops = stat("operations").and_then(|v| v.as_i64()).unwrap_or(0);
                let net = stat("net_flow").and_then(|v| v.as_i64()).unwrap_or(0);
                write!(f, "{ops} operations, net flow: {net:+} units")
            }
            StreamKind::Event => {
                let events = stat("event_count").and_then(|v| v.as_i64()).unwrap_or(0);
                let errors = stat("error_count").and_then(|v| v.as_i64()).unwrap_or(0);
                write!(f, "{events} events, {errors} error detected")
            }
        }
    }
}

/// A stateful aggregator over batches of one record kind.
///
/// `process_batch` takes `&mut self`: a stream is mutated by exactly one
/// caller at a time. `filter` and `stats` only read.
pub trait DataStream: Send {
    /// The caller-assigned identifier.
    fn id(&self) -> &str;

    fn kind(&self) -> StreamKind;

    /// Apply a batch and return the cumulative state after it.
    ///
    /// On `MalformedRecord` no counter changes. Applying the same batch
    /// twice counts it twice.
    fn process_batch(&mut self, batch: &[Record]) -> Result<Summary>;

    /// Records whose text contains `criteria`, in their original order.
    ///
    /// `None` or an empty criteria returns the batch unchanged.
    fn filter(&self, batch: &[Record], criteria: Option<&str>) -> Vec<Record> {
        filter_records(batch, criteria)
    }

    /// Snapshot of the cumulative counters. Zero-valued before any batch.
    fn stats(&self) -> StreamStats;

    /// Wrap the current stats in a `Summary` for a batch of `batch_len`.
    fn summary(&self, batch_len: usize) -> Summary {
        Summary {
            stream_id: self.id().to_string(),
            kind: self.kind(),
            batch_len,
            stats: self.stats(),
        }
    }
}

/// Substring filter shared by every stream kind.
pub fn filter_records(batch: &[Record], criteria: Option<&str>) -> Vec<Record> {
    match criteria {
        Some(pattern) if !pattern.is_empty() => batch
            .iter()
            .filter(|r| r.contains(pattern))
            .cloned()
            .collect(),
        _ => batch.to_vec(),
    }
}

/// Create a stream of `kind` with default settings.
pub fn new_stream(kind: StreamKind, id: &str) -> Result<Box<dyn DataStream>> {
    new_stream_with_config(kind, id, &EngineConfig::default())
}

/// Create a stream of `kind` using the markers and delimiter in `config`.
pub fn new_stream_with_config(
    kind: StreamKind,
    id: &str,
    config: &EngineConfig,
) -> Result<Box<dyn DataStream>> {
    if id.is_empty() {
        return Err(NexusError::InvalidStreamId);
    }
    let stream: Box<dyn DataStream> = match kind {
        StreamKind::Sensor => Box::new(SensorStream::with_config(id, config)),
        StreamKind::Transaction => Box::new(TransactionStream::with_config(id, config)),
        StreamKind::Event => Box::new(EventStream::with_config(id, config)),
    };
    Ok(stream)
}
