//! Stats snapshots and the reporter that collects them.

use std::collections::BTreeMap;
use std::fmt;

use crate::stream::DataStream;

/// A single observed statistic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatValue {
    Count(u64),
    Float(f64),
    /// Integer rendered with an explicit sign (`+60`, `-5`, `+0`).
    Signed(i64),
}

impl StatValue {
    pub fn as_f64(&self) -> f64 {
        match *self {
            StatValue::Count(n) => n as f64,
            StatValue::Float(x) => x,
            StatValue::Signed(n) => n as f64,
        }
    }

    /// Integer view; `None` for floats.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            StatValue::Count(n) => i64::try_from(n).ok(),
            StatValue::Float(_) => None,
            StatValue::Signed(n) => Some(n),
        }
    }
}

impl fmt::Display for StatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatValue::Count(n) => write!(f, "{n}"),
            StatValue::Float(x) => write!(f, "{x}"),
            StatValue::Signed(n) => write!(f, "{n:+}"),
        }
    }
}

/// Snapshot of a stream's cumulative fields, in declaration order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StreamStats {
    fields: Vec<(&'static str, StatValue)>,
}

impl StreamStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field; a repeated name overwrites the earlier value in place.
    pub fn with(mut self, name: &'static str, value: StatValue) -> Self {
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<StatValue> {
        self.fields
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, StatValue)> + '_ {
        self.fields.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl fmt::Display for StreamStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}={value}")?;
        }
        Ok(())
    }
}

/// Snapshot every stream's stats, keyed by stream id.
///
/// Each stream is queried exactly once. Nothing is processed; streams that
/// share an id collapse to the last one seen.
pub fn collect_stats(streams: &[Box<dyn DataStream>]) -> BTreeMap<String, StreamStats> {
    streams
        .iter()
        .map(|stream| (stream.id().to_string(), stream.stats()))
        .collect()
}
