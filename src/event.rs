//! Event streams: event and error counts.

use tracing::debug;

use crate::config::EngineConfig;
use crate::error::Result;
use crate::record::Record;
use crate::stats::{StatValue, StreamStats};
use crate::stream::{DataStream, StreamKind, Summary};

/// Counts events and the subset whose text contains the error marker.
///
/// No numeric parsing happens here, so a batch never fails.
#[derive(Debug, Clone)]
pub struct EventStream {
    id: String,
    error_marker: String,
    event_count: u64,
    error_count: u64,
}

impl EventStream {
    pub fn new(id: &str) -> Self {
        Self::with_config(id, &EngineConfig::default())
    }

    pub fn with_config(id: &str, config: &EngineConfig) -> Self {
        Self {
            id: id.to_string(),
            error_marker: config.error_marker.clone(),
            event_count: 0,
            error_count: 0,
        }
    }

    pub fn event_count(&self) -> u64 {
        self.event_count
    }

    pub fn error_count(&self) -> u64 {
        self.error_count
    }
}

impl DataStream for EventStream {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> StreamKind {
        StreamKind::Event
    }

    fn process_batch(&mut self, batch: &[Record]) -> Result<Summary> {
        let errors = batch
            .iter()
            .filter(|r| r.contains(&self.error_marker))
            .count();

        self.event_count += batch.len() as u64;
        self.error_count += errors as u64;
        debug!(
            stream_id = %self.id,
            batch_len = batch.len(),
            errors,
            "event batch applied"
        );
        Ok(self.summary(batch.len()))
    }

    fn stats(&self) -> StreamStats {
        StreamStats::new()
            .with("event_count", StatValue::Count(self.event_count))
            .with("error_count", StatValue::Count(self.error_count))
    }
}
