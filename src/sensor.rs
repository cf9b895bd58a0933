//! Sensor streams: running temperature average over `temp:<float>` readings.

use tracing::debug;

use crate::config::EngineConfig;
use crate::error::{NexusError, Result};
use crate::record::{Record, parse_value};
use crate::stats::{StatValue, StreamStats};
use crate::stream::{DataStream, StreamKind, Summary};

/// Aggregates temperature readings.
///
/// Every record counts towards `processed_count`; only records tagged with
/// the sensor tag contribute to the temperature total. The average divides
/// by `processed_count`, so untagged readings pull it down.
#[derive(Debug, Clone)]
pub struct SensorStream {
    id: String,
    tag: String,
    delimiter: char,
    processed_count: u64,
    temperature_total: f64,
}

impl SensorStream {
    pub fn new(id: &str) -> Self {
        Self::with_config(id, &EngineConfig::default())
    }

    pub fn with_config(id: &str, config: &EngineConfig) -> Self {
        Self {
            id: id.to_string(),
            tag: config.sensor_tag.clone(),
            delimiter: config.delimiter,
            processed_count: 0,
            temperature_total: 0.0,
        }
    }

    pub fn processed_count(&self) -> u64 {
        self.processed_count
    }

    /// `temperature_total / processed_count`, or 0 before any record.
    pub fn average_temperature(&self) -> f64 {
        if self.processed_count == 0 {
            0.0
        } else {
            self.temperature_total / self.processed_count as f64
        }
    }
}

impl DataStream for SensorStream {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> StreamKind {
        StreamKind::Sensor
    }

    fn process_batch(&mut self, batch: &[Record]) -> Result<Summary> {
        // Parse everything before touching state.
        let mut total = self.temperature_total;
        for (position, record) in batch.iter().enumerate() {
            let (tag, value) = record.split(self.delimiter);
            if tag != self.tag || value.is_none() {
                continue;
            }
            let reading = parse_value::<f64>(record, self.delimiter, position)?;
            if !reading.is_finite() {
                return Err(NexusError::malformed(
                    position,
                    record.as_str(),
                    "reading is not a finite number",
                ));
            }
            total += reading;
            if !total.is_finite() {
                return Err(NexusError::malformed(
                    position,
                    record.as_str(),
                    "temperature total overflow",
                ));
            }
        }

        self.processed_count += batch.len() as u64;
        self.temperature_total = total;
        debug!(
            stream_id = %self.id,
            batch_len = batch.len(),
            processed_count = self.processed_count,
            "sensor batch applied"
        );
        Ok(self.summary(batch.len()))
    }

    fn stats(&self) -> StreamStats {
        StreamStats::new()
            .with("processed_count", StatValue::Count(self.processed_count))
            .with(
                "average_temperature",
                StatValue::Float(self.average_temperature()),
            )
    }
}
