//! Stream registry and round dispatch.
//!
//! A round hands each stream the batch addressed to its id. Streams run in
//! registration order, a stream with no batch gets an empty one, and a
//! failing stream does not stop the others.

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, warn};

use crate::config::{DuplicatePolicy, EngineConfig};
use crate::error::{NexusError, Result};
use crate::record::Record;
use crate::stats::{StreamStats, collect_stats};
use crate::stream::{DataStream, StreamKind, Summary, new_stream_with_config};

/// One stream's outcome within a round.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundEntry {
    pub stream_id: String,
    pub outcome: Result<Summary>,
}

impl RoundEntry {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Everything a round produced.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RoundReport {
    /// One entry per registered stream, in registration order.
    pub entries: Vec<RoundEntry>,
    /// `UnknownStreamId` for each batch id with no stream, sorted by id.
    pub unmatched: Vec<NexusError>,
}

impl RoundReport {
    pub fn summaries(&self) -> impl Iterator<Item = &Summary> {
        self.entries.iter().filter_map(|e| e.outcome.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &NexusError)> {
        self.entries
            .iter()
            .filter_map(|e| match &e.outcome {
                Ok(_) => None,
                Err(err) => Some((e.stream_id.as_str(), err)),
            })
    }

    pub fn entry(&self, stream_id: &str) -> Option<&RoundEntry> {
        self.entries.iter().find(|e| e.stream_id == stream_id)
    }
}

/// Run one round over `streams`.
///
/// Entries follow the order of `streams`, not of `batches`. Ids in
/// `batches` that match no stream are ignored here.
pub fn dispatch_round(
    streams: &mut [Box<dyn DataStream>],
    batches: &HashMap<String, Vec<Record>>,
) -> Vec<RoundEntry> {
    streams
        .iter_mut()
        .map(|stream| {
            let batch = batches
                .get(stream.id())
                .map(Vec::as_slice)
                .unwrap_or_default();
            let outcome = stream.process_batch(batch);
            if let Err(err) = &outcome {
                warn!(stream_id = stream.id(), error = %err, "batch rejected");
            }
            RoundEntry {
                stream_id: stream.id().to_string(),
                outcome,
            }
        })
        .collect()
}

/// Owns streams keyed by id.
pub struct StreamRegistry {
    config: EngineConfig,
    streams: Vec<Box<dyn DataStream>>,
    index: HashMap<String, usize>,
}

impl Default for StreamRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamRegistry {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            streams: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Build a stream from the registry's config and register it.
    pub fn create(&mut self, kind: StreamKind, id: &str) -> Result<()> {
        let stream = new_stream_with_config(kind, id, &self.config)?;
        self.register(stream).map(|_| ())
    }

    /// Register `stream` under its own id.
    ///
    /// Under `DuplicatePolicy::Replace` an existing stream with the same id
    /// is swapped out in place, keeping its dispatch position, and returned.
    /// Under `Reject` the call fails with `DuplicateRegistration`.
    pub fn register(
        &mut self,
        stream: Box<dyn DataStream>,
    ) -> Result<Option<Box<dyn DataStream>>> {
        let id = stream.id().to_string();
        if id.is_empty() {
            return Err(NexusError::InvalidStreamId);
        }

        match self.index.get(&id).copied() {
            Some(slot) => match self.config.duplicate_policy {
                DuplicatePolicy::Reject => Err(NexusError::DuplicateRegistration(id)),
                DuplicatePolicy::Replace => {
                    warn!(stream_id = %id, "replacing previously registered stream");
                    let old = std::mem::replace(&mut self.streams[slot], stream);
                    Ok(Some(old))
                }
            },
            None => {
                debug!(stream_id = %id, kind = %stream.kind(), "stream registered");
                self.index.insert(id, self.streams.len());
                self.streams.push(stream);
                Ok(None)
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&dyn DataStream> {
        self.index.get(id).map(|&slot| self.streams[slot].as_ref())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.streams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    /// Registered ids in dispatch order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.streams.iter().map(|s| s.id())
    }

    pub fn streams(&self) -> &[Box<dyn DataStream>] {
        &self.streams
    }

    /// Apply one batch to the stream registered under `id`.
    pub fn process(&mut self, id: &str, batch: &[Record]) -> Result<Summary> {
        let slot = *self
            .index
            .get(id)
            .ok_or_else(|| NexusError::UnknownStreamId(id.to_string()))?;
        self.streams[slot].process_batch(batch)
    }

    /// Dispatch a round across every registered stream.
    pub fn dispatch_round(&mut self, batches: &HashMap<String, Vec<Record>>) -> RoundReport {
        let mut unmatched: Vec<&String> = batches
            .keys()
            .filter(|id| !self.index.contains_key(id.as_str()))
            .collect();
        unmatched.sort();
        for id in &unmatched {
            warn!(stream_id = %id, "batch addressed to unregistered stream");
        }

        RoundReport {
            entries: dispatch_round(&mut self.streams, batches),
            unmatched: unmatched
                .into_iter()
                .map(|id| NexusError::UnknownStreamId(id.clone()))
                .collect(),
        }
    }

    /// Stats snapshot of every registered stream.
    pub fn stats(&self) -> BTreeMap<String, StreamStats> {
        collect_stats(&self.streams)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::batch;
    use crate::stats::StatValue;
    use crate::stream::new_stream;

    fn round(entries: Vec<(&str, Vec<&str>)>) -> HashMap<String, Vec<Record>> {
        entries
            .into_iter()
            .map(|(id, lines)| (id.to_string(), batch(lines)))
            .collect()
    }

    fn sample_registry() -> StreamRegistry {
        let mut registry = StreamRegistry::new();
        registry.create(StreamKind::Sensor, "SENSOR_001").unwrap();
        registry.create(StreamKind::Transaction, "TRANS_001").unwrap();
        registry.create(StreamKind::Event, "EVENT_001").unwrap();
        registry
    }

    #[test]
    fn test_round_follows_registration_order() {
        let mut registry = sample_registry();
        let report = registry.dispatch_round(&round(vec![
            ("EVENT_001", vec!["login", "error", "logout", "error"]),
            ("TRANS_001", vec!["buy:100", "sell:40"]),
            ("SENSOR_001", vec!["temp:20.0", "temp:30.0"]),
        ]));

        let ids: Vec<&str> = report.entries.iter().map(|e| e.stream_id.as_str()).collect();
        assert_eq!(ids, vec!["SENSOR_001", "TRANS_001", "EVENT_001"]);
        let lines: Vec<String> = report.summaries().map(|s| s.to_string()).collect();
        assert_eq!(
            lines,
            vec![
                "2 readings processed, avg temp: 25.0°C",
                "2 operations, net flow: +60 units",
                "4 events, 2 error detected",
            ]
        );
        assert!(report.unmatched.is_empty());
    }

    #[test]
    fn test_stream_without_batch_is_unchanged() {
        let mut registry = sample_registry();
        registry
            .process("EVENT_001", &batch(["error", "login"]))
            .unwrap();
        let before = registry.stats()["EVENT_001"].clone();

        let report = registry.dispatch_round(&round(vec![("SENSOR_001", vec!["temp:22.0"])]));

        let entry = report.entry("EVENT_001").unwrap();
        assert_eq!(entry.outcome.as_ref().unwrap().batch_len, 0);
        assert_eq!(registry.stats()["EVENT_001"], before);
        assert_eq!(
            registry.stats()["SENSOR_001"].get("processed_count"),
            Some(StatValue::Count(1))
        );
    }

    #[test]
    fn test_failure_is_isolated() {
        let mut registry = sample_registry();
        let report = registry.dispatch_round(&round(vec![
            ("SENSOR_001", vec!["temp:oops"]),
            ("TRANS_001", vec!["buy:10"]),
        ]));

        let failures: Vec<(&str, &NexusError)> = report.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, "SENSOR_001");
        assert!(matches!(failures[0].1, NexusError::MalformedRecord { .. }));
        assert!(report.entry("TRANS_001").unwrap().is_ok());
        assert_eq!(report.summaries().count(), 2);

        let stats = registry.stats();
        assert_eq!(
            stats["SENSOR_001"].get("processed_count"),
            Some(StatValue::Count(0))
        );
        assert_eq!(stats["TRANS_001"].get("net_flow"), Some(StatValue::Signed(10)));
    }

    #[test]
    fn test_unmatched_ids_reported() {
        let mut registry = sample_registry();
        let report = registry.dispatch_round(&round(vec![
            ("ZULU", vec!["x"]),
            ("ALPHA", vec!["y"]),
            ("EVENT_001", vec!["error"]),
        ]));
        assert_eq!(
            report.unmatched,
            vec![
                NexusError::UnknownStreamId("ALPHA".to_string()),
                NexusError::UnknownStreamId("ZULU".to_string()),
            ]
        );
        assert_eq!(report.entries.len(), 3);
    }

    #[test]
    fn test_process_unknown_id() {
        let mut registry = sample_registry();
        assert_eq!(
            registry.process("NOPE", &batch(["error"])),
            Err(NexusError::UnknownStreamId("NOPE".to_string()))
        );
    }

    #[test]
    fn test_duplicate_replaces_in_place() {
        let mut registry = sample_registry();
        registry
            .process("SENSOR_001", &batch(["temp:40.0"]))
            .unwrap();

        let old = registry
            .register(new_stream(StreamKind::Event, "SENSOR_001").unwrap())
            .unwrap();
        assert_eq!(old.map(|s| s.kind()), Some(StreamKind::Sensor));
        assert_eq!(registry.len(), 3);
        assert_eq!(
            registry.ids().collect::<Vec<_>>(),
            vec!["SENSOR_001", "TRANS_001", "EVENT_001"]
        );
        assert_eq!(
            registry.get("SENSOR_001").map(|s| s.kind()),
            Some(StreamKind::Event)
        );
    }

    #[test]
    fn test_duplicate_rejected_under_reject_policy() {
        let config = EngineConfig::new().with_duplicate_policy(DuplicatePolicy::Reject);
        let mut registry = StreamRegistry::with_config(config);
        registry.create(StreamKind::Sensor, "S").unwrap();
        registry.process("S", &batch(["temp:5"])).unwrap();

        assert_eq!(
            registry.create(StreamKind::Event, "S"),
            Err(NexusError::DuplicateRegistration("S".to_string()))
        );
        assert_eq!(registry.get("S").map(|s| s.kind()), Some(StreamKind::Sensor));
        assert_eq!(
            registry.stats()["S"].get("processed_count"),
            Some(StatValue::Count(1))
        );
    }

    #[test]
    fn test_registry_uses_config_markers() {
        let config = EngineConfig::new().with_error_marker("FAIL");
        let mut registry = StreamRegistry::with_config(config);
        registry.create(StreamKind::Event, "E").unwrap();
        registry.process("E", &batch(["FAIL", "error"])).unwrap();
        assert_eq!(
            registry.stats()["E"].get("error_count"),
            Some(StatValue::Count(1))
        );
    }

    #[test]
    fn test_free_dispatch_over_slice() {
        let mut streams = vec![
            new_stream(StreamKind::Transaction, "T1").unwrap(),
            new_stream(StreamKind::Transaction, "T2").unwrap(),
        ];
        let entries = dispatch_round(&mut streams, &round(vec![("T2", vec!["sell:9"])]));
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].outcome.as_ref().unwrap().batch_len, 0);
        assert_eq!(
            entries[1].outcome.as_ref().unwrap().stats.get("net_flow"),
            Some(StatValue::Signed(-9))
        );
    }

    #[test]
    fn test_empty_registry_round() {
        let mut registry = StreamRegistry::new();
        assert!(registry.is_empty());
        let report = registry.dispatch_round(&HashMap::new());
        assert_eq!(report, RoundReport::default());
    }
}
