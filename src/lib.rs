//! # stream-nexus
//!
//! Polymorphic batch-stream analytics over `tag:value` text records.
//!
//! ## Overview
//!
//! Records arrive in batches, each batch addressed to one stream:
//! - **Sensor streams** average `temp:<float>` readings
//! - **Transaction streams** track the net flow of `buy:<n>` / `sell:<n>`
//! - **Event streams** count events and the ones mentioning `error`
//!
//! Every stream kind implements [`DataStream`], so a [`StreamRegistry`] can
//! dispatch a round of batches and report stats without knowing which kind
//! it is talking to. A batch that fails numeric parsing is rejected whole;
//! the stream's counters stay exactly as they were.
//!
//! ## Example
//!
//! ```
//! use std::collections::HashMap;
//! use stream_nexus::{StreamKind, StreamRegistry, batch};
//!
//! let mut registry = StreamRegistry::new();
//! registry.create(StreamKind::Sensor, "SENSOR_001").unwrap();
//! registry.create(StreamKind::Event, "EVENT_001").unwrap();
//!
//! let mut round = HashMap::new();
//! round.insert(
//!     "SENSOR_001".to_string(),
//!     batch(["temp:20.0", "temp:30.0"]),
//! );
//!
//! let report = registry.dispatch_round(&round);
//! let lines: Vec<String> = report.summaries().map(|s| s.to_string()).collect();
//! assert_eq!(lines[0], "2 readings processed, avg temp: 25.0°C");
//! assert_eq!(lines[1], "0 events, 0 error detected");
//! ```

pub mod config;
pub mod error;
pub mod event;
pub mod processor;
pub mod record;
pub mod registry;
pub mod sensor;
pub mod stats;
pub mod stream;
pub mod transaction;

pub use config::{DuplicatePolicy, EngineConfig};
pub use error::{NexusError, Result};
pub use event::EventStream;
pub use processor::{DataProcessor, LogProcessor, NumericProcessor, TextProcessor};
pub use record::{DEFAULT_DELIMITER, Record, batch, parse_value, split_record};
pub use registry::{RoundEntry, RoundReport, StreamRegistry, dispatch_round};
pub use sensor::SensorStream;
pub use stats::{StatValue, StreamStats, collect_stats};
pub use stream::{
    DataStream, StreamKind, Summary, filter_records, new_stream, new_stream_with_config,
};
pub use transaction::TransactionStream;
