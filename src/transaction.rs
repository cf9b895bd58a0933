//! Transaction streams: net flow of `buy:<n>` and `sell:<n>` operations.

use tracing::debug;

use crate::config::EngineConfig;
use crate::error::{NexusError, Result};
use crate::record::{Record, parse_value};
use crate::stats::{StatValue, StreamStats};
use crate::stream::{DataStream, StreamKind, Summary};

/// Tracks operation count and net flow.
///
/// A record containing the buy marker adds its integer value; one
/// containing the sell marker subtracts it. The buy marker wins if both
/// appear. A record without the delimiter carries no amount and is skipped.
/// Every record counts as an operation.
#[derive(Debug, Clone)]
pub struct TransactionStream {
    id: String,
    buy_marker: String,
    sell_marker: String,
    delimiter: char,
    operations: u64,
    net_flow: i64,
}

impl TransactionStream {
    pub fn new(id: &str) -> Self {
        Self::with_config(id, &EngineConfig::default())
    }

    pub fn with_config(id: &str, config: &EngineConfig) -> Self {
        Self {
            id: id.to_string(),
            buy_marker: config.buy_marker.clone(),
            sell_marker: config.sell_marker.clone(),
            delimiter: config.delimiter,
            operations: 0,
            net_flow: 0,
        }
    }

    pub fn operations(&self) -> u64 {
        self.operations
    }

    pub fn net_flow(&self) -> i64 {
        self.net_flow
    }
}

impl DataStream for TransactionStream {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> StreamKind {
        StreamKind::Transaction
    }

    fn process_batch(&mut self, batch: &[Record]) -> Result<Summary> {
        // Fold into a copy so a rejected batch leaves `net_flow` untouched.
        let mut net_flow = self.net_flow;
        for (position, record) in batch.iter().enumerate() {
            // No delimiter means no amount; the record is only an operation.
            if record.split(self.delimiter).1.is_none() {
                continue;
            }
            let next = if record.contains(&self.buy_marker) {
                let amount = parse_value::<i64>(record, self.delimiter, position)?;
                net_flow.checked_add(amount)
            } else if record.contains(&self.sell_marker) {
                let amount = parse_value::<i64>(record, self.delimiter, position)?;
                net_flow.checked_sub(amount)
            } else {
                continue;
            };
            net_flow = next.ok_or_else(|| {
                NexusError::malformed(position, record.as_str(), "net flow overflow")
            })?;
        }

        self.operations += batch.len() as u64;
        self.net_flow = net_flow;
        debug!(
            stream_id = %self.id,
            batch_len = batch.len(),
            net_flow = self.net_flow,
            "transaction batch applied"
        );
        Ok(self.summary(batch.len()))
    }

    fn stats(&self) -> StreamStats {
        StreamStats::new()
            .with("operations", StatValue::Count(self.operations))
            .with("net_flow", StatValue::Signed(self.net_flow))
    }
}
