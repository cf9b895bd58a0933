//! Engine configuration: record markers, delimiter, and registry policy.

use crate::record::DEFAULT_DELIMITER;

/// What the registry does when an id is registered twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Replace the earlier stream and log a warning.
    #[default]
    Replace,
    /// Refuse the new stream with `NexusError::DuplicateRegistration`.
    Reject,
}

/// Settings shared by streams and the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub delimiter: char,
    /// Tag a sensor stream accumulates as temperature.
    pub sensor_tag: String,
    /// Substring marking a transaction record as an inflow.
    pub buy_marker: String,
    /// Substring marking a transaction record as an outflow.
    pub sell_marker: String,
    /// Substring counted as an error by event streams.
    pub error_marker: String,
    pub duplicate_policy: DuplicatePolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            sensor_tag: "temp".to_string(),
            buy_marker: "buy".to_string(),
            sell_marker: "sell".to_string(),
            error_marker: "error".to_string(),
            duplicate_policy: DuplicatePolicy::Replace,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_sensor_tag(mut self, tag: impl Into<String>) -> Self {
        self.sensor_tag = tag.into();
        self
    }

    pub fn with_transaction_markers(
        mut self,
        buy: impl Into<String>,
        sell: impl Into<String>,
    ) -> Self {
        self.buy_marker = buy.into();
        self.sell_marker = sell.into();
        self
    }

    pub fn with_error_marker(mut self, marker: impl Into<String>) -> Self {
        self.error_marker = marker.into();
        self
    }

    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }
}
