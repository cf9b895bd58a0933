//! Single-payload processors.
//!
//! Where a stream folds batches into running state, a processor turns one
//! payload into one line of output and keeps nothing between calls.

use crate::error::{NexusError, Result};

/// Stateless processing of one payload.
pub trait DataProcessor {
    type Input: ?Sized;

    /// Describe the payload.
    fn process(&self, input: &Self::Input) -> Result<String>;

    /// True if `process` accepts this payload.
    fn validate(&self, input: &Self::Input) -> bool;

    /// Wrap a `process` result for display.
    fn format_output(&self, result: &str) -> String {
        format!("Processed: {result}")
    }

    /// `process` followed by `format_output`.
    fn run(&self, input: &Self::Input) -> Result<String> {
        self.process(input).map(|r| self.format_output(&r))
    }
}

/// Count, sum, and mean of a list of numbers.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumericProcessor;

impl DataProcessor for NumericProcessor {
    type Input = [f64];

    fn process(&self, input: &[f64]) -> Result<String> {
        if input.is_empty() {
            return Err(NexusError::EmptyPayload);
        }
        let sum: f64 = input.iter().sum();
        let avg = sum / input.len() as f64;
        Ok(format!(
            "Processed {} numeric values, sum={sum}, avg={avg}",
            input.len()
        ))
    }

    fn validate(&self, input: &[f64]) -> bool {
        !input.is_empty() && input.iter().all(|x| x.is_finite())
    }

    fn format_output(&self, result: &str) -> String {
        format!("Output: {result}")
    }
}

/// Character and word counts of a text.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextProcessor;

impl DataProcessor for TextProcessor {
    type Input = str;

    fn process(&self, input: &str) -> Result<String> {
        Ok(format!(
            "Processed text: {} characters, {} words",
            input.chars().count(),
            input.split_whitespace().count()
        ))
    }

    fn validate(&self, _input: &str) -> bool {
        true
    }

    fn format_output(&self, result: &str) -> String {
        format!("Output: {result}")
    }
}

/// Level detection for `LEVEL: message` log lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogProcessor;

impl DataProcessor for LogProcessor {
    type Input = str;

    fn process(&self, input: &str) -> Result<String> {
        let (level, message) = input
            .split_once(':')
            .ok_or_else(|| NexusError::UnsupportedPayload(format!("no log level in {input:?}")))?;
        let message = message.trim();
        match level.trim() {
            "ERROR" => Ok(format!("[ALERT] ERROR level detected: {message}")),
            "INFO" => Ok(format!("[INFO] INFO level detected: {message}")),
            other => Err(NexusError::UnsupportedPayload(format!(
                "unknown log level {other:?}"
            ))),
        }
    }

    fn validate(&self, input: &str) -> bool {
        ["ERROR", "INFO"].iter().any(|level| input.contains(level))
    }

    fn format_output(&self, result: &str) -> String {
        format!("Output: {result}")
    }
}
