//! Raw records and the `tag:value` split contract.
//!
//! A record is one line of semi-structured text such as `temp:22.5`,
//! `buy:100`, or `error`. The tag is everything before the first delimiter
//! and the value everything after it; a record without the delimiter is
//! all tag and has no value.

use std::fmt;
use std::str::FromStr;

use crate::error::{NexusError, Result};

/// Default delimiter between tag and value.
pub const DEFAULT_DELIMITER: char = ':';

/// One raw textual record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Record(String);

impl Record {
    pub fn new(text: impl Into<String>) -> Self {
        Record(text.into())
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(text: &str) -> Self {
        Record(text.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if `pattern` occurs anywhere in the record text.
    pub fn contains(&self, pattern: &str) -> bool {
        self.0.contains(pattern)
    }

    /// Split into `(tag, value)` at the first `delimiter`.
    pub fn split(&self, delimiter: char) -> (&str, Option<&str>) {
        split_record(&self.0, delimiter)
    }
}

impl From<&str> for Record {
    fn from(text: &str) -> Self {
        Record::from_str(text)
    }
}

impl From<String> for Record {
    fn from(text: String) -> Self {
        Record(text)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Build a batch from string literals.
pub fn batch<I, S>(lines: I) -> Vec<Record>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    lines.into_iter().map(Record::new).collect()
}

/// Split `raw` at the first occurrence of `delimiter`.
///
/// Returns the whole string as the tag and `None` as the value when the
/// delimiter is absent. `"temp:"` yields `("temp", Some(""))`.
pub fn split_record(raw: &str, delimiter: char) -> (&str, Option<&str>) {
    match raw.split_once(delimiter) {
        Some((tag, value)) => (tag, Some(value)),
        None => (raw, None),
    }
}

/// Parse the value part of `record` as a number.
///
/// `position` is the record's index within its batch and is carried into
/// the `MalformedRecord` error. A missing value is malformed too.
pub fn parse_value<T>(record: &Record, delimiter: char, position: usize) -> Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    let (_, value) = record.split(delimiter);
    let value = value.ok_or_else(|| {
        NexusError::malformed(
            position,
            record.as_str(),
            format!("missing value after '{delimiter}'"),
        )
    })?;
    value
        .trim()
        .parse::<T>()
        .map_err(|e| NexusError::malformed(position, record.as_str(), e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_first_delimiter_only() {
        assert_eq!(split_record("temp:22.5", ':'), ("temp", Some("22.5")));
        assert_eq!(split_record("a:b:c", ':'), ("a", Some("b:c")));
    }

    #[test]
    fn test_split_without_delimiter() {
        assert_eq!(split_record("error", ':'), ("error", None));
        assert_eq!(split_record("", ':'), ("", None));
    }

    #[test]
    fn test_split_empty_value() {
        assert_eq!(split_record("temp:", ':'), ("temp", Some("")));
    }

    #[test]
    fn test_split_custom_delimiter() {
        let record = Record::from_str("buy=100");
        assert_eq!(record.split('='), ("buy", Some("100")));
        assert_eq!(record.split(':'), ("buy=100", None));
    }

    #[test]
    fn test_parse_float_value() {
        let record = Record::from_str("temp:22.5");
        let value: f64 = parse_value(&record, ':', 0).unwrap();
        assert_eq!(value, 22.5);
    }

    #[test]
    fn test_parse_value_tolerates_whitespace() {
        let record = Record::from_str("buy: 100 ");
        let value: i64 = parse_value(&record, ':', 0).unwrap();
        assert_eq!(value, 100);
    }

    #[test]
    fn test_parse_integer_rejects_float() {
        let record = Record::from_str("buy:10.5");
        let err = parse_value::<i64>(&record, ':', 3).unwrap_err();
        match err {
            NexusError::MalformedRecord {
                position, record, ..
            } => {
                assert_eq!(position, 3);
                assert_eq!(record, "buy:10.5");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_non_numeric_is_malformed() {
        let record = Record::from_str("temp:warm");
        assert!(matches!(
            parse_value::<f64>(&record, ':', 0),
            Err(NexusError::MalformedRecord { .. })
        ));
    }

    #[test]
    fn test_parse_missing_value_is_malformed() {
        let record = Record::from_str("buy");
        let err = parse_value::<i64>(&record, ':', 1).unwrap_err();
        assert!(err.to_string().contains("missing value"));
    }

    #[test]
    fn test_batch_helper() {
        let records = batch(["login", "error"]);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].as_str(), "error");
        assert!(records[1].contains("err"));
    }
}
