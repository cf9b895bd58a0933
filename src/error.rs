//! Error types for stream processing.

use thiserror::Error;

/// Errors produced by parsing, stream aggregation, and registration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NexusError {
    /// A record that needed a numeric value could not be parsed.
    ///
    /// `position` is the zero-based index of the record within its batch.
    #[error("malformed record at position {position}: {record:?} ({reason})")]
    MalformedRecord {
        position: usize,
        record: String,
        reason: String,
    },

    /// A batch was addressed to an identifier with no registered stream.
    #[error("no stream registered under id {0:?}")]
    UnknownStreamId(String),

    /// A stream id was registered twice while duplicates are rejected.
    #[error("stream id {0:?} is already registered")]
    DuplicateRegistration(String),

    /// Stream identifiers must be non-empty.
    #[error("stream id must not be empty")]
    InvalidStreamId,

    /// Text did not name a known stream kind.
    #[error("unknown stream kind: {0:?}")]
    UnknownKind(String),

    /// A processor was handed nothing to process.
    #[error("payload is empty")]
    EmptyPayload,

    /// A processor does not understand the payload it was given.
    #[error("unsupported payload: {0}")]
    UnsupportedPayload(String),
}

impl NexusError {
    /// Build a `MalformedRecord` for the record at `position`.
    pub fn malformed(position: usize, record: &str, reason: impl Into<String>) -> Self {
        NexusError::MalformedRecord {
            position,
            record: record.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, NexusError>;
