//! Error types for evaluation domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing domain evaluation values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task identifier is empty after trimming.
    #[error("task identifier must not be empty")]
    EmptyTaskId,

    /// The score lies outside the accepted `0..=100` range.
    #[error("score {0} is outside the range 0..=100")]
    ScoreOutOfRange(i64),
}

/// Error returned while parsing task statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Errors returned while decoding a raw queue payload into a task message.
#[derive(Debug, Error)]
pub enum MessageDecodeError {
    /// The payload bytes are not valid UTF-8.
    #[error("payload is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    /// The payload is not a JSON task message.
    #[error("payload is not a valid task message: {0}")]
    InvalidJson(#[from] serde_json::Error),
}
