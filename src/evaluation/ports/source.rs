//! Inbound message source port.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for message source operations.
pub type SourceResult<T> = Result<T, SourceError>;

/// Delivers opaque payloads at least once, in no guaranteed order.
#[async_trait]
pub trait MessageSource: Send {
    /// Waits for the next payload.
    ///
    /// Returns `Ok(None)` once the source is exhausted.
    async fn next_message(&mut self) -> SourceResult<Option<Vec<u8>>>;
}

/// Errors returned by message sources.
#[derive(Debug, Clone, Error)]
pub enum SourceError {
    /// Reading from the underlying transport failed.
    #[error("message source I/O error: {0}")]
    Io(Arc<std::io::Error>),
}

impl From<std::io::Error> for SourceError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(Arc::new(err))
    }
}
