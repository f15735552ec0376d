//! Scoring service port.

use crate::evaluation::domain::{Assessment, ScoringSettings};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for scoring operations.
pub type ScoringResult<T> = Result<T, ScoringError>;

/// Grades document text through a chat-completion service.
#[async_trait]
pub trait DocumentScorer: Send + Sync {
    /// Scores `document` using `settings`, applying defaults for unset values.
    ///
    /// Returns `Ok(None)` when the service answered without invoking the
    /// score callback.
    async fn score(
        &self,
        document: &str,
        settings: &ScoringSettings,
    ) -> ScoringResult<Option<Assessment>>;
}

/// Errors returned by scoring adapters.
#[derive(Debug, Clone, Error)]
pub enum ScoringError {
    /// The service could not be reached.
    #[error("scoring service unreachable: {0}")]
    Unreachable(Arc<dyn std::error::Error + Send + Sync>),

    /// The request did not complete within the configured timeout.
    #[error("scoring service timed out")]
    Timeout,

    /// The service answered with a non-200 status.
    #[error("failed to evaluate document (HTTP {status}): {body}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// The response or the callback arguments could not be interpreted.
    #[error("malformed scoring response: {0}")]
    MalformedResponse(String),
}

impl ScoringError {
    /// Wraps a transport error.
    pub fn unreachable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unreachable(Arc::new(err))
    }
}
