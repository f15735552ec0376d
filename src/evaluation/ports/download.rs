//! Port for fetching the converted document text.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for download operations.
pub type DownloadResult<T> = Result<T, DownloadError>;

/// Fetches a converted file and returns its text.
#[async_trait]
pub trait DocumentDownloader: Send + Sync {
    /// Downloads `url` and decodes the body as UTF-8.
    async fn download(&self, url: &str) -> DownloadResult<String>;
}

/// Errors returned by download adapters.
#[derive(Debug, Clone, Error)]
pub enum DownloadError {
    /// The file host could not be reached.
    #[error("converted document unreachable: {0}")]
    Unreachable(Arc<dyn std::error::Error + Send + Sync>),

    /// The download did not complete within the configured timeout.
    #[error("converted document download timed out")]
    Timeout,

    /// The file host answered with an HTTP error status.
    #[error("converted document download rejected (HTTP {status}): {body}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// The file is not UTF-8 text.
    #[error("converted document is not valid UTF-8")]
    NotUtf8,
}

impl DownloadError {
    /// Wraps a transport error.
    pub fn unreachable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unreachable(Arc::new(err))
    }
}
