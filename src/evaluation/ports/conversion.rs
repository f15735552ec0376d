//! Conversion service port.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Result type for conversion operations.
pub type ConversionResult<T> = Result<T, ConversionError>;

/// Renders a source document and returns a URL to the converted file.
#[async_trait]
pub trait DocumentConverter: Send + Sync {
    /// Posts `params` to `url` and returns the converted file URL.
    async fn convert(&self, url: &str, params: &Value) -> ConversionResult<String>;
}

/// Errors returned by conversion adapters.
#[derive(Debug, Clone, Error)]
pub enum ConversionError {
    /// The service could not be reached.
    #[error("conversion service unreachable: {0}")]
    Unreachable(Arc<dyn std::error::Error + Send + Sync>),

    /// The request did not complete within the configured timeout.
    #[error("conversion service timed out")]
    Timeout,

    /// The service answered with an HTTP error status.
    #[error("conversion request rejected (HTTP {status}): {body}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// The service reported a numeric conversion error code.
    #[error("conversion service reported error {code}: {message}")]
    Failed {
        /// Error code from the response payload.
        code: i64,
        /// Description of the error code.
        message: &'static str,
    },

    /// The response carried neither an error code nor a file URL.
    #[error("malformed conversion response: {0}")]
    MalformedResponse(String),
}

impl ConversionError {
    /// Wraps a transport error.
    pub fn unreachable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unreachable(Arc::new(err))
    }
}
