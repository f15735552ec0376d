//! HTTP adapters for the conversion, download and scoring services.
//!
//! All three share one `reqwest` client so that the configured timeout and
//! connection pool apply uniformly.

mod conversion;
mod download;
mod scoring;

pub use conversion::{OnlyOfficeConverter, describe_conversion_error, parse_conversion_reply};
pub use download::HttpDocumentDownloader;
pub use scoring::{
    AssistantMessage, CALLBACK_NAME, ChatChoice, ChatCompletionRequest, ChatCompletionResponse,
    ChatMessage, FunctionCall, OpenAiScorer, ToolCall, collapse_whitespace, completions_url,
    extract_assessment,
};

use std::time::Duration;

/// Builds the HTTP client shared by the service adapters.
///
/// # Errors
///
/// Returns the `reqwest` builder error when the TLS backend cannot be
/// initialised.
pub fn build_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
}
