//! `OnlyOffice` document conversion client.

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::evaluation::ports::{ConversionError, ConversionResult, DocumentConverter};

/// Conversion service client speaking the `OnlyOffice` conversion API.
#[derive(Debug, Clone)]
pub struct OnlyOfficeConverter {
    client: reqwest::Client,
}

impl OnlyOfficeConverter {
    /// Creates a converter on top of a shared HTTP client.
    #[must_use]
    pub const fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct ConversionReply {
    #[serde(default)]
    error: Option<i64>,
    #[serde(default, rename = "fileUrl")]
    file_url: Option<String>,
}

#[async_trait]
impl DocumentConverter for OnlyOfficeConverter {
    async fn convert(&self, url: &str, params: &Value) -> ConversionResult<String> {
        debug!(url, "requesting document conversion");
        let response = self
            .client
            .post(url)
            .header(ACCEPT, "application/json")
            .json(params)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;
        if status.is_client_error() || status.is_server_error() {
            return Err(ConversionError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        parse_conversion_reply(&body)
    }
}

/// Interprets a conversion response body.
///
/// # Errors
///
/// Returns [`ConversionError::Failed`] when the body carries an `error` code
/// and [`ConversionError::MalformedResponse`] when it is not JSON or lacks a
/// `fileUrl`.
pub fn parse_conversion_reply(body: &str) -> ConversionResult<String> {
    let reply: ConversionReply = serde_json::from_str(body)
        .map_err(|err| ConversionError::MalformedResponse(err.to_string()))?;
    if let Some(code) = reply.error {
        return Err(ConversionError::Failed {
            code,
            message: describe_conversion_error(code),
        });
    }
    reply
        .file_url
        .ok_or_else(|| ConversionError::MalformedResponse("response has no fileUrl".to_owned()))
}

/// Maps an `OnlyOffice` conversion error code to its description.
///
/// Codes outside `-1..=-9` map to `"Unknown error"`.
#[must_use]
pub const fn describe_conversion_error(code: i64) -> &'static str {
    match code {
        -2 => "Conversion timeout error",
        -3 => "Conversion error",
        -4 => "Error while downloading the document file to be converted",
        -5 => "Incorrect password",
        -6 => "Error while accessing the conversion result database",
        -7 => "Input error",
        -8 => "Invalid token",
        -9 => "Error when the converter cannot automatically determine the output file format",
        _ => "Unknown error",
    }
}

fn transport_error(err: reqwest::Error) -> ConversionError {
    if err.is_timeout() {
        ConversionError::Timeout
    } else {
        ConversionError::unreachable(err)
    }
}
