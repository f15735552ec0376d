//! Plain HTTP download of converted documents.

use async_trait::async_trait;
use tracing::debug;

use crate::evaluation::ports::{DocumentDownloader, DownloadError, DownloadResult};

/// Downloads converted files with a `GET` request.
#[derive(Debug, Clone)]
pub struct HttpDocumentDownloader {
    client: reqwest::Client,
}

impl HttpDocumentDownloader {
    /// Creates a downloader on top of a shared HTTP client.
    #[must_use]
    pub const fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DocumentDownloader for HttpDocumentDownloader {
    async fn download(&self, url: &str) -> DownloadResult<String> {
        debug!(url, "downloading converted document");
        let response = self.client.get(url).send().await.map_err(transport_error)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(transport_error)?;
        if status.is_client_error() || status.is_server_error() {
            return Err(DownloadError::Rejected {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }
        String::from_utf8(bytes.to_vec()).map_err(|_| DownloadError::NotUtf8)
    }
}

fn transport_error(err: reqwest::Error) -> DownloadError {
    if err.is_timeout() {
        DownloadError::Timeout
    } else {
        DownloadError::unreachable(err)
    }
}
