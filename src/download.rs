//! The HTTP GET shared by both upstream sources.

use futures_util::TryStreamExt;
use log::{info, warn};
use reqwest::{Client, IntoUrl};
use thiserror::Error;
use tokio::io::AsyncReadExt;
use tokio_util::io::StreamReader;

/// Failure of [`download`]. Each source maps it into its own error type.
#[derive(Debug, Error)]
pub(crate) enum DownloadError {
    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Download of {0} failed while reading the body")]
    Io(String, #[source] std::io::Error),
}

/// Sends a GET, rejects non-success statuses and streams the body into memory.
pub(crate) async fn download<U: IntoUrl>(client: &Client, url: U) -> Result<Vec<u8>, DownloadError> {
    let url = url
        .into_url()
        .map_err(|e| DownloadError::NetworkRequest(e.url().map(|u| u.to_string()).unwrap_or_default(), e))?;
    let label = url.to_string();
    info!("Downloading data from {}", label);

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| DownloadError::NetworkRequest(label.clone(), e))?;

    let response = match response.error_for_status() {
        Ok(resp) => resp,
        Err(e) => {
            warn!("HTTP error for {}: {:?}", label, e);
            return Err(if let Some(status) = e.status() {
                DownloadError::HttpStatus {
                    url: label,
                    status,
                    source: e,
                }
            } else {
                DownloadError::NetworkRequest(label, e)
            });
        }
    };

    let stream = response.bytes_stream().map_err(std::io::Error::other);
    let mut reader = StreamReader::new(stream);
    let mut body = Vec::new();
    reader
        .read_to_end(&mut body)
        .await
        .map_err(|e| DownloadError::Io(label.clone(), e))?;
    info!("Downloaded {} bytes from {}", body.len(), label);
    Ok(body)
}
