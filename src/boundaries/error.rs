use crate::download::DownloadError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BoundaryError {
    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Boundary download failed")]
    DownloadIo(#[source] std::io::Error),

    #[error("Failed to parse boundary GeoJSON")]
    JsonParse(#[from] serde_json::Error),

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl From<DownloadError> for BoundaryError {
    fn from(err: DownloadError) -> Self {
        match err {
            DownloadError::NetworkRequest(url, source) => BoundaryError::NetworkRequest(url, source),
            DownloadError::HttpStatus { url, status, source } => BoundaryError::HttpStatus { url, status, source },
            DownloadError::Io(_, source) => BoundaryError::DownloadIo(source),
        }
    }
}
