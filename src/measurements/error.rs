use crate::download::DownloadError;
use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MeasurementError {
    #[error("Invalid measurement export URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Measurement download failed")]
    DownloadIo(#[source] std::io::Error),

    #[error("Failed to parse measurement CSV")]
    CsvParse(#[source] PolarsError),

    #[error("Required column '{0}' not found in measurement data")]
    MissingColumn(String),

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("Failed processing DataFrame: {0}")]
    DataFrameProcessing(#[from] PolarsError),
}

impl From<DownloadError> for MeasurementError {
    fn from(err: DownloadError) -> Self {
        match err {
            DownloadError::NetworkRequest(url, source) => MeasurementError::NetworkRequest(url, source),
            DownloadError::HttpStatus { url, status, source } => MeasurementError::HttpStatus { url, status, source },
            DownloadError::Io(_, source) => MeasurementError::DownloadIo(source),
        }
    }
}
