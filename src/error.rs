use crate::boundaries::error::BoundaryError;
use crate::measurements::error::MeasurementError;
use crate::render::error::RenderError;
use crate::types::indicator::UnknownIndicator;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AireCylError {
    #[error(transparent)]
    Boundary(#[from] BoundaryError),

    #[error(transparent)]
    Measurement(#[from] MeasurementError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    UnknownIndicator(#[from] UnknownIndicator),

    #[error("Failed to build HTTP client")]
    HttpClient(#[source] reqwest::Error),
}
