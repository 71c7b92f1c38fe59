mod aire_cyl;
mod boundaries;
mod download;
mod error;
mod measurements;
mod render;
mod types;

pub use aire_cyl::*;
pub use error::AireCylError;

pub use boundaries::document::{BoundaryDocument, BoundaryFeature, PROVINCE_PROPERTY, VALUE_PROPERTY};
pub use boundaries::fetcher::{BoundaryFetcher, BOUNDARIES_URL};
pub use boundaries::error::BoundaryError;

pub use measurements::aggregate::{clean_and_aggregate, AggregatedMeasurements, ProvinceAggregate};
pub use measurements::error::MeasurementError;
pub use measurements::loader::{parse_measurements_csv, MeasurementLoader, MEASUREMENTS_URL};

pub use render::choropleth::{annotate_features, ChoroplethMap};
pub use render::color_scale::{ColorScale, NAN_FILL_COLOR, YL_OR_RD};
pub use render::error::RenderError;

pub use types::indicator::{Indicator, UnknownIndicator};
pub use types::map_request::MapRequest;
pub use types::missing_values::MissingValuePolicy;
