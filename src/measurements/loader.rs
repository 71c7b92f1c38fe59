use crate::download::download;
use crate::measurements::error::MeasurementError;
use crate::types::map_request::MapRequest;
use log::info;
use polars::prelude::*;
use reqwest::{Client, Url};
use std::io::Cursor;
use tokio::task;

/// CSV export of the `calidad-del-aire-datos-historicos-diarios` dataset of the Junta de Castilla y León.
pub const MEASUREMENTS_URL: &str = "https://analisis.datosabiertos.jcyl.es/api/explore/v2.1/catalog/datasets/calidad-del-aire-datos-historicos-diarios/exports/csv";

pub struct MeasurementLoader {
    base_url: String,
    client: Client,
}

impl MeasurementLoader {
    pub fn new(client: Client, base_url: &str) -> MeasurementLoader {
        MeasurementLoader {
            base_url: base_url.to_string(),
            client,
        }
    }

    /// Export URL for every station row of the requested day.
    ///
    /// The server filters on `fecha` with the `YYYY/MM/DD` form of the date
    /// and `limit=-1` asks for the whole result in one response.
    pub fn url_for(&self, request: &MapRequest) -> Result<Url, MeasurementError> {
        let mut url = Url::parse(&self.base_url).map_err(|e| MeasurementError::InvalidUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })?;
        url.query_pairs_mut()
            .append_pair("limit", "-1")
            .append_pair("refine", &format!("fecha:\"{}\"", request.filter_date()))
            .append_pair("timezone", "UTC")
            .append_pair("use_labels", "false")
            .append_pair("epsg", "4326");
        Ok(url)
    }

    /// Downloads the day's export and parses it into an eager `DataFrame`.
    pub async fn fetch(&self, request: &MapRequest) -> Result<DataFrame, MeasurementError> {
        let url = self.url_for(request)?;
        let bytes = download(&self.client, url).await?;
        let frame = task::spawn_blocking(move || parse_measurements_csv(bytes)).await??;
        info!(
            "Parsed {} measurement rows for {}",
            frame.height(),
            request.filter_date()
        );
        Ok(frame)
    }
}

/// Parses a semicolon separated export, header included.
///
/// Column types are inferred from every row. Nothing is cleaned here; see
/// [`crate::clean_and_aggregate`].
pub fn parse_measurements_csv(bytes: Vec<u8>) -> Result<DataFrame, MeasurementError> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .map_parse_options(|opts| opts.with_separator(b';'))
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()
        .map_err(MeasurementError::CsvParse)
}
