//! This module provides the main entry point of the crate: a client that runs
//! the whole pipeline from a date and pollutant selection to an embeddable
//! choropleth map of Castilla y León.

use crate::boundaries::document::BoundaryDocument;
use crate::boundaries::fetcher::{BoundaryFetcher, BOUNDARIES_URL};
use crate::error::AireCylError;
use crate::measurements::aggregate::{clean_and_aggregate, AggregatedMeasurements};
use crate::measurements::error::MeasurementError;
use crate::measurements::loader::{MeasurementLoader, MEASUREMENTS_URL};
use crate::render::choropleth::ChoroplethMap;
use crate::types::indicator::Indicator;
use crate::types::map_request::MapRequest;
use crate::types::missing_values::MissingValuePolicy;
use bon::bon;
use log::info;
use reqwest::Client;
use std::time::Duration;
use tokio::task;

/// Timeout applied to each upstream request unless configured otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Represents a geographical coordinate using latitude and longitude.
///
/// Latitude is the first element (index 0), and longitude is the second (index 1).
///
/// # Examples
///
/// ```
/// use aire_cyl::LatLon;
///
/// let valladolid = LatLon(41.6523, -4.7245);
/// assert_eq!(valladolid.0, 41.6523); // Latitude
/// assert_eq!(valladolid.1, -4.7245); // Longitude
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon(pub f64, pub f64);

/// The client running the air-quality map pipeline.
///
/// Every call fetches the province outlines and the day's measurements fresh;
/// nothing is cached between calls, and the client holds no state other than
/// its HTTP connection pool and settings. It can be shared between concurrent
/// requests.
///
/// # Examples
///
/// ```no_run
/// # use aire_cyl::{AireCyl, AireCylError};
/// # #[tokio::main]
/// # async fn main() -> Result<(), AireCylError> {
/// let client = AireCyl::builder().build()?;
///
/// let markup = client
///     .map_html()
///     .day("15")
///     .month("06")
///     .year("2021")
///     .indicator("pm10_ug_m3")
///     .call()
///     .await?;
/// println!("{markup}");
/// # Ok(())
/// # }
/// ```
pub struct AireCyl {
    boundaries: BoundaryFetcher,
    measurements: MeasurementLoader,
    missing_values: MissingValuePolicy,
}

#[bon]
impl AireCyl {
    /// Creates a new client.
    ///
    /// # Arguments
    ///
    /// * `.boundaries_url(&str)`: Optional. GeoJSON export of the province outlines. Defaults to [`BOUNDARIES_URL`].
    /// * `.measurements_url(&str)`: Optional. Base URL of the CSV export of daily measurements; the date filter is appended as query parameters. Defaults to [`MEASUREMENTS_URL`].
    /// * `.timeout(Duration)`: Optional. Timeout for each upstream request. Defaults to [`DEFAULT_TIMEOUT`]; `Duration::ZERO` waits indefinitely.
    /// * `.missing_values(MissingValuePolicy)`: Optional. How missing readings enter the mean. Defaults to [`MissingValuePolicy::FillZero`].
    ///
    /// # Errors
    ///
    /// Returns [`AireCylError::HttpClient`] if the HTTP client cannot be initialised.
    #[builder]
    pub fn new(
        boundaries_url: Option<&str>,
        measurements_url: Option<&str>,
        timeout: Option<Duration>,
        missing_values: Option<MissingValuePolicy>,
    ) -> Result<Self, AireCylError> {
        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);
        let mut client = Client::builder();
        if !timeout.is_zero() {
            client = client.timeout(timeout);
        }
        let client = client.build().map_err(AireCylError::HttpClient)?;

        Ok(Self {
            boundaries: BoundaryFetcher::new(
                client.clone(),
                boundaries_url.unwrap_or(BOUNDARIES_URL),
            ),
            measurements: MeasurementLoader::new(
                client,
                measurements_url.unwrap_or(MEASUREMENTS_URL),
            ),
            missing_values: missing_values.unwrap_or_default(),
        })
    }

    /// Renders the map for optional form fields and returns embeddable markup.
    ///
    /// Empty or absent fields fall back to the defaults of [`MapRequest::normalize`].
    ///
    /// # Arguments
    ///
    /// * `.day(&str)`, `.month(&str)`, `.year(&str)`: Optional. The date to map.
    /// * `.indicator(&str)`: Optional. Pollutant column code, e.g. `"pm10_ug_m3"`.
    ///
    /// # Errors
    ///
    /// Returns [`AireCylError::UnknownIndicator`] before any network request if the
    /// indicator code is not one of the seven known pollutants, and any error of
    /// [`AireCyl::render_map`] or [`ChoroplethMap::to_embed`] otherwise.
    #[builder]
    pub async fn map_html(
        &self,
        day: Option<&str>,
        month: Option<&str>,
        year: Option<&str>,
        indicator: Option<&str>,
    ) -> Result<String, AireCylError> {
        let request = MapRequest::normalize(day, month, year, indicator);
        let map = self.render_map(&request).await?;
        Ok(map.to_embed()?)
    }

    /// Runs the full pipeline for a normalized request.
    ///
    /// The indicator is resolved first, then the outlines and the measurements
    /// are fetched one after the other, aggregated and joined.
    pub async fn render_map(&self, request: &MapRequest) -> Result<ChoroplethMap, AireCylError> {
        let indicator: Indicator = request.indicator.parse()?;
        info!(
            "Rendering {} map for {}",
            indicator,
            request.filter_date()
        );

        let document = self.boundaries().await?;
        let aggregates = self.aggregate(request).await?;
        Ok(ChoroplethMap::build(document, &aggregates, indicator))
    }

    /// Fetches the province outlines.
    pub async fn boundaries(&self) -> Result<BoundaryDocument, AireCylError> {
        Ok(self.boundaries.fetch().await?)
    }

    /// Fetches the requested day's measurements and averages them per province.
    pub async fn aggregate(
        &self,
        request: &MapRequest,
    ) -> Result<AggregatedMeasurements, AireCylError> {
        let frame = self.measurements.fetch(request).await?;
        let row_date = request.row_date();
        let policy = self.missing_values;
        let aggregates =
            task::spawn_blocking(move || clean_and_aggregate(&frame, &row_date, policy))
                .await
                .map_err(MeasurementError::from)??;
        Ok(aggregates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundaries::error::BoundaryError;
    use crate::types::indicator::UnknownIndicator;
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const PROVINCES: [&str; 9] = [
        "Ávila",
        "Burgos",
        "León",
        "Palencia",
        "Salamanca",
        "Segovia",
        "Soria",
        "Valladolid",
        "Zamora",
    ];

    const MEASUREMENTS: &str = "fecha;co_mg_m3;no_ug_m3;no2_ug_m3;o3_ug_m3;pm10_ug_m3;pm25_ug_m3;so2_ug_m3;provincia;estacion;latitud;longitud;posicion
2021-06-15;0.2;4;12;80;20;8;2;Valladolid;Valladolid Sur;41.6;-4.7;41.6, -4.7
2021-06-15;0.4;;14;;30;;;Valladolid;Valladolid Centro;41.65;-4.72;41.65, -4.72
2021-06-15;0.1;2;6;70;10;5;1;Burgos;Burgos 4;42.3;-3.7;42.3, -3.7
2021-06-15;;;;64;12;;;Avila;Avila II;40.6;-4.7;40.6, -4.7
2021-06-14;9;9;9;9;9;9;9;León;León 4;42.6;-5.6;42.6, -5.6
";

    fn boundaries_json() -> Vec<u8> {
        let features: Vec<Value> = PROVINCES
            .iter()
            .map(|name| {
                json!({
                    "type": "Feature",
                    "geometry": {"type": "Point", "coordinates": [-4.7, 41.6]},
                    "properties": {"provincia": name, "ccaa": "Castilla y León"}
                })
            })
            .collect();
        serde_json::to_vec(&json!({"type": "FeatureCollection", "features": features})).unwrap()
    }

    struct Route {
        prefix: &'static str,
        status: u16,
        body: Vec<u8>,
    }

    /// Serves canned responses on a local port and records every requested path.
    async fn serve(routes: Vec<Route>) -> (String, Arc<Mutex<Vec<String>>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        let routes = Arc::new(routes);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let recorder = seen.clone();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let routes = routes.clone();
                let recorder = recorder.clone();
                tokio::spawn(async move {
                    let mut request = Vec::new();
                    let mut buf = [0u8; 1024];
                    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                        match socket.read(&mut buf).await {
                            Ok(0) | Err(_) => return,
                            Ok(n) => request.extend_from_slice(&buf[..n]),
                        }
                    }
                    let request = String::from_utf8_lossy(&request);
                    let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();
                    recorder.lock().unwrap().push(path.clone());

                    let (status, body) = routes
                        .iter()
                        .find(|route| path.starts_with(route.prefix))
                        .map(|route| (route.status, route.body.clone()))
                        .unwrap_or((404, Vec::new()));
                    let head = format!(
                        "HTTP/1.1 {status} Status\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                        body.len()
                    );
                    let _ = socket.write_all(head.as_bytes()).await;
                    let _ = socket.write_all(&body).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        (format!("http://{address}"), seen)
    }

    /// Accepts connections and never answers them.
    async fn silent() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut open = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                open.push(socket);
            }
        });
        format!("http://{address}")
    }

    async fn local_client() -> (AireCyl, Arc<Mutex<Vec<String>>>) {
        let (base, seen) = serve(vec![
            Route {
                prefix: "/boundaries",
                status: 200,
                body: boundaries_json(),
            },
            Route {
                prefix: "/export",
                status: 200,
                body: MEASUREMENTS.as_bytes().to_vec(),
            },
        ])
        .await;
        let client = AireCyl::builder()
            .boundaries_url(&format!("{base}/boundaries.geojson"))
            .measurements_url(&format!("{base}/export"))
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        (client, seen)
    }

    #[tokio::test]
    async fn test_render_map_end_to_end() -> Result<(), AireCylError> {
        let (client, seen) = local_client().await;
        let request =
            MapRequest::normalize(Some("15"), Some("06"), Some("2021"), Some("pm10_ug_m3"));

        let map = client.render_map(&request).await?;

        assert_eq!(map.legend(), "Partículas < 10 µm (µg/m³)");
        assert_eq!(map.document.features.len(), 9);
        let value = |name: &str| {
            map.document
                .features
                .iter()
                .find(|f| f.province() == Some(name))
                .and_then(|f| f.pollutant_value())
        };
        assert_eq!(value("Valladolid"), Some(25.0));
        assert_eq!(value("Burgos"), Some(10.0));
        assert_eq!(value("Ávila"), Some(12.0));
        assert_eq!(value("León"), None);
        assert_eq!(value("Zamora"), None);

        let paths = seen.lock().unwrap().clone();
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0], "/boundaries.geojson");
        assert!(paths[1].contains("limit=-1"));
        assert!(paths[1].contains("refine=fecha%3A%222021%2F06%2F15%22"));
        Ok(())
    }

    #[tokio::test]
    async fn test_aggregate_has_at_most_one_row_per_province() -> Result<(), AireCylError> {
        let (client, _) = local_client().await;
        let request = MapRequest::normalize(Some("15"), Some("6"), Some("2021"), None);

        let aggregates = client.aggregate(&request).await?;

        assert!(aggregates.len() <= 9);
        let provinces: Vec<&str> = aggregates.rows().iter().map(|r| r.province.as_str()).collect();
        assert_eq!(provinces, ["Burgos", "Valladolid", "Ávila"]);
        assert_eq!(aggregates.value("Valladolid", Indicator::Ozone), Some(40.0));
        Ok(())
    }

    #[tokio::test]
    async fn test_exclude_policy_is_applied() -> Result<(), AireCylError> {
        let (base, _) = serve(vec![Route {
            prefix: "/export",
            status: 200,
            body: MEASUREMENTS.as_bytes().to_vec(),
        }])
        .await;
        let client = AireCyl::builder()
            .measurements_url(&format!("{base}/export"))
            .missing_values(MissingValuePolicy::Exclude)
            .build()?;
        let request = MapRequest::normalize(Some("15"), Some("06"), Some("2021"), None);

        let aggregates = client.aggregate(&request).await?;

        assert_eq!(aggregates.value("Valladolid", Indicator::Ozone), Some(80.0));
        assert_eq!(aggregates.value("Ávila", Indicator::SulphurDioxide), None);
        Ok(())
    }

    #[tokio::test]
    async fn test_day_without_rows_renders_without_values() -> Result<(), AireCylError> {
        let (client, _) = local_client().await;
        let map = client.render_map(&MapRequest::default()).await?;

        assert_eq!(map.legend(), "Ozono (µg/m³)");
        assert!(map.scale.is_none());
        assert!(map
            .document
            .features
            .iter()
            .all(|f| f.pollutant_value().is_none()));
        Ok(())
    }

    #[tokio::test]
    async fn test_map_html_returns_embeddable_markup() -> Result<(), AireCylError> {
        let (client, _) = local_client().await;

        let markup = client
            .map_html()
            .day("15")
            .month("06")
            .year("2021")
            .indicator("pm10_ug_m3")
            .call()
            .await?;

        assert!(markup.starts_with("<div style=\"width:100%;\"><iframe srcdoc="));
        assert!(markup.contains("Partículas &lt; 10 µm (µg/m³)"));
        assert!(markup.contains("Calidad Aire CYL"));
        Ok(())
    }

    #[tokio::test]
    async fn test_indicators_change_only_the_legend() -> Result<(), AireCylError> {
        let (client, _) = local_client().await;
        let ozone = MapRequest::normalize(Some("15"), Some("06"), Some("2021"), Some("o3_ug_m3"));
        let so2 = MapRequest::normalize(Some("15"), Some("06"), Some("2021"), Some("so2_ug_m3"));

        let a = client.render_map(&ozone).await?;
        let b = client.render_map(&so2).await?;

        assert_eq!(a.legend(), "Ozono (µg/m³)");
        assert_eq!(b.legend(), "Dióxido de Azufre (µg/m³)");
        assert_eq!(a.document.provinces(), b.document.provinces());
        Ok(())
    }

    // An unmapped code would leave the legend undefined; it is rejected before
    // anything is fetched.
    #[tokio::test]
    async fn test_unknown_indicator_is_rejected_before_fetching() {
        let (client, seen) = local_client().await;

        let err = client
            .map_html()
            .day("15")
            .month("06")
            .year("2021")
            .indicator("nh3_ug_m3")
            .call()
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AireCylError::UnknownIndicator(UnknownIndicator(ref code)) if code == "nh3_ug_m3"
        ));
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upstream_failure_propagates() {
        let (base, _) = serve(vec![Route {
            prefix: "/boundaries",
            status: 503,
            body: b"unavailable".to_vec(),
        }])
        .await;
        let client = AireCyl::builder()
            .boundaries_url(&format!("{base}/boundaries.geojson"))
            .build()
            .unwrap();

        let err = client.render_map(&MapRequest::default()).await.unwrap_err();
        assert!(matches!(
            err,
            AireCylError::Boundary(BoundaryError::HttpStatus { status, .. }) if status.as_u16() == 503
        ));
    }

    #[tokio::test]
    async fn test_measurement_failure_propagates() {
        let (base, seen) = serve(vec![Route {
            prefix: "/export",
            status: 503,
            body: b"unavailable".to_vec(),
        }])
        .await;
        let client = AireCyl::builder()
            .measurements_url(&format!("{base}/export"))
            .build()
            .unwrap();

        let err = client.aggregate(&MapRequest::default()).await.unwrap_err();
        assert!(matches!(
            err,
            AireCylError::Measurement(MeasurementError::HttpStatus { ref url, status, .. })
                if status.as_u16() == 503 && url.contains("/export?limit=-1")
        ));
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_slow_upstream_times_out() {
        let base = silent().await;
        let client = AireCyl::builder()
            .boundaries_url(&format!("{base}/boundaries.geojson"))
            .timeout(Duration::from_millis(200))
            .build()
            .unwrap();

        let started = std::time::Instant::now();
        let err = client.boundaries().await.unwrap_err();
        assert!(matches!(
            err,
            AireCylError::Boundary(BoundaryError::NetworkRequest(_, ref e)) if e.is_timeout()
        ));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_malformed_boundaries_propagate() {
        let (base, _) = serve(vec![Route {
            prefix: "/boundaries",
            status: 200,
            body: b"<html>not json</html>".to_vec(),
        }])
        .await;
        let client = AireCyl::builder()
            .boundaries_url(&format!("{base}/boundaries.geojson"))
            .build()
            .unwrap();

        let err = client.boundaries().await.unwrap_err();
        assert!(matches!(err, AireCylError::Boundary(BoundaryError::JsonParse(_))));
    }

    #[tokio::test]
    #[ignore = "requires network access"]
    async fn test_live_pm10_map() -> Result<(), AireCylError> {
        let client = AireCyl::builder().build()?;
        let request =
            MapRequest::normalize(Some("15"), Some("06"), Some("2021"), Some("pm10_ug_m3"));

        let document = client.boundaries().await?;
        assert_eq!(document.features.len(), 9);

        let aggregates = client.aggregate(&request).await?;
        assert!(aggregates.len() <= 9);

        let map = client.render_map(&request).await?;
        assert_eq!(map.legend(), "Partículas < 10 µm (µg/m³)");
        Ok(())
    }
}
