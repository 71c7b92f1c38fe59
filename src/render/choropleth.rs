//! Joins the aggregated readings onto the province outlines and describes the
//! resulting choropleth map.

use crate::boundaries::document::{BoundaryDocument, PROVINCE_PROPERTY, VALUE_PROPERTY};
use crate::measurements::aggregate::AggregatedMeasurements;
use crate::render::color_scale::{ColorScale, NAN_FILL_COLOR, YL_OR_RD};
use crate::render::error::RenderError;
use crate::render::html::{embed_in_iframe, render_page};
use crate::types::indicator::Indicator;
use crate::LatLon;
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// Centre of Castilla y León.
pub const MAP_CENTER: LatLon = LatLon(41.997841, -4.694677);
pub const MAP_ZOOM: u8 = 7;
pub const LAYER_NAME: &str = "Calidad Aire CYL";
pub const FILL_OPACITY: f64 = 0.7;
pub const LINE_OPACITY: f64 = 0.2;
pub const MAP_HEIGHT: &str = "650px";

/// Attaches the mean of `indicator` to every feature whose province has an
/// aggregated value, under the `contaminante` property. Other features are
/// returned unchanged.
pub fn annotate_features(
    mut document: BoundaryDocument,
    aggregates: &AggregatedMeasurements,
    indicator: Indicator,
) -> BoundaryDocument {
    for feature in document.features.iter_mut() {
        let value = feature
            .province()
            .and_then(|province| aggregates.value(province, indicator));
        if let Some(value) = value {
            feature
                .properties
                .insert(VALUE_PROPERTY.to_string(), json!(value));
        }
    }
    document
}

/// A fully resolved choropleth: annotated outlines, per-province fills and
/// the legend, ready to be written out as a Leaflet page.
#[derive(Debug, Clone)]
pub struct ChoroplethMap {
    pub center: LatLon,
    pub zoom: u8,
    pub name: String,
    pub indicator: Indicator,
    pub fill_opacity: f64,
    pub line_opacity: f64,
    pub height: String,
    pub scale: Option<ColorScale>,
    /// Fill colour per province name, for every named feature.
    pub fill_colors: BTreeMap<String, &'static str>,
    pub document: BoundaryDocument,
}

impl ChoroplethMap {
    pub fn build(
        document: BoundaryDocument,
        aggregates: &AggregatedMeasurements,
        indicator: Indicator,
    ) -> ChoroplethMap {
        let scale = ColorScale::from_values(aggregates.values(indicator));
        let document = annotate_features(document, aggregates, indicator);

        let fill_colors = document
            .features
            .iter()
            .filter_map(|feature| {
                let province = feature.province()?;
                let color = match (&scale, feature.pollutant_value()) {
                    (Some(scale), Some(value)) => scale.color_for(value),
                    _ => NAN_FILL_COLOR,
                };
                Some((province.to_string(), color))
            })
            .collect();

        ChoroplethMap {
            center: MAP_CENTER,
            zoom: MAP_ZOOM,
            name: LAYER_NAME.to_string(),
            indicator,
            fill_opacity: FILL_OPACITY,
            line_opacity: LINE_OPACITY,
            height: MAP_HEIGHT.to_string(),
            scale,
            fill_colors,
            document,
        }
    }

    pub fn legend(&self) -> &'static str {
        self.indicator.legend()
    }

    pub fn fill_color(&self, province: &str) -> &'static str {
        self.fill_colors
            .get(province)
            .copied()
            .unwrap_or(NAN_FILL_COLOR)
    }

    /// Everything the page script needs, as one JSON object.
    pub fn config(&self) -> Value {
        let legend = self.legend();
        json!({
            "center": [self.center.0, self.center.1],
            "zoom": self.zoom,
            "key": PROVINCE_PROPERTY,
            "choropleth": {
                "name": self.name,
                "fillOpacity": self.fill_opacity,
                "lineOpacity": self.line_opacity,
                "nanFillColor": NAN_FILL_COLOR,
                "colors": self.fill_colors,
            },
            "legend": {
                "title": legend,
                "thresholds": self.scale.as_ref().map(|s| s.thresholds().to_vec()).unwrap_or_default(),
                "colors": YL_OR_RD,
            },
            "overlay": {
                "style": {"fillColor": "#ffffff", "color": "#000000", "fillOpacity": 0.1, "weight": 0.1},
                "highlight": {"fillColor": "#000000", "color": "#000000", "fillOpacity": 0.5, "weight": 0.1},
                "fields": [PROVINCE_PROPERTY, VALUE_PROPERTY],
                "aliases": ["Provincia: ", format!("{legend}: ")],
            },
            "geojson": self.document,
        })
    }

    /// A standalone HTML page showing the map.
    pub fn to_html(&self) -> Result<String, RenderError> {
        render_page(&self.config(), &self.height)
    }

    /// The page wrapped in an `<iframe srcdoc>`, embeddable anywhere in another document.
    pub fn to_embed(&self) -> Result<String, RenderError> {
        Ok(embed_in_iframe(&self.to_html()?, &self.height))
    }
}
