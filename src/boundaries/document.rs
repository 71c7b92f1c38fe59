//! Serde model of the province boundary GeoJSON.
//!
//! Only the members the map needs are typed. Everything else (`bbox`, extra
//! feature members, every property) is carried through untouched so the
//! document can be handed to the page exactly as it was fetched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Property holding the administrative unit name, used as the join key.
pub const PROVINCE_PROPERTY: &str = "provincia";

/// Property appended to each feature with the aggregated pollutant value.
pub const VALUE_PROPERTY: &str = "contaminante";

/// A GeoJSON `FeatureCollection` of province outlines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryDocument {
    #[serde(rename = "type", default = "feature_collection")]
    pub kind: String,
    #[serde(default)]
    pub features: Vec<BoundaryFeature>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One province outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryFeature {
    #[serde(rename = "type", default = "feature")]
    pub kind: String,
    #[serde(default)]
    pub geometry: Value,
    #[serde(default)]
    pub properties: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn feature_collection() -> String {
    "FeatureCollection".to_string()
}

fn feature() -> String {
    "Feature".to_string()
}

impl BoundaryDocument {
    /// Names of every province in the document, in feature order.
    pub fn provinces(&self) -> Vec<&str> {
        self.features.iter().filter_map(|f| f.province()).collect()
    }
}

impl BoundaryFeature {
    /// The administrative unit name, if the feature carries one.
    pub fn province(&self) -> Option<&str> {
        self.properties.get(PROVINCE_PROPERTY).and_then(Value::as_str)
    }

    /// The aggregated pollutant value attached by the renderer, if any.
    pub fn pollutant_value(&self) -> Option<f64> {
        self.properties.get(VALUE_PROPERTY).and_then(Value::as_f64)
    }
}
