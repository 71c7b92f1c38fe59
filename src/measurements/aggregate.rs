//! Cleaning and per-province aggregation of one day of station readings.
//!
//! The whole stage is a single lazy polars plan over the fetched table:
//! fill missing readings, fix the one province spelling that differs from
//! the boundary document, drop station metadata, keep the requested date,
//! and average every reading column per province.

use crate::measurements::error::MeasurementError;
use crate::types::indicator::Indicator;
use crate::types::missing_values::MissingValuePolicy;
use log::info;
use polars::prelude::*;
use std::collections::BTreeMap;

pub const PROVINCE_COLUMN: &str = "provincia";
pub const DATE_COLUMN: &str = "fecha";

/// Station metadata that is not averaged.
pub const METADATA_COLUMNS: [&str; 4] = ["estacion", "latitud", "longitud", "posicion"];

/// Spellings used by the measurement dataset mapped to the boundary dataset's.
const PROVINCE_SPELLINGS: [(&str, &str); 1] = [("Avila", "Ávila")];

/// Mean readings of one province on the requested date.
#[derive(Debug, Clone, PartialEq)]
pub struct ProvinceAggregate {
    pub province: String,
    /// Column name to mean value. `None` only under [`MissingValuePolicy::Exclude`]
    /// when no station of the province reported that column.
    pub values: BTreeMap<String, Option<f64>>,
}

impl ProvinceAggregate {
    pub fn value(&self, indicator: Indicator) -> Option<f64> {
        self.values.get(indicator.column()).copied().flatten()
    }
}

/// Result of [`clean_and_aggregate`]: one row per province with stations
/// reporting on the requested date, sorted by province name.
#[derive(Debug, Clone)]
pub struct AggregatedMeasurements {
    /// The aggregated table as polars produced it.
    pub frame: DataFrame,
    rows: Vec<ProvinceAggregate>,
}

impl AggregatedMeasurements {
    fn from_frame(frame: DataFrame) -> Result<Self, MeasurementError> {
        let provinces = frame.column(PROVINCE_COLUMN)?.str()?;
        let mut value_columns = Vec::new();
        for column in frame.get_columns() {
            if column.name().as_str() != PROVINCE_COLUMN {
                value_columns.push((column.name().to_string(), column.f64()?));
            }
        }

        let rows = (0..frame.height())
            .map(|i| ProvinceAggregate {
                province: provinces.get(i).unwrap_or_default().to_string(),
                values: value_columns
                    .iter()
                    .map(|(name, values)| (name.clone(), values.get(i)))
                    .collect(),
            })
            .collect();

        Ok(Self { frame, rows })
    }

    pub fn rows(&self) -> &[ProvinceAggregate] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, province: &str) -> Option<&ProvinceAggregate> {
        self.rows.iter().find(|row| row.province == province)
    }

    /// Mean of `indicator` for `province`, if the province has a row and a value.
    pub fn value(&self, province: &str, indicator: Indicator) -> Option<f64> {
        self.get(province).and_then(|row| row.value(indicator))
    }

    /// Every available mean of `indicator`, in province order.
    pub fn values(&self, indicator: Indicator) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().filter_map(move |row| row.value(indicator))
    }
}

/// Cleans the raw export and averages every reading column per province.
///
/// `row_date` is compared verbatim against the `fecha` column (`YYYY-MM-DD`).
/// Every column other than `provincia`, `fecha` and the station metadata is
/// treated as a reading and cast to `Float64`; values that fail to parse
/// count as missing. Metadata columns absent from the export are ignored,
/// but `provincia` and `fecha` are required.
pub fn clean_and_aggregate(
    frame: &DataFrame,
    row_date: &str,
    policy: MissingValuePolicy,
) -> Result<AggregatedMeasurements, MeasurementError> {
    let names: Vec<String> = frame
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    for required in [PROVINCE_COLUMN, DATE_COLUMN] {
        if !names.iter().any(|name| name == required) {
            return Err(MeasurementError::MissingColumn(required.to_string()));
        }
    }
    let reading_columns: Vec<&str> = names
        .iter()
        .map(String::as_str)
        .filter(|name| {
            *name != PROVINCE_COLUMN && *name != DATE_COLUMN && !METADATA_COLUMNS.contains(name)
        })
        .collect();

    let mut selection = vec![
        province_expr(),
        col(DATE_COLUMN)
            .cast(DataType::String)
            .fill_null(lit("0"))
            .alias(DATE_COLUMN),
    ];
    selection.extend(reading_columns.iter().map(|name| {
        let reading = col(*name).cast(DataType::Float64);
        match policy {
            MissingValuePolicy::FillZero => reading.fill_nan(lit(0.0)).fill_null(lit(0.0)),
            MissingValuePolicy::Exclude => reading.fill_nan(lit(NULL)),
        }
        .alias(*name)
    }));

    // `fecha` is not part of the aggregation list, so it disappears at the group_by.
    let means: Vec<Expr> = reading_columns.iter().map(|name| col(*name).mean()).collect();
    let aggregated = frame
        .clone()
        .lazy()
        .select(selection)
        .filter(col(DATE_COLUMN).eq(lit(row_date)))
        .group_by([col(PROVINCE_COLUMN)])
        .agg(means)
        .sort([PROVINCE_COLUMN], SortMultipleOptions::default())
        .collect()?;

    info!(
        "Aggregated {} rows into {} provinces for {}",
        frame.height(),
        aggregated.height(),
        row_date
    );
    AggregatedMeasurements::from_frame(aggregated)
}

// Missing names become "0", a bucket no boundary feature matches.
fn province_expr() -> Expr {
    let mut province = col(PROVINCE_COLUMN)
        .cast(DataType::String)
        .fill_null(lit("0"));
    for (variant, canonical) in PROVINCE_SPELLINGS {
        province = when(province.clone().eq(lit(variant)))
            .then(lit(canonical))
            .otherwise(province);
    }
    province.alias(PROVINCE_COLUMN)
}
