//! Contains `MapRequest`, the normalized form of the date and pollutant
//! selection submitted by the caller.

use crate::types::indicator::Indicator;
use chrono::{Datelike, NaiveDate};

const DEFAULT_DAY: &str = "01";
const DEFAULT_MONTH: &str = "01";
const DEFAULT_YEAR: &str = "1997";
const DEFAULT_INDICATOR: &str = "o3_ug_m3";

/// The date and indicator a map is rendered for.
///
/// All fields are kept as the strings the caller sent. Only emptiness is
/// handled (by substituting defaults); the values are never range checked,
/// so a month of `"13"` flows through to the upstream query unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MapRequest {
    pub day: String,
    pub month: String,
    pub year: String,
    pub indicator: String,
}

impl MapRequest {
    /// Builds a request from optional form fields.
    ///
    /// A field that is `None` or empty is replaced by its default:
    /// day `"01"`, month `"01"`, year `"1997"`, indicator `"o3_ug_m3"`.
    ///
    /// # Examples
    ///
    /// ```
    /// use aire_cyl::MapRequest;
    ///
    /// let request = MapRequest::normalize(Some("15"), Some(""), None, Some("pm10_ug_m3"));
    /// assert_eq!(request.day, "15");
    /// assert_eq!(request.month, "01");
    /// assert_eq!(request.year, "1997");
    /// assert_eq!(request.indicator, "pm10_ug_m3");
    /// ```
    pub fn normalize(
        day: Option<&str>,
        month: Option<&str>,
        year: Option<&str>,
        indicator: Option<&str>,
    ) -> Self {
        Self {
            day: or_default(day, DEFAULT_DAY),
            month: or_default(month, DEFAULT_MONTH),
            year: or_default(year, DEFAULT_YEAR),
            indicator: or_default(indicator, DEFAULT_INDICATOR),
        }
    }

    /// Builds a request for a calendar date and a known indicator.
    pub fn from_date(date: NaiveDate, indicator: Indicator) -> Self {
        Self {
            day: format!("{:02}", date.day()),
            month: format!("{:02}", date.month()),
            year: date.year().to_string(),
            indicator: indicator.column().to_string(),
        }
    }

    /// The day as two characters (`"5"` becomes `"05"`).
    pub fn padded_day(&self) -> String {
        two_digits(&self.day)
    }

    /// The month as two characters (`"6"` becomes `"06"`).
    pub fn padded_month(&self) -> String {
        two_digits(&self.month)
    }

    /// The date in the `YYYY/MM/DD` form used by the server-side refine filter.
    pub fn filter_date(&self) -> String {
        format!("{}/{}/{}", self.year, self.padded_month(), self.padded_day())
    }

    /// The date in the `YYYY-MM-DD` form stored in the `fecha` column.
    pub fn row_date(&self) -> String {
        format!("{}-{}-{}", self.year, self.padded_month(), self.padded_day())
    }
}

impl Default for MapRequest {
    fn default() -> Self {
        Self::normalize(None, None, None, None)
    }
}

fn or_default(value: Option<&str>, default: &str) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => default.to_string(),
    }
}

// Prefix a zero and keep the last two characters. Longer inputs are truncated
// from the left ("123" -> "23").
fn two_digits(value: &str) -> String {
    let padded: Vec<char> = std::iter::once('0').chain(value.chars()).collect();
    padded[padded.len().saturating_sub(2)..].iter().collect()
}
