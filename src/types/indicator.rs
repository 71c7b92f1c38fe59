//! Defines the `Indicator` enum, mapping the pollutant column codes of the
//! Junta de Castilla y León air-quality dataset to their legend labels.

use std::fmt;
use std::str::FromStr;

/// A pollutant column of the daily air-quality dataset.
///
/// Each variant corresponds to one numeric column of the measurement export
/// (see [`Indicator::column`]) and has a fixed, Spanish-language legend label
/// used in the rendered map (see [`Indicator::legend`]).
///
/// # Examples
///
/// ```
/// use aire_cyl::Indicator;
///
/// let pm10 = Indicator::from_code("pm10_ug_m3").unwrap();
/// assert_eq!(pm10, Indicator::Pm10);
/// assert_eq!(pm10.legend(), "Partículas < 10 µm (µg/m³)");
/// assert!(Indicator::from_code("nh3_ug_m3").is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Indicator {
    /// Carbon monoxide, mg/m³.
    CarbonMonoxide,
    /// Nitric oxide, µg/m³.
    NitricOxide,
    /// Nitrogen dioxide, µg/m³.
    NitrogenDioxide,
    /// Ozone, µg/m³. This is the default indicator.
    #[default]
    Ozone,
    /// Particulate matter below 10 µm, µg/m³.
    Pm10,
    /// Particulate matter below 2.5 µm, µg/m³.
    Pm25,
    /// Sulphur dioxide, µg/m³.
    SulphurDioxide,
}

impl Indicator {
    /// Every known indicator, in the order the dataset lists its columns.
    pub const ALL: [Indicator; 7] = [
        Indicator::CarbonMonoxide,
        Indicator::NitricOxide,
        Indicator::NitrogenDioxide,
        Indicator::Ozone,
        Indicator::Pm10,
        Indicator::Pm25,
        Indicator::SulphurDioxide,
    ];

    /// Resolves a column code into an `Indicator`.
    ///
    /// Returns `None` for codes outside the fixed table of seven pollutants.
    pub fn from_code(code: &str) -> Option<Indicator> {
        Self::ALL.into_iter().find(|indicator| indicator.column() == code)
    }

    /// Name of the measurement column holding this pollutant.
    pub fn column(&self) -> &'static str {
        match self {
            Indicator::CarbonMonoxide => "co_mg_m3",
            Indicator::NitricOxide => "no_ug_m3",
            Indicator::NitrogenDioxide => "no2_ug_m3",
            Indicator::Ozone => "o3_ug_m3",
            Indicator::Pm10 => "pm10_ug_m3",
            Indicator::Pm25 => "pm25_ug_m3",
            Indicator::SulphurDioxide => "so2_ug_m3",
        }
    }

    /// Legend label shown on the map and in the tooltip.
    pub fn legend(&self) -> &'static str {
        match self {
            Indicator::CarbonMonoxide => "Monóxido de Carbono (mg/m³)",
            Indicator::NitricOxide => "Oxido de Nitrógeno (µg/m³)",
            Indicator::NitrogenDioxide => "Dioxido de Nitrógeno (µg/m³)",
            Indicator::Ozone => "Ozono (µg/m³)",
            Indicator::Pm10 => "Partículas < 10 µm (µg/m³)",
            Indicator::Pm25 => "Partículas < 2,5 µm (µg/m³)",
            Indicator::SulphurDioxide => "Dióxido de Azufre (µg/m³)",
        }
    }
}

/// Formats an `Indicator` as its column code.
impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column())
    }
}

/// Returned when parsing a code that is not one of the seven known pollutants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown air quality indicator '{0}'")]
pub struct UnknownIndicator(pub String);

impl FromStr for Indicator {
    type Err = UnknownIndicator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Indicator::from_code(s).ok_or_else(|| UnknownIndicator(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_code_round_trips() {
        for indicator in Indicator::ALL {
            assert_eq!(Indicator::from_code(indicator.column()), Some(indicator));
            assert_eq!(indicator.to_string(), indicator.column());
        }
    }

    #[test]
    fn test_legends_are_distinct() {
        let legends: HashSet<_> = Indicator::ALL.iter().map(|i| i.legend()).collect();
        assert_eq!(legends.len(), 7);
    }

    #[test]
    fn test_legend_table() {
        assert_eq!(Indicator::CarbonMonoxide.legend(), "Monóxido de Carbono (mg/m³)");
        assert_eq!(Indicator::NitricOxide.legend(), "Oxido de Nitrógeno (µg/m³)");
        assert_eq!(Indicator::NitrogenDioxide.legend(), "Dioxido de Nitrógeno (µg/m³)");
        assert_eq!(Indicator::Ozone.legend(), "Ozono (µg/m³)");
        assert_eq!(Indicator::Pm10.legend(), "Partículas < 10 µm (µg/m³)");
        assert_eq!(Indicator::Pm25.legend(), "Partículas < 2,5 µm (µg/m³)");
        assert_eq!(Indicator::SulphurDioxide.legend(), "Dióxido de Azufre (µg/m³)");
    }

    #[test]
    fn test_two_codes_give_different_legends() {
        let a: Indicator = "o3_ug_m3".parse().unwrap();
        let b: Indicator = "so2_ug_m3".parse().unwrap();
        assert_ne!(a.legend(), b.legend());
    }

    // An eighth, unmapped code has no legend at all. It is rejected here
    // instead of leaking an undefined label into the rendered page.
    #[test]
    fn test_unmapped_code_has_no_legend() {
        assert_eq!(Indicator::from_code("nh3_ug_m3"), None);
        let err = "nh3_ug_m3".parse::<Indicator>().unwrap_err();
        assert_eq!(err, UnknownIndicator("nh3_ug_m3".to_string()));
        assert_eq!(err.to_string(), "Unknown air quality indicator 'nh3_ug_m3'");
    }

    #[test]
    fn test_codes_are_case_sensitive() {
        assert_eq!(Indicator::from_code("PM10_UG_M3"), None);
    }

    #[test]
    fn test_default_is_ozone() {
        assert_eq!(Indicator::default(), Indicator::Ozone);
    }
}
