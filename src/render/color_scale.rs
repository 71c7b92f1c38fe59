//! Sequential colour scale used to shade the provinces.

use ordered_float::OrderedFloat;

/// ColorBrewer `YlOrRd` with six classes, light to dark.
pub const YL_OR_RD: [&str; 6] = [
    "#ffffb2", "#fed976", "#feb24c", "#fd8d3c", "#f03b20", "#bd0026",
];

/// Fill for provinces without an aggregated value.
pub const NAN_FILL_COLOR: &str = "black";

/// Six equal-width classes spanning the smallest and largest value.
///
/// A value falls in class `i` when `thresholds[i] < value <= thresholds[i + 1]`;
/// the minimum belongs to the first class.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScale {
    thresholds: Vec<f64>,
}

impl ColorScale {
    /// Builds the scale from the values being mapped. Non-finite values are
    /// skipped; returns `None` when nothing is left.
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Option<ColorScale> {
        let values: Vec<OrderedFloat<f64>> = values
            .into_iter()
            .filter(|v| v.is_finite())
            .map(OrderedFloat)
            .collect();
        let min = values.iter().min()?.into_inner();
        let max = values.iter().max()?.into_inner();

        let classes = YL_OR_RD.len();
        let step = (max - min) / classes as f64;
        let mut thresholds: Vec<f64> = (0..classes).map(|i| min + step * i as f64).collect();
        thresholds.push(max);
        Some(ColorScale { thresholds })
    }

    /// The seven class boundaries, ascending.
    pub fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }

    pub fn color_for(&self, value: f64) -> &'static str {
        let upper = &self.thresholds[1..];
        let class = upper
            .iter()
            .position(|threshold| value <= *threshold)
            .unwrap_or(upper.len() - 1);
        YL_OR_RD[class]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds_are_linear() {
        let scale = ColorScale::from_values([0.0, 30.0, 60.0]).unwrap();
        assert_eq!(
            scale.thresholds(),
            [0.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0]
        );
    }

    #[test]
    fn test_class_boundaries() {
        let scale = ColorScale::from_values([0.0, 60.0]).unwrap();
        assert_eq!(scale.color_for(0.0), "#ffffb2");
        assert_eq!(scale.color_for(10.0), "#ffffb2");
        assert_eq!(scale.color_for(10.5), "#fed976");
        assert_eq!(scale.color_for(45.0), "#f03b20");
        assert_eq!(scale.color_for(60.0), "#bd0026");
        // Values outside the range clamp to the end classes.
        assert_eq!(scale.color_for(-5.0), "#ffffb2");
        assert_eq!(scale.color_for(99.0), "#bd0026");
    }

    #[test]
    fn test_single_value() {
        let scale = ColorScale::from_values([12.5]).unwrap();
        assert_eq!(scale.thresholds().len(), 7);
        assert_eq!(scale.color_for(12.5), "#ffffb2");
    }

    #[test]
    fn test_no_values() {
        assert_eq!(ColorScale::from_values(Vec::new()), None);
        assert_eq!(ColorScale::from_values([f64::NAN]), None);
    }
}
