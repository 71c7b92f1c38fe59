/// How missing pollutant readings are treated before averaging.
///
/// The dataset leaves a cell empty when a station does not measure a
/// pollutant or had no valid reading that day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MissingValuePolicy {
    /// Replace every missing reading with `0` and include it in the mean.
    ///
    /// A province whose stations report nothing for a pollutant ends up with
    /// a mean of `0`, and sparse provinces are pulled towards zero.
    #[default]
    FillZero,
    /// Leave missing readings out of the mean.
    ///
    /// A province with no reading at all for a pollutant has no value for it.
    Exclude,
}
