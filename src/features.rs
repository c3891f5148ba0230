//! Feature extraction from daily weather records
//!
//! Every model consumes the same four features, in the order given by
//! [`FEATURE_NAMES`].

use crate::models::DailyWeather;

pub const FEATURE_COUNT: usize = 4;

/// Column names in the order models were trained on
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "is_friday",
    "apparent_temperature_mean",
    "precipitation_sum",
    "shortwave_radiation_sum",
];

/// Model input for a single day
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    /// 1.0 on Fridays, 0.0 otherwise
    pub is_friday: f64,
    pub apparent_temperature_mean: f64,
    pub precipitation_sum: f64,
    pub shortwave_radiation_sum: f64,
}

impl FeatureVector {
    /// Features laid out in [`FEATURE_NAMES`] order
    #[must_use]
    pub fn as_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.is_friday,
            self.apparent_temperature_mean,
            self.precipitation_sum,
            self.shortwave_radiation_sum,
        ]
    }

    /// Value at a position in [`FEATURE_NAMES`] order
    #[must_use]
    pub fn get(&self, index: usize) -> Option<f64> {
        self.as_array().get(index).copied()
    }
}

impl From<&DailyWeather> for FeatureVector {
    fn from(day: &DailyWeather) -> Self {
        build(day)
    }
}

/// Derive the model features for one day
#[must_use]
pub fn build(day: &DailyWeather) -> FeatureVector {
    FeatureVector {
        is_friday: if day.is_friday() { 1.0 } else { 0.0 },
        apparent_temperature_mean: day.apparent_temperature_mean(),
        precipitation_sum: day.precipitation_sum,
        shortwave_radiation_sum: day.shortwave_radiation_sum,
    }
}

/// Derive features for every day, preserving order
#[must_use]
pub fn build_matrix(days: &[DailyWeather]) -> Vec<FeatureVector> {
    days.iter().map(build).collect()
}
