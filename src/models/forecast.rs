//! Forecast result model and output rounding

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::{DailyWeather, Target};

/// Round to one decimal place, ties to even on the exact stored value
///
/// `value * 10.0` would round once more before the tie check, turning e.g.
/// 5.45 (stored just above the tie) into an exact 54.5. `{:.1}` works on the
/// exact binary expansion instead.
#[must_use]
pub fn round_to_tenth(value: f64) -> f64 {
    format!("{value:.1}").parse().unwrap_or(value)
}

/// Round to the nearest integer, ties to even
#[must_use]
pub fn round_to_unit(value: f64) -> i64 {
    value.round_ties_even() as i64
}

/// One day of weather summary plus predicted demand, as emitted to the caller
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastResult {
    pub date: String,
    pub apparent_temperature_mean: f64,
    pub precipitation_probability_mean: f64,
    pub uv_index_max: f64,
    pub weather_code: i64,
    /// Bottle counts indexed by [`Target::index`]
    pub demand: [i64; Target::COUNT],
}

impl ForecastResult {
    /// Combine a weather record with raw model outputs, applying output rounding
    #[must_use]
    pub fn new(weather: &DailyWeather, raw_predictions: &[f64; Target::COUNT]) -> Self {
        Self {
            date: weather.date_label.clone(),
            apparent_temperature_mean: round_to_tenth(weather.apparent_temperature_mean()),
            precipitation_probability_mean: round_to_tenth(weather.precipitation_probability_mean),
            uv_index_max: round_to_tenth(weather.uv_index_max),
            weather_code: weather.weather_code,
            demand: raw_predictions.map(round_to_unit),
        }
    }

    #[must_use]
    pub fn demand_for(&self, target: Target) -> i64 {
        self.demand[target.index()]
    }
}

// Hand-written so the six targets land as flat fields in `Target::ALL` order.
impl Serialize for ForecastResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(5 + Target::COUNT))?;
        map.serialize_entry("date", &self.date)?;
        map.serialize_entry("apparent_temperature_mean", &self.apparent_temperature_mean)?;
        map.serialize_entry(
            "precipitation_probability_mean",
            &self.precipitation_probability_mean,
        )?;
        map.serialize_entry("uv_index_max", &self.uv_index_max)?;
        map.serialize_entry("weather_code", &self.weather_code)?;
        for target in Target::ALL {
            map.serialize_entry(target.as_str(), &self.demand_for(target))?;
        }
        map.end()
    }
}
