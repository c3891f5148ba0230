//! Daily weather record model

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// One day of aggregated weather, as returned by the forecast API
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DailyWeather {
    /// Date string exactly as the API returned it
    pub date_label: String,
    /// Parsed calendar date
    pub date: NaiveDate,
    /// Maximum apparent temperature in Celsius
    pub apparent_temperature_max: f64,
    /// Minimum apparent temperature in Celsius
    pub apparent_temperature_min: f64,
    /// Precipitation sum in mm
    pub precipitation_sum: f64,
    /// Shortwave radiation sum in MJ/m²
    pub shortwave_radiation_sum: f64,
    /// Mean precipitation probability (0-100%)
    pub precipitation_probability_mean: f64,
    /// Maximum UV index
    pub uv_index_max: f64,
    /// WMO weather interpretation code
    pub weather_code: i64,
}

impl DailyWeather {
    /// Midpoint of the apparent temperature range
    #[must_use]
    pub fn apparent_temperature_mean(&self) -> f64 {
        (self.apparent_temperature_max + self.apparent_temperature_min) / 2.0
    }

    #[must_use]
    pub fn is_friday(&self) -> bool {
        self.date.weekday() == Weekday::Fri
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::DailyWeather;
    use chrono::NaiveDate;

    /// A week of plausible spring weather starting at `start`
    pub fn week_from(start: NaiveDate) -> Vec<DailyWeather> {
        start
            .iter_days()
            .take(7)
            .enumerate()
            .map(|(i, date)| {
                let offset = i as f64;
                DailyWeather {
                    date_label: date.format("%Y-%m-%d").to_string(),
                    date,
                    apparent_temperature_max: 18.0 + offset,
                    apparent_temperature_min: 8.0 + offset,
                    precipitation_sum: if i % 3 == 0 { 4.2 } else { 0.0 },
                    shortwave_radiation_sum: 12.5 + offset,
                    precipitation_probability_mean: 10.0 * offset,
                    uv_index_max: 4.15 + offset / 10.0,
                    weather_code: if i % 3 == 0 { 61 } else { 2 },
                }
            })
            .collect()
    }
}
