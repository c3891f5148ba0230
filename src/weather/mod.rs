//! Daily weather retrieval
//!
//! [`WeatherSource`] is the seam the request handler depends on;
//! [`open_meteo::OpenMeteoClient`] is the production implementation.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::ForecastError;
use crate::models::{DailyWeather, Location};

pub mod open_meteo;

pub use open_meteo::OpenMeteoClient;

/// Daily fields requested from the forecast API, in request order
pub const DAILY_FIELDS: [&str; 7] = [
    "apparent_temperature_max",
    "apparent_temperature_min",
    "precipitation_sum",
    "shortwave_radiation_sum",
    "precipitation_probability_mean",
    "uv_index_max",
    "weathercode",
];

/// Inclusive date range at a fixed site
#[derive(Debug, Clone, PartialEq)]
pub struct DailyQuery {
    pub location: Location,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DailyQuery {
    #[must_use]
    pub fn new(location: Location, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            location,
            start,
            end,
        }
    }

    /// Number of days covered, counting both ends
    #[must_use]
    pub fn expected_days(&self) -> usize {
        usize::try_from((self.end - self.start).num_days() + 1).unwrap_or(0)
    }
}

/// Anything that can produce one weather record per day of a query
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn daily_weather(&self, query: &DailyQuery) -> Result<Vec<DailyWeather>, ForecastError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_days_is_inclusive() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        let query = DailyQuery::new(Location::new(35.0, 139.0, "Asia/Tokyo"), start, end);
        assert_eq!(query.expected_days(), 7);
    }

    #[test]
    fn test_expected_days_reversed_range() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let query = DailyQuery::new(Location::new(35.0, 139.0, "Asia/Tokyo"), start, end);
        assert_eq!(query.expected_days(), 0);
    }
}
