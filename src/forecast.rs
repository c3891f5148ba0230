//! Weekly demand forecast pipeline
//!
//! Fetch weather → build features → predict → format. Input validation lives
//! here so it can be exercised without an HTTP server.

use chrono::{Days, NaiveDate};
use tracing::{info, instrument};

use crate::error::ForecastError;
use crate::features;
use crate::models::{ForecastResult, Location};
use crate::predictor;
use crate::regression::ModelStore;
use crate::weather::{DailyQuery, WeatherSource};

/// Days in one forecast window, including the start date
pub const FORECAST_DAYS: u64 = 7;

pub const MISSING_DATE_MESSAGE: &str =
    r#"Please provide a start date via ?date=YYYY-MM-DD or JSON {"date":"YYYY-MM-DD"}"#;

pub const INVALID_DATE_MESSAGE: &str = "Invalid date format, expected YYYY-MM-DD";

/// Parse a `YYYY-MM-DD` start date
pub fn parse_start_date(raw: &str) -> Result<NaiveDate, ForecastError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| ForecastError::validation(INVALID_DATE_MESSAGE))
}

/// Inclusive `(start, end)` covering [`FORECAST_DAYS`] days
pub fn forecast_window(start: NaiveDate) -> Result<(NaiveDate, NaiveDate), ForecastError> {
    let end = start
        .checked_add_days(Days::new(FORECAST_DAYS - 1))
        .ok_or_else(|| ForecastError::validation(INVALID_DATE_MESSAGE))?;
    Ok((start, end))
}

/// Everything a forecast needs besides the start date
pub struct ForecastService<'a> {
    pub models: &'a ModelStore,
    pub weather: &'a dyn WeatherSource,
    pub location: &'a Location,
}

impl ForecastService<'_> {
    /// Produce one result per day of the week starting at `start`
    #[instrument(skip(self))]
    pub async fn forecast_week(&self, start: NaiveDate) -> Result<Vec<ForecastResult>, ForecastError> {
        let (start, end) = forecast_window(start)?;
        let query = DailyQuery::new(self.location.clone(), start, end);

        let days = self.weather.daily_weather(&query).await?;
        let matrix = features::build_matrix(&days);
        let predictions = predictor::predict_all(self.models, &matrix)?;

        let results: Vec<ForecastResult> = days
            .iter()
            .zip(predictions.iter())
            .map(|(day, raw)| ForecastResult::new(day, raw))
            .collect();

        info!("Generated forecast for {} days from {}", results.len(), start);
        Ok(results)
    }
}


#[cfg(test)]
mod tests {
    use super::stubs::*;
    use super::*;
    use crate::models::Target;
    use crate::regression::store::stubs::linear_store;
    use rstest::rstest;

    fn tokyo() -> Location {
        Location::new(35.6895, 139.6917, "Asia/Tokyo")
    }

    #[rstest]
    #[case("2024-03-01")]
    #[case("2024-02-29")]
    #[case("1999-12-31")]
    fn test_parse_start_date_accepts_iso(#[case] raw: &str) {
        assert!(parse_start_date(raw).is_ok());
    }

    #[rstest]
    #[case("03-01-2024")]
    #[case("2024/03/01")]
    #[case("2023-02-29")]
    #[case("2024-03-01T00:00")]
    #[case("tomorrow")]
    #[case("")]
    fn test_parse_start_date_rejects(#[case] raw: &str) {
        let err = parse_start_date(raw).unwrap_err();
        assert!(matches!(err, ForecastError::Validation { .. }));
        assert_eq!(err.user_message(), INVALID_DATE_MESSAGE);
    }

    #[test]
    fn test_forecast_window_spans_seven_days() {
        let start = NaiveDate::from_ymd_opt(2024, 2, 27).unwrap();
        let (_, end) = forecast_window(start).unwrap();
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
    }

    #[test]
    fn test_forecast_window_overflow() {
        assert!(forecast_window(NaiveDate::MAX).is_err());
    }

    #[tokio::test]
    async fn test_forecast_week_end_to_end() {
        let models = linear_store();
        let weather = FixtureWeather::default();
        let location = tokyo();
        let service = ForecastService {
            models: &models,
            weather: &weather,
            location: &location,
        };

        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let results = service.forecast_week(start).await.unwrap();

        assert_eq!(results.len(), 7);
        let dates: Vec<&str> = results.iter().map(|r| r.date.as_str()).collect();
        assert_eq!(
            dates,
            vec![
                "2024-03-01",
                "2024-03-02",
                "2024-03-03",
                "2024-03-04",
                "2024-03-05",
                "2024-03-06",
                "2024-03-07"
            ]
        );
        // Day 0 of the fixture has a 13.0 apparent temperature mean
        assert_eq!(results[0].apparent_temperature_mean, 13.0);
        assert_eq!(results[0].demand_for(Target::PaleAle), 13);
        assert_eq!(results[0].demand_for(Target::FruitBeer), 63);

        let query = weather.last_query.lock().unwrap().clone().unwrap();
        assert_eq!(query.end, NaiveDate::from_ymd_opt(2024, 3, 7).unwrap());
        assert_eq!(query.location, location);
    }

    #[tokio::test]
    async fn test_forecast_week_is_idempotent() {
        let models = linear_store();
        let weather = FixtureWeather::default();
        let location = tokyo();
        let service = ForecastService {
            models: &models,
            weather: &weather,
            location: &location,
        };

        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let first = service.forecast_week(start).await.unwrap();
        let second = service.forecast_week(start).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_forecast_week_propagates_upstream_error() {
        let models = linear_store();
        let location = tokyo();
        let service = ForecastService {
            models: &models,
            weather: &DownWeather,
            location: &location,
        };

        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let err = service.forecast_week(start).await.unwrap_err();
        assert!(matches!(err, ForecastError::Upstream { .. }));
    }
}
