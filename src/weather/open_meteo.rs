//! Open-Meteo forecast API client
//!
//! Issues one `GET /forecast` per query for the daily aggregates the models
//! need. Failures are reported as [`ForecastError::Upstream`] and never retried.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, info, instrument, warn};

use super::{DAILY_FIELDS, DailyQuery, WeatherSource};
use crate::config::WeatherConfig;
use crate::error::ForecastError;
use crate::models::DailyWeather;

const SLOW_RESPONSE: Duration = Duration::from_secs(5);

/// Forecast response from `OpenMeteo`, reduced to the daily block
#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    pub daily: Option<DailyData>,
}

/// Daily weather columns from `OpenMeteo`; each entry aligns with `time`
#[derive(Debug, Deserialize)]
pub struct DailyData {
    pub time: Vec<String>,
    pub apparent_temperature_max: Option<Vec<Option<f64>>>,
    pub apparent_temperature_min: Option<Vec<Option<f64>>>,
    pub precipitation_sum: Option<Vec<Option<f64>>>,
    pub shortwave_radiation_sum: Option<Vec<Option<f64>>>,
    pub precipitation_probability_mean: Option<Vec<Option<f64>>>,
    pub uv_index_max: Option<Vec<Option<f64>>>,
    #[serde(rename = "weathercode")]
    pub weather_code: Option<Vec<Option<f64>>>,
}

impl DailyData {
    /// Convert columns into one record per day, rejecting gaps
    pub fn into_records(self) -> Result<Vec<DailyWeather>, ForecastError> {
        let days = self.time.len();
        let columns = [
            ("apparent_temperature_max", &self.apparent_temperature_max),
            ("apparent_temperature_min", &self.apparent_temperature_min),
            ("precipitation_sum", &self.precipitation_sum),
            ("shortwave_radiation_sum", &self.shortwave_radiation_sum),
            ("precipitation_probability_mean", &self.precipitation_probability_mean),
            ("uv_index_max", &self.uv_index_max),
            ("weathercode", &self.weather_code),
        ];

        let mut checked: Vec<&[Option<f64>]> = Vec::with_capacity(columns.len());
        for (name, column) in columns {
            let column = column.as_deref().ok_or_else(|| {
                ForecastError::upstream(format!("Forecast response is missing daily.{name}"))
            })?;
            if column.len() != days {
                return Err(ForecastError::upstream(format!(
                    "daily.{name} has {} values but daily.time has {days}",
                    column.len()
                )));
            }
            checked.push(column);
        }

        self.time
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let date = NaiveDate::parse_from_str(label, "%Y-%m-%d").map_err(|e| {
                    ForecastError::upstream(format!("Unparseable forecast date '{label}': {e}"))
                })?;
                let value = |field: usize| -> Result<f64, ForecastError> {
                    checked[field][i].ok_or_else(|| {
                        ForecastError::upstream(format!(
                            "daily.{} is null for {label}",
                            DAILY_FIELDS[field]
                        ))
                    })
                };

                Ok(DailyWeather {
                    date_label: label.clone(),
                    date,
                    apparent_temperature_max: value(0)?,
                    apparent_temperature_min: value(1)?,
                    precipitation_sum: value(2)?,
                    shortwave_radiation_sum: value(3)?,
                    precipitation_probability_mean: value(4)?,
                    uv_index_max: value(5)?,
                    weather_code: value(6)? as i64,
                })
            })
            .collect()
    }
}

/// Async client for the `OpenMeteo` forecast endpoint
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: Client,
    base_url: String,
}

impl OpenMeteoClient {
    /// Create a client from weather configuration
    pub fn new(config: &WeatherConfig) -> Result<Self, ForecastError> {
        let mut builder = Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if config.timeout_seconds > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout_seconds.into()));
        }

        let client = builder
            .build()
            .map_err(|e| ForecastError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn forecast_url(&self) -> String {
        format!("{}/forecast", self.base_url)
    }
}

#[async_trait]
impl WeatherSource for OpenMeteoClient {
    #[instrument(skip(self, query), fields(start = %query.start, end = %query.end))]
    async fn daily_weather(&self, query: &DailyQuery) -> Result<Vec<DailyWeather>, ForecastError> {
        let location = &query.location;
        info!(
            "Getting daily forecast for coordinates: {}",
            location.format_coordinates()
        );
        let start_time = Instant::now();

        let params = [
            ("latitude", location.latitude.to_string()),
            ("longitude", location.longitude.to_string()),
            ("start_date", query.start.format("%Y-%m-%d").to_string()),
            ("end_date", query.end.format("%Y-%m-%d").to_string()),
            ("daily", DAILY_FIELDS.join(",")),
            ("timezone", location.timezone.clone()),
        ];
        debug!(url = %self.forecast_url(), ?params, "OpenMeteo API request");

        let response = self
            .client
            .get(self.forecast_url())
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                error!("OpenMeteo request failed: {}", e);
                ForecastError::upstream(format!("OpenMeteo request failed: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(%status, body = %body, "OpenMeteo returned an error status");
            return Err(ForecastError::upstream(format!(
                "OpenMeteo returned HTTP {status}"
            )));
        }

        let forecast: ForecastResponse = response.json().await.map_err(|e| {
            error!("Failed to parse forecast response: {}", e);
            ForecastError::upstream(format!("Failed to parse OpenMeteo forecast response: {e}"))
        })?;

        let daily = forecast.daily.ok_or_else(|| {
            ForecastError::upstream("OpenMeteo forecast response has no daily block")
        })?;
        let records = daily.into_records()?;

        let total_duration = start_time.elapsed();
        info!(
            "Retrieved {} daily records in {:.3}s",
            records.len(),
            total_duration.as_secs_f64()
        );
        if total_duration > SLOW_RESPONSE {
            warn!(
                "Slow forecast API response: {:.3}s",
                total_duration.as_secs_f64()
            );
        }
        if records.len() != query.expected_days() {
            warn!(
                expected = query.expected_days(),
                received = records.len(),
                "Forecast day count differs from requested range"
            );
        }

        Ok(records)
    }
}
