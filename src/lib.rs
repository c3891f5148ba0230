//! `brewcast` - Weekly beer demand forecasting from weather data
//!
//! This library fetches a week of daily weather from Open-Meteo, derives the
//! model features, runs one pretrained regressor per beer style and serves the
//! result over HTTP.

pub mod api;
pub mod config;
pub mod error;
pub mod features;
pub mod forecast;
pub mod models;
pub mod predictor;
pub mod regression;
pub mod telemetry;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use api::AppState;
pub use config::BrewcastConfig;
pub use error::ForecastError;
pub use features::FeatureVector;
pub use forecast::ForecastService;
pub use models::{DailyWeather, ForecastResult, Location, Target};
pub use regression::{CatBoostRegressor, ModelStore, Regressor};
pub use weather::{DailyQuery, OpenMeteoClient, WeatherSource};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, ForecastError>;
