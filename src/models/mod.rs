//! Data models for the brewcast service
//!
//! This module contains the core domain models organized by concern:
//! - Location: Site coordinates and timezone the forecast is made for
//! - Target: The fixed, ordered set of demand categories
//! - Weather: Daily weather records returned by the forecast API
//! - Forecast: Per-day results emitted to the caller

pub mod forecast;
pub mod location;
pub mod target;
pub mod weather;

// Re-export all public types for convenient access
pub use forecast::{ForecastResult, round_to_tenth, round_to_unit};
pub use location::Location;
pub use target::Target;
pub use weather::DailyWeather;
