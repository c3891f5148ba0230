//! Configuration management for the `brewcast` service
//!
//! Handles loading configuration from a TOML file and environment variables,
//! and validates every setting before the server starts.

use crate::ForecastError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "BREWCAST_CONFIG";

/// Root configuration structure for the `brewcast` service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrewcastConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Location the forecast is made for
    #[serde(default)]
    pub site: SiteConfig,
    /// Weather API configuration
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Model artifact location
    #[serde(default)]
    pub models: ModelsConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
}

/// Fixed site the brewery forecasts for
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Latitude in decimal degrees
    #[serde(default = "default_site_latitude")]
    pub latitude: f64,
    /// Longitude in decimal degrees
    #[serde(default = "default_site_longitude")]
    pub longitude: f64,
    /// IANA timezone used to align daily aggregates
    #[serde(default = "default_site_timezone")]
    pub timezone: String,
}

/// Weather API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Base URL for the Open-Meteo API
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    /// Request timeout in seconds, 0 disables the timeout
    #[serde(default = "default_weather_timeout")]
    pub timeout_seconds: u32,
}

/// Model artifact settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsConfig {
    /// Directory holding one `<target>.json` file per target
    #[serde(default = "default_models_directory")]
    pub directory: PathBuf,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    7071
}

fn default_site_latitude() -> f64 {
    35.6895
}

fn default_site_longitude() -> f64 {
    139.6917
}

fn default_site_timezone() -> String {
    "Asia/Tokyo".to_string()
}

fn default_weather_base_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

fn default_weather_timeout() -> u32 {
    30
}

fn default_models_directory() -> PathBuf {
    PathBuf::from("saved_models")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            latitude: default_site_latitude(),
            longitude: default_site_longitude(),
            timezone: default_site_timezone(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_weather_base_url(),
            timeout_seconds: default_weather_timeout(),
        }
    }
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            directory: default_models_directory(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for BrewcastConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            site: SiteConfig::default(),
            weather: WeatherConfig::default(),
            models: ModelsConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl BrewcastConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        let path = std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from);
        Self::load_from_path(path)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| PathBuf::from("config.toml"));

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides, e.g. BREWCAST_SERVER__PORT=8080
        builder = builder.add_source(
            Environment::with_prefix("BREWCAST")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: BrewcastConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.server.host.is_empty() {
            self.server.host = default_server_host();
        }
        if self.site.timezone.is_empty() {
            self.site.timezone = default_site_timezone();
        }
        if self.weather.base_url.is_empty() {
            self.weather.base_url = default_weather_base_url();
        }
        if self.models.directory.as_os_str().is_empty() {
            self.models.directory = default_models_directory();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Address the HTTP listener binds to
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(ForecastError::config("Server port cannot be 0").into());
        }

        if !(-90.0..=90.0).contains(&self.site.latitude) {
            return Err(ForecastError::config(format!(
                "Site latitude {} is outside -90..=90",
                self.site.latitude
            ))
            .into());
        }

        if !(-180.0..=180.0).contains(&self.site.longitude) {
            return Err(ForecastError::config(format!(
                "Site longitude {} is outside -180..=180",
                self.site.longitude
            ))
            .into());
        }

        if self.weather.timeout_seconds > 300 {
            return Err(
                ForecastError::config("Weather API timeout cannot exceed 300 seconds").into(),
            );
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(ForecastError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(ForecastError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if !self.weather.base_url.starts_with("http://")
            && !self.weather.base_url.starts_with("https://")
        {
            return Err(ForecastError::config(
                "Weather API base URL must be a valid HTTP or HTTPS URL",
            )
            .into());
        }

        if self.site.timezone.trim().is_empty() {
            return Err(ForecastError::config("Site timezone cannot be blank").into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = BrewcastConfig::default();
        assert_eq!(config.weather.base_url, "https://api.open-meteo.com/v1");
        assert_eq!(config.weather.timeout_seconds, 30);
        assert_eq!(config.site.timezone, "Asia/Tokyo");
        assert_eq!(config.site.latitude, 35.6895);
        assert_eq!(config.site.longitude, 139.6917);
        assert_eq!(config.models.directory, PathBuf::from("saved_models"));
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = BrewcastConfig::default();
        config.logging.level = "loud".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = BrewcastConfig::default();
        config.weather.timeout_seconds = 500;
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("timeout cannot exceed"));

        let mut config = BrewcastConfig::default();
        config.site.latitude = 91.0;
        assert!(config.validate().is_err());

        let mut config = BrewcastConfig::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_base_url() {
        let mut config = BrewcastConfig::default();
        config.weather.base_url = "ftp://example.com".to_string();
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("HTTP or HTTPS"));
    }

    #[test]
    fn test_apply_defaults_fills_blanks() {
        let mut config = BrewcastConfig::default();
        config.site.timezone.clear();
        config.logging.format.clear();
        config.apply_defaults();
        assert_eq!(config.site.timezone, "Asia/Tokyo");
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(
            file,
            r#"
[server]
port = 8080

[site]
latitude = 52.52
longitude = 13.405
timezone = "Europe/Berlin"

[models]
directory = "/srv/models"
"#
        )
        .unwrap();

        let config = BrewcastConfig::load_from_path(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.site.timezone, "Europe/Berlin");
        assert_eq!(config.models.directory, PathBuf::from("/srv/models"));
        assert_eq!(config.weather.timeout_seconds, 30);
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_load_rejects_invalid_file_values() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(file, "[logging]\nformat = \"xml\"").unwrap();

        let result = BrewcastConfig::load_from_path(Some(file.path().to_path_buf()));
        assert!(result.unwrap_err().to_string().contains("Invalid log format"));
    }
}
