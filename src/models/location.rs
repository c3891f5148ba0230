//! Location model for the forecast site

use serde::{Deserialize, Serialize};

use crate::config::SiteConfig;

/// Geographic site plus the timezone daily aggregates are aligned to
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Location {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// IANA timezone name, e.g. `Asia/Tokyo`
    pub timezone: String,
}

impl Location {
    /// Create a new location
    #[must_use]
    pub fn new(latitude: f64, longitude: f64, timezone: impl Into<String>) -> Self {
        Self {
            latitude,
            longitude,
            timezone: timezone.into(),
        }
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

impl From<&SiteConfig> for Location {
    fn from(site: &SiteConfig) -> Self {
        Self::new(site.latitude, site.longitude, site.timezone.clone())
    }
}
