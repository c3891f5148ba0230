//! Error types and handling for the `brewcast` service

use thiserror::Error;

/// Main error type for the `brewcast` service
#[derive(Error, Debug)]
pub enum ForecastError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors, surfaced to the caller as-is
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Weather API communication or payload errors
    #[error("Upstream error: {message}")]
    Upstream { message: String },

    /// Model artifact could not be loaded
    #[error("Startup error: {message}")]
    Startup { message: String },

    /// A model produced unusable output
    #[error("Prediction error: {message}")]
    Prediction { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl ForecastError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new upstream error
    pub fn upstream<S: Into<String>>(message: S) -> Self {
        Self::Upstream {
            message: message.into(),
        }
    }

    /// Create a new startup error
    pub fn startup<S: Into<String>>(message: S) -> Self {
        Self::Startup {
            message: message.into(),
        }
    }

    /// Create a new prediction error
    pub fn prediction<S: Into<String>>(message: S) -> Self {
        Self::Prediction {
            message: message.into(),
        }
    }

    /// Message that is safe to hand back to an HTTP caller
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            ForecastError::Validation { message } => message.clone(),
            ForecastError::Upstream { .. } => {
                "Unable to retrieve weather forecast. Please try again later.".to_string()
            }
            ForecastError::Config { .. }
            | ForecastError::Startup { .. }
            | ForecastError::Prediction { .. }
            | ForecastError::Io { .. } => "Internal server error".to_string(),
        }
    }

    /// Whether the caller is at fault
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, ForecastError::Validation { .. })
    }
}
