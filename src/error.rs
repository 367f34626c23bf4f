//! Error types and handling for the `AirSense` application

use thiserror::Error;

/// Main error type for the `AirSense` application
#[derive(Error, Debug)]
pub enum AirSenseError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// API communication errors
    #[error("API error: {message}")]
    Api { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Rejected pollutant or weather measurements
    #[error("Invalid measurement: {message}")]
    InvalidMeasurement { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl AirSenseError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new invalid-measurement error
    pub fn invalid_measurement<S: Into<String>>(message: S) -> Self {
        Self::InvalidMeasurement {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            AirSenseError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            AirSenseError::Api { .. } => {
                "Unable to connect to external services. Please check your internet connection."
                    .to_string()
            }
            AirSenseError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            AirSenseError::InvalidMeasurement { message } => {
                format!("Measurement rejected: {message}")
            }
            AirSenseError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}
