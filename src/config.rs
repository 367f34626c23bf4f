//! Configuration management for the `AirSense` application
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::AirSenseError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the `AirSense` application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirSenseConfig {
    /// Weather provider configuration
    pub weather: WeatherConfig,
    /// Air quality provider configuration
    pub air_quality: AirQualityConfig,
    /// AI recommendation gateway configuration
    pub ai: AiConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Weather provider (OpenWeatherMap) configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// OpenWeatherMap API key
    pub api_key: Option<String>,
    /// Base URL for the weather API
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
}

/// Air quality provider (OpenAQ) configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirQualityConfig {
    /// Base URL for the air quality API
    #[serde(default = "default_air_quality_base_url")]
    pub base_url: String,
    /// Station search radius around the requested coordinates, in meters
    #[serde(default = "default_search_radius")]
    pub radius_meters: u32,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
}

/// AI recommendation gateway configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// Gateway API key
    pub api_key: Option<String>,
    /// OpenAI-compatible chat completions gateway base URL
    #[serde(default = "default_ai_gateway_url")]
    pub gateway_url: String,
    /// Model identifier passed to the gateway
    #[serde(default = "default_ai_model")]
    pub model: String,
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
fn default_weather_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_air_quality_base_url() -> String {
    "https://api.openaq.org/v2".to_string()
}

fn default_ai_gateway_url() -> String {
    "https://ai.gateway.lovable.dev/v1".to_string()
}

fn default_ai_model() -> String {
    "google/gemini-2.5-flash".to_string()
}

fn default_timeout() -> u32 {
    30
}

fn default_search_radius() -> u32 {
    25_000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for AirSenseConfig {
    fn default() -> Self {
        Self {
            weather: WeatherConfig {
                api_key: None,
                base_url: default_weather_base_url(),
                timeout_seconds: default_timeout(),
            },
            air_quality: AirQualityConfig {
                base_url: default_air_quality_base_url(),
                radius_meters: default_search_radius(),
                timeout_seconds: default_timeout(),
            },
            ai: AiConfig {
                api_key: None,
                gateway_url: default_ai_gateway_url(),
                model: default_ai_model(),
            },
            logging: LoggingConfig {
                level: default_log_level(),
                format: default_log_format(),
            },
        }
    }
}

impl AirSenseConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Add environment variable overrides with AIRSENSE_ prefix
        builder = builder.add_source(
            Environment::with_prefix("AIRSENSE")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: AirSenseConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("airsense").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.weather.base_url.is_empty() {
            self.weather.base_url = default_weather_base_url();
        }
        if self.weather.timeout_seconds == 0 {
            self.weather.timeout_seconds = default_timeout();
        }
        if self.air_quality.base_url.is_empty() {
            self.air_quality.base_url = default_air_quality_base_url();
        }
        if self.air_quality.radius_meters == 0 {
            self.air_quality.radius_meters = default_search_radius();
        }
        if self.air_quality.timeout_seconds == 0 {
            self.air_quality.timeout_seconds = default_timeout();
        }
        if self.ai.gateway_url.is_empty() {
            self.ai.gateway_url = default_ai_gateway_url();
        }
        if self.ai.model.is_empty() {
            self.ai.model = default_ai_model();
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
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate API keys and credentials
    fn validate_api_keys(&self) -> Result<()> {
        for (name, api_key) in [("Weather", &self.weather.api_key), ("AI", &self.ai.api_key)] {
            if let Some(api_key) = api_key {
                if api_key.is_empty() {
                    return Err(AirSenseError::config(format!(
                        "{name} API key cannot be empty if provided. Either remove it or provide a valid key."
                    ))
                    .into());
                }

                if api_key.len() < 8 {
                    return Err(AirSenseError::config(format!(
                        "{name} API key appears to be invalid (too short). Please check your API key."
                    ))
                    .into());
                }
            }
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.weather.timeout_seconds > 300 || self.air_quality.timeout_seconds > 300 {
            return Err(AirSenseError::config(
                "Request timeout cannot exceed 300 seconds.",
            )
            .into());
        }

        if self.air_quality.radius_meters > 100_000 {
            return Err(AirSenseError::config(
                "Air quality search radius cannot exceed 100km.",
            )
            .into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(AirSenseError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_levels.join(", ")
            ))
            .into());
        }

        let valid_formats = ["pretty", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(AirSenseError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_formats.join(", ")
            ))
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AirSenseConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.air_quality.radius_meters, 25_000);
        assert!(config.weather.base_url.contains("openweathermap"));
    }

    #[test]
    fn test_rejects_short_api_key() {
        let mut config = AirSenseConfig::default();
        config.weather.api_key = Some("short".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_excessive_timeout() {
        let mut config = AirSenseConfig::default();
        config.weather.timeout_seconds = 301;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_unknown_log_level() {
        let mut config = AirSenseConfig::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_apply_defaults_fills_empty_fields() {
        let mut config = AirSenseConfig::default();
        config.weather.base_url = String::new();
        config.air_quality.radius_meters = 0;
        config.apply_defaults();
        assert!(!config.weather.base_url.is_empty());
        assert_eq!(config.air_quality.radius_meters, 25_000);
    }
}
