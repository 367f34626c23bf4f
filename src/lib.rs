//! `AirSense` - Personalized air quality monitoring and short-term forecasting
//!
//! This library provides the core functionality for AQI estimation from raw
//! pollutant measurements, weather-driven short-term AQI projection, and
//! personalized health recommendations.

pub mod api;
pub mod aqi;
pub mod config;
pub mod error;
pub mod forecast;
pub mod models;
pub mod recommendation;

// Re-export core types for public API
pub use api::{AirQualityClient, AirQualityReport, ForecastSeries, WeatherClient};
pub use aqi::{AqiCategory, DEFAULT_AQI, classify, estimate_aqi};
pub use config::AirSenseConfig;
pub use error::AirSenseError;
pub use forecast::{FORECAST_HORIZON_POINTS, project_forecast};
pub use models::{CurrentWeather, ForecastPoint, PollutantReading, WeatherObservation};
pub use recommendation::{RecommendationClient, RecommendationRequest};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, AirSenseError>;
