//! Data models for pollutant readings, weather observations and forecast output
//!
//! This module contains the data structures flowing through the estimation
//! pipeline: validated boundary inputs (pollutant and weather data) and the
//! forecast points handed to the presentation layer. Wire-facing structs keep
//! the JSON field names the dashboard frontend expects.

use crate::error::AirSenseError;
use serde::{Deserialize, Serialize};

/// Round for display the way the dashboard frontend does: halves go toward
/// positive infinity, so -10.5 renders as -10
pub(crate) fn round_half_up(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}

/// Raw pollutant measurement from an air quality data provider
///
/// Concentrations are in µg/m³ for particulates and ppb for gases. Fields are
/// optional because providers frequently report only a subset of parameters
/// per station. Immutable once constructed.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PollutantReading {
    /// PM2.5 concentration in µg/m³
    pub pm25: Option<f64>,
    /// PM10 concentration in µg/m³
    pub pm10: Option<f64>,
    /// NO2 concentration in ppb
    pub no2: Option<f64>,
    /// Ozone concentration in ppb
    pub o3: Option<f64>,
    /// Station or area name
    pub location: String,
    /// Provenance tag, e.g. "OpenAQ" or "default"
    pub source: String,
}

impl PollutantReading {
    /// Validate that every present concentration is a finite, non-negative number
    ///
    /// Malformed provider payloads are rejected here, before they reach the
    /// estimator.
    pub fn validate(&self) -> Result<(), AirSenseError> {
        for (name, value) in [
            ("pm25", self.pm25),
            ("pm10", self.pm10),
            ("no2", self.no2),
            ("o3", self.o3),
        ] {
            if let Some(concentration) = value {
                if !concentration.is_finite() {
                    return Err(AirSenseError::invalid_measurement(format!(
                        "{name} is not a finite number"
                    )));
                }
                if concentration < 0.0 {
                    return Err(AirSenseError::invalid_measurement(format!(
                        "{name} is negative: {concentration}"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Current weather conditions at a location
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CurrentWeather {
    /// Temperature in Celsius, rounded for display
    pub temperature: i32,
    /// Relative humidity percentage (0-100)
    pub humidity: u8,
    /// Wind speed in m/s
    #[serde(rename = "windSpeed")]
    pub wind_speed: f64,
    /// Wind direction in degrees (0-360, where 0/360 is North)
    #[serde(rename = "windDirection")]
    pub wind_direction: u16,
    /// Atmospheric pressure in hPa
    pub pressure: f64,
    /// Human-readable description of weather conditions
    pub description: String,
    /// Weather condition icon ID from the provider
    pub icon: Option<String>,
    /// Location name reported by the provider
    pub location: String,
}

/// One forecast time step from the weather provider
///
/// Typically supplied at 3-hour intervals. Consumed by the forecast projector.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WeatherObservation {
    /// Observation timestamp in epoch milliseconds
    pub timestamp_millis: i64,
    /// Temperature in Celsius
    pub temperature_c: f64,
    /// Relative humidity percentage (0-100)
    pub humidity_percent: u8,
    /// Wind speed in m/s
    pub wind_speed_mps: f64,
    /// Human-readable description of weather conditions
    pub weather_description: String,
}

/// One predicted point of the short-term AQI forecast
///
/// The formatted fields (`hour`, `temperature`, `windSpeed`) are part of the
/// contract with the dashboard: tests and display logic depend on the exact
/// rounding, so they are materialized here rather than left to the frontend.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ForecastPoint {
    /// Timestamp in epoch milliseconds
    #[serde(rename = "time")]
    pub timestamp_millis: i64,
    /// Localized 12-hour label, e.g. "8 AM"
    #[serde(rename = "hour")]
    pub hour_label: String,
    /// Predicted AQI, clamped to [0, 500]
    pub aqi: u16,
    /// Temperature in Celsius, rounded to the nearest integer
    #[serde(rename = "temperature")]
    pub temperature_c: i32,
    /// Wind speed in m/s, formatted to one decimal place
    #[serde(rename = "windSpeed")]
    pub wind_speed_mps: String,
    /// Relative humidity percentage (0-100)
    #[serde(rename = "humidity")]
    pub humidity_percent: u8,
    /// Human-readable description of weather conditions
    #[serde(rename = "description")]
    pub weather_description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(pm25: Option<f64>) -> PollutantReading {
        PollutantReading {
            pm25,
            pm10: Some(25.0),
            no2: Some(20.0),
            o3: Some(50.0),
            location: "Test Station".to_string(),
            source: "OpenAQ".to_string(),
        }
    }

    #[test]
    fn test_reading_validation_accepts_missing_fields() {
        assert!(reading(None).validate().is_ok());
        assert!(reading(Some(15.0)).validate().is_ok());
        assert!(reading(Some(0.0)).validate().is_ok());
    }

    #[test]
    fn test_reading_validation_rejects_negative() {
        let err = reading(Some(-1.0)).validate().unwrap_err();
        assert!(matches!(err, AirSenseError::InvalidMeasurement { .. }));
        assert!(err.to_string().contains("pm25"));
    }

    #[test]
    fn test_reading_validation_rejects_non_finite() {
        assert!(reading(Some(f64::NAN)).validate().is_err());
        assert!(reading(Some(f64::INFINITY)).validate().is_err());
    }

    #[test]
    fn test_display_rounding_halves_up() {
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(-10.5), -10);
        assert_eq!(round_half_up(31.6), 32);
        assert_eq!(round_half_up(-0.5), 0);
    }

    #[test]
    fn test_forecast_point_wire_format() {
        let point = ForecastPoint {
            timestamp_millis: 28_800_000,
            hour_label: "8 AM".to_string(),
            aqi: 125,
            temperature_c: 32,
            wind_speed_mps: "6.0".to_string(),
            humidity_percent: 85,
            weather_description: "haze".to_string(),
        };

        let json = serde_json::to_value(&point).unwrap();
        assert_eq!(json["time"], 28_800_000);
        assert_eq!(json["hour"], "8 AM");
        assert_eq!(json["windSpeed"], "6.0");
        assert_eq!(json["temperature"], 32);
        assert_eq!(json["humidity"], 85);
    }
}
