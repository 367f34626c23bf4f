//! HTTP clients for the air quality and weather data providers
//!
//! This module provides blocking HTTP client functionality for retrieving the
//! latest pollutant measurements from OpenAQ and current/forecast weather from
//! OpenWeatherMap, mapping provider payloads into validated internal models.

use crate::aqi::estimate_aqi;
use crate::config::AirSenseConfig;
use crate::error::AirSenseError;
use crate::models::{CurrentWeather, PollutantReading, WeatherObservation, round_half_up};
use anyhow::{Context, Result};
use reqwest::blocking::Client;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// User agent sent with every provider request
const USER_AGENT: &str = concat!("AirSense/", env!("CARGO_PKG_VERSION"));

/// AQI reported when the provider has no station near the coordinates
const FALLBACK_AQI: u16 = 75;

/// Latest pollutant measurements plus the AQI estimated from them
#[derive(Debug, Clone)]
pub struct AirQualityReport {
    /// Estimated AQI for the reading
    pub aqi: u16,
    /// The underlying measurement
    pub reading: PollutantReading,
}

/// Ordered forecast observations plus the location's UTC offset
#[derive(Debug, Clone)]
pub struct ForecastSeries {
    /// Observations at 3-hour intervals, earliest first
    pub observations: Vec<WeatherObservation>,
    /// UTC offset of the forecast location in seconds
    pub utc_offset_seconds: i32,
    /// City name reported by the provider
    pub location: String,
}

/// Client for the OpenAQ air quality API
pub struct AirQualityClient {
    client: Client,
    config: AirSenseConfig,
}

impl AirQualityClient {
    /// Create a new air quality client
    pub fn new(config: AirSenseConfig) -> Result<Self> {
        let client = build_http_client(config.air_quality.timeout_seconds)?;
        Ok(Self { client, config })
    }

    /// Fetch the latest measurements near the given coordinates
    ///
    /// When no station reports within the configured radius, degrades to a
    /// canned default report instead of failing.
    #[instrument(skip(self))]
    pub fn fetch_latest(&self, lat: f64, lon: f64) -> Result<AirQualityReport> {
        info!(
            "Fetching air quality for coordinates: {:.4}, {:.4}",
            lat, lon
        );

        let url = format!(
            "{}/latest?coordinates={},{}&radius={}&limit=1",
            self.config.air_quality.base_url, lat, lon, self.config.air_quality.radius_meters
        );
        debug!("OpenAQ request URL: {}", url);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .with_context(|| "Failed to reach OpenAQ API")?;

        if !response.status().is_success() {
            return Err(
                AirSenseError::api(format!("OpenAQ API error: {}", response.status())).into(),
            );
        }

        let latest: openaq::LatestResponse = response
            .json()
            .with_context(|| "Failed to parse OpenAQ latest response")?;

        report_from_latest(latest)
    }
}

/// Map an OpenAQ response into a validated report with an estimated AQI
fn report_from_latest(latest: openaq::LatestResponse) -> Result<AirQualityReport> {
    let Some(result) = latest.results.unwrap_or_default().into_iter().next() else {
        warn!("No air quality stations near coordinates, using default report");
        return Ok(default_report());
    };

    let find = |parameter: &str| {
        result
            .measurements
            .iter()
            .find(|m| m.parameter == parameter)
            .map(|m| m.value)
    };

    let reading = PollutantReading {
        pm25: find("pm25"),
        pm10: find("pm10"),
        no2: find("no2"),
        o3: find("o3"),
        location: result.location,
        source: "OpenAQ".to_string(),
    };
    reading.validate()?;

    let aqi = estimate_aqi(reading.pm25)?;
    Ok(AirQualityReport { aqi, reading })
}

/// Canned report used when no station data is available
fn default_report() -> AirQualityReport {
    AirQualityReport {
        aqi: FALLBACK_AQI,
        reading: PollutantReading {
            pm25: Some(15.0),
            pm10: Some(25.0),
            no2: Some(20.0),
            o3: Some(50.0),
            location: "Estimated".to_string(),
            source: "default".to_string(),
        },
    }
}

/// Client for the OpenWeatherMap API
pub struct WeatherClient {
    client: Client,
    config: AirSenseConfig,
}

impl WeatherClient {
    /// Create a new weather client
    pub fn new(config: AirSenseConfig) -> Result<Self> {
        let client = build_http_client(config.weather.timeout_seconds)?;
        Ok(Self { client, config })
    }

    /// Get current weather conditions at the given coordinates
    #[instrument(skip(self))]
    pub fn current_weather(&self, lat: f64, lon: f64) -> Result<CurrentWeather> {
        info!("Fetching weather for coordinates: {:.4}, {:.4}", lat, lon);

        let url = format!(
            "{}/weather?lat={}&lon={}&units=metric&appid={}",
            self.config.weather.base_url,
            lat,
            lon,
            self.api_key()?
        );

        let response: openweather::WeatherResponse = self
            .get_json(&url)
            .with_context(|| "Failed to fetch current weather from OpenWeatherMap")?;

        Ok(current_from_response(response))
    }

    /// Get the 5-day/3-hour forecast series at the given coordinates
    #[instrument(skip(self))]
    pub fn forecast(&self, lat: f64, lon: f64) -> Result<ForecastSeries> {
        info!("Fetching forecast for coordinates: {:.4}, {:.4}", lat, lon);

        let url = format!(
            "{}/forecast?lat={}&lon={}&units=metric&appid={}",
            self.config.weather.base_url,
            lat,
            lon,
            self.api_key()?
        );

        let response: openweather::ForecastResponse = self
            .get_json(&url)
            .with_context(|| "Failed to fetch forecast from OpenWeatherMap")?;

        let series = series_from_response(response);
        debug!(
            "Retrieved forecast with {} observations",
            series.observations.len()
        );
        Ok(series)
    }

    fn api_key(&self) -> Result<&str> {
        self.config
            .weather
            .api_key
            .as_deref()
            .ok_or_else(|| AirSenseError::config("Weather API key is not configured").into())
    }

    fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .send()
            .with_context(|| "Failed to reach OpenWeatherMap API")?;

        if !response.status().is_success() {
            return Err(AirSenseError::api(format!(
                "OpenWeatherMap API error: {}",
                response.status()
            ))
            .into());
        }

        response
            .json()
            .with_context(|| "Failed to parse OpenWeatherMap response")
    }
}

/// Build a blocking HTTP client with the configured timeout
fn build_http_client(timeout_seconds: u32) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_seconds.into()))
        .user_agent(USER_AGENT)
        .build()
        .with_context(|| "Failed to create HTTP client")
}

/// Map an OpenWeatherMap current-weather response into the internal model
fn current_from_response(response: openweather::WeatherResponse) -> CurrentWeather {
    let condition = response.weather.into_iter().next();
    CurrentWeather {
        temperature: round_half_up(response.main.temp),
        humidity: response.main.humidity,
        wind_speed: response.wind.speed,
        wind_direction: response.wind.deg.unwrap_or(0),
        pressure: response.main.pressure,
        description: condition
            .as_ref()
            .map(|c| c.description.clone())
            .unwrap_or_default(),
        icon: condition.and_then(|c| c.icon),
        location: response.name,
    }
}

/// Map an OpenWeatherMap forecast response into an ordered observation series
fn series_from_response(response: openweather::ForecastResponse) -> ForecastSeries {
    let observations = response
        .list
        .into_iter()
        .map(|entry| WeatherObservation {
            timestamp_millis: entry.dt * 1000,
            temperature_c: entry.main.temp,
            humidity_percent: entry.main.humidity,
            wind_speed_mps: entry.wind.speed,
            weather_description: entry
                .weather
                .first()
                .map(|c| c.description.clone())
                .unwrap_or_default(),
        })
        .collect();

    ForecastSeries {
        observations,
        utc_offset_seconds: response.city.timezone,
        location: response.city.name,
    }
}

/// `OpenAQ` API response structures
mod openaq {
    use serde::Deserialize;

    /// Response from the `latest` endpoint
    #[derive(Debug, Deserialize)]
    pub struct LatestResponse {
        pub results: Option<Vec<LatestResult>>,
    }

    /// One station's latest measurements
    #[derive(Debug, Deserialize)]
    pub struct LatestResult {
        pub location: String,
        #[serde(default)]
        pub measurements: Vec<Measurement>,
    }

    /// One parameter measurement at a station
    #[derive(Debug, Deserialize)]
    pub struct Measurement {
        pub parameter: String,
        pub value: f64,
    }
}

/// `OpenWeatherMap` API response structures
mod openweather {
    use serde::Deserialize;

    /// Current weather response
    #[derive(Debug, Deserialize)]
    pub struct WeatherResponse {
        pub main: MainData,
        pub wind: WindData,
        #[serde(default)]
        pub weather: Vec<Condition>,
        pub name: String,
    }

    /// 5-day/3-hour forecast response
    #[derive(Debug, Deserialize)]
    pub struct ForecastResponse {
        pub list: Vec<ForecastEntry>,
        pub city: City,
    }

    /// One 3-hour forecast slot
    #[derive(Debug, Deserialize)]
    pub struct ForecastEntry {
        /// Slot timestamp in epoch seconds
        pub dt: i64,
        pub main: MainData,
        pub wind: WindData,
        #[serde(default)]
        pub weather: Vec<Condition>,
    }

    /// Thermodynamic readings
    #[derive(Debug, Deserialize)]
    pub struct MainData {
        pub temp: f64,
        pub humidity: u8,
        pub pressure: f64,
    }

    /// Wind readings
    #[derive(Debug, Deserialize)]
    pub struct WindData {
        pub speed: f64,
        pub deg: Option<u16>,
    }

    /// Weather condition description
    #[derive(Debug, Deserialize)]
    pub struct Condition {
        pub description: String,
        pub icon: Option<String>,
    }

    /// Forecast location metadata
    #[derive(Debug, Deserialize)]
    pub struct City {
        pub name: String,
        /// UTC offset in seconds
        pub timezone: i32,
    }
}
