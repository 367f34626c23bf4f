//! Short-term AQI forecast projection
//!
//! Projects a baseline AQI over the next 12 hours by applying additive
//! heuristic modifiers per 3-hour weather observation: wind dispersion,
//! humidity trapping, rush-hour traffic and temperature-driven ozone. The
//! thresholds are a product decision carried over from the original dashboard
//! and must stay bit-for-bit stable for forecast parity.

use crate::models::{ForecastPoint, WeatherObservation, round_half_up};
use chrono::{DateTime, FixedOffset, Offset, Timelike, Utc};
use tracing::debug;

/// Number of observations consumed per forecast: 4 points at 3-hour intervals,
/// a 12-hour horizon
pub const FORECAST_HORIZON_POINTS: usize = 4;

/// Lower and upper bounds of the AQI scale
const AQI_MIN: i32 = 0;
const AQI_MAX: i32 = 500;

/// Wind dispersion effect: stronger wind disperses pollution, still air traps it
fn wind_modifier(wind_speed_mps: f64) -> i32 {
    if wind_speed_mps > 5.0 {
        -15
    } else if wind_speed_mps > 3.0 {
        -5
    } else if wind_speed_mps < 1.0 {
        10
    } else {
        0
    }
}

/// Humidity effect: high humidity can trap pollutants near the ground
fn humidity_modifier(humidity_percent: u8) -> i32 {
    if humidity_percent > 80 {
        10
    } else if humidity_percent > 60 {
        5
    } else if humidity_percent < 30 {
        -5
    } else {
        0
    }
}

/// Traffic effect by local hour: morning and evening rush hours raise
/// emissions, night hours lower them
fn traffic_modifier(local_hour: u32) -> i32 {
    if (7..=9).contains(&local_hour) || (17..=19).contains(&local_hour) {
        20
    } else if local_hour >= 22 || local_hour <= 5 {
        -10
    } else {
        0
    }
}

/// Temperature effect: heat increases ground-level ozone formation
fn temperature_modifier(temperature_c: f64) -> i32 {
    if temperature_c > 30.0 {
        10
    } else if temperature_c > 25.0 {
        5
    } else {
        0
    }
}

/// Sum the four independent effect modifiers for one observation
#[must_use]
pub fn observation_modifier(observation: &WeatherObservation, local_hour: u32) -> i32 {
    wind_modifier(observation.wind_speed_mps)
        + humidity_modifier(observation.humidity_percent)
        + traffic_modifier(local_hour)
        + temperature_modifier(observation.temperature_c)
}

/// Project a baseline AQI across a sequence of weather observations
///
/// Consumes at most [`FORECAST_HORIZON_POINTS`] observations, preserving input
/// order, and returns one [`ForecastPoint`] per observation with the predicted
/// AQI clamped to [0, 500]. An empty series yields an empty forecast.
///
/// `utc_offset_seconds` is the location's UTC offset as reported by the
/// weather provider; it drives both the local rush-hour check and the
/// displayed hour label.
#[must_use]
pub fn project_forecast(
    current_aqi: u16,
    observations: &[WeatherObservation],
    utc_offset_seconds: i32,
) -> Vec<ForecastPoint> {
    let offset = FixedOffset::east_opt(utc_offset_seconds).unwrap_or_else(|| Utc.fix());

    let points: Vec<ForecastPoint> = observations
        .iter()
        .take(FORECAST_HORIZON_POINTS)
        .map(|observation| project_point(current_aqi, observation, offset))
        .collect();

    debug!("Projected {} forecast points", points.len());
    points
}

/// Build the forecast point for a single observation
fn project_point(
    current_aqi: u16,
    observation: &WeatherObservation,
    offset: FixedOffset,
) -> ForecastPoint {
    let local: DateTime<FixedOffset> =
        DateTime::<Utc>::from_timestamp_millis(observation.timestamp_millis)
            .unwrap_or_default()
            .with_timezone(&offset);

    let modifier = observation_modifier(observation, local.hour());
    let predicted = (i32::from(current_aqi) + modifier).clamp(AQI_MIN, AQI_MAX);

    ForecastPoint {
        timestamp_millis: observation.timestamp_millis,
        hour_label: local.format("%-I %p").to_string(),
        aqi: predicted as u16,
        temperature_c: round_half_up(observation.temperature_c),
        wind_speed_mps: format!("{:.1}", observation.wind_speed_mps),
        humidity_percent: observation.humidity_percent,
        weather_description: observation.weather_description.clone(),
    }
}
