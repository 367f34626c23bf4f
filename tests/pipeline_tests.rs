//! End-to-end tests for the estimation pipeline
//!
//! Exercises the full measurement -> AQI -> category -> forecast flow without
//! touching any network provider.

use airsense::AqiCategory;
use airsense::aqi::{DEFAULT_AQI, classify, estimate_aqi};
use airsense::forecast::{FORECAST_HORIZON_POINTS, project_forecast};
use airsense::models::WeatherObservation;
use rstest::rstest;

/// Observation at the given UTC hour of 1970-01-01
fn observation(hour: i64, wind: f64, humidity: u8, temp: f64) -> WeatherObservation {
    WeatherObservation {
        timestamp_millis: hour * 3_600_000,
        temperature_c: temp,
        humidity_percent: humidity,
        wind_speed_mps: wind,
        weather_description: "clear sky".to_string(),
    }
}

#[test]
fn measurement_to_forecast_pipeline() {
    // A moderately polluted afternoon: pm25 35.4 sits exactly on the
    // Good/Moderate band boundary
    let aqi = estimate_aqi(Some(35.4)).unwrap();
    assert_eq!(aqi, 100);
    assert_eq!(classify(aqi), AqiCategory::Moderate);

    let series = vec![
        observation(14, 2.0, 50, 22.0), // quiet afternoon, no modifiers
        observation(17, 0.5, 85, 31.0), // evening rush, still, humid, hot
        observation(20, 6.0, 40, 18.0), // strong evening wind
        observation(23, 2.0, 50, 12.0), // night lull
        observation(26, 2.0, 50, 12.0), // beyond the 12-hour horizon
    ];

    let points = project_forecast(aqi, &series, 0);
    assert_eq!(points.len(), FORECAST_HORIZON_POINTS);

    assert_eq!(points[0].aqi, 100);
    // +10 wind + 10 humidity + 20 rush + 10 heat
    assert_eq!(points[1].aqi, 150);
    assert_eq!(points[2].aqi, 85);
    assert_eq!(points[3].aqi, 90);

    // Category classification stays consistent across the projected points
    assert_eq!(classify(points[1].aqi), AqiCategory::UnhealthyForSensitive);
    assert_eq!(classify(points[2].aqi), AqiCategory::Moderate);
}

#[test]
fn missing_measurement_still_produces_a_forecast() {
    let aqi = estimate_aqi(None).unwrap();
    assert_eq!(aqi, DEFAULT_AQI);
    assert_eq!(classify(aqi), AqiCategory::Good);

    let points = project_forecast(aqi, &[observation(12, 2.0, 50, 20.0)], 0);
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].aqi, 50);
}

#[test]
fn empty_observation_series_yields_empty_forecast() {
    assert!(project_forecast(100, &[], 0).is_empty());
}

#[rstest]
#[case(490, observation(8, 0.0, 90, 35.0), 500)] // +50 clamps at ceiling
#[case(5, observation(3, 8.0, 20, 10.0), 0)] // -30 clamps at floor
#[case(100, observation(8, 6.0, 85, 32.0), 125)] // mixed rush-hour modifiers
fn projection_respects_aqi_bounds(
    #[case] current_aqi: u16,
    #[case] obs: WeatherObservation,
    #[case] expected: u16,
) {
    let points = project_forecast(current_aqi, &[obs], 0);
    assert_eq!(points[0].aqi, expected);
}

#[test]
fn hazardous_input_classifies_hazardous_throughout() {
    let aqi = estimate_aqi(Some(400.0)).unwrap();
    assert_eq!(classify(aqi), AqiCategory::Hazardous);

    // Favorable weather cannot pull a hazardous baseline below Very Unhealthy
    let points = project_forecast(aqi, &[observation(3, 8.0, 20, 10.0)], 0);
    assert!(points[0].aqi > 300);
}
