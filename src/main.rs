use airsense::aqi::classify;
use airsense::forecast::project_forecast;
use airsense::{AirQualityClient, AirSenseConfig, AirSenseError, WeatherClient};
use anyhow::Result;
use tracing_subscriber::EnvFilter;

fn parse_coordinates(args: &[String]) -> Result<(f64, f64), AirSenseError> {
    let [lat, lon] = args else {
        return Err(AirSenseError::validation(
            "Usage: airsense <latitude> <longitude>",
        ));
    };

    let lat: f64 = lat
        .parse()
        .map_err(|_| AirSenseError::validation(format!("Latitude is not a number: {lat}")))?;
    let lon: f64 = lon
        .parse()
        .map_err(|_| AirSenseError::validation(format!("Longitude is not a number: {lon}")))?;
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return Err(AirSenseError::validation(format!(
            "Coordinates out of range: {lat}, {lon}"
        )));
    }
    Ok((lat, lon))
}

fn main() -> Result<()> {
    let config = AirSenseConfig::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone())),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (lat, lon) = parse_coordinates(&args)?;

    let air_quality = AirQualityClient::new(config.clone())?;
    let weather = WeatherClient::new(config)?;

    let report = air_quality.fetch_latest(lat, lon)?;
    let category = classify(report.aqi);

    println!(
        "Air quality at {} ({}):",
        report.reading.location, report.reading.source
    );
    println!(
        "  AQI {} - {} ({})",
        report.aqi,
        category.label(),
        category.description()
    );
    if let Some(pm25) = report.reading.pm25 {
        println!("  PM2.5: {pm25} µg/m³");
    }

    let current = weather.current_weather(lat, lon)?;
    println!(
        "Current weather in {}: {}°C, {}% humidity, wind {} m/s, {}",
        current.location,
        current.temperature,
        current.humidity,
        current.wind_speed,
        current.description
    );

    let series = weather.forecast(lat, lon)?;
    let points = project_forecast(report.aqi, &series.observations, series.utc_offset_seconds);

    println!("Next 12 hours:");
    for point in &points {
        println!(
            "  {:>5}  AQI {:>3} ({})  {}°C  wind {} m/s  {}",
            point.hour_label,
            point.aqi,
            classify(point.aqi).label(),
            point.temperature_c,
            point.wind_speed_mps,
            point.weather_description
        );
    }

    Ok(())
}
