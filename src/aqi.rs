//! AQI estimation from raw pollutant concentrations
//!
//! Implements the EPA piecewise-linear breakpoint transform for PM2.5 and the
//! six-level category classification shared by the dashboard and the
//! recommendation builder. Pure computation, no I/O.

use crate::error::AirSenseError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// AQI reported when no PM2.5 measurement is available
///
/// The boundary of the "Good" band, signalling "insufficient data" without
/// failing the request.
pub const DEFAULT_AQI: u16 = 50;

/// One EPA breakpoint band: a PM2.5 concentration range mapped linearly to an
/// AQI range
#[derive(Debug, Clone, Copy)]
struct BreakpointBand {
    conc_lo: f64,
    conc_hi: f64,
    aqi_lo: f64,
    aqi_hi: f64,
}

/// EPA PM2.5 breakpoint table (µg/m³), ascending
const PM25_BREAKPOINTS: [BreakpointBand; 6] = [
    BreakpointBand {
        conc_lo: 0.0,
        conc_hi: 12.0,
        aqi_lo: 0.0,
        aqi_hi: 50.0,
    },
    BreakpointBand {
        conc_lo: 12.1,
        conc_hi: 35.4,
        aqi_lo: 50.0,
        aqi_hi: 100.0,
    },
    BreakpointBand {
        conc_lo: 35.5,
        conc_hi: 55.4,
        aqi_lo: 100.0,
        aqi_hi: 150.0,
    },
    BreakpointBand {
        conc_lo: 55.5,
        conc_hi: 150.4,
        aqi_lo: 150.0,
        aqi_hi: 200.0,
    },
    BreakpointBand {
        conc_lo: 150.5,
        conc_hi: 250.4,
        aqi_lo: 200.0,
        aqi_hi: 300.0,
    },
    BreakpointBand {
        conc_lo: 250.5,
        conc_hi: 500.4,
        aqi_lo: 300.0,
        aqi_hi: 500.0,
    },
];

/// Estimate the AQI from a PM2.5 concentration in µg/m³
///
/// A missing measurement degrades to [`DEFAULT_AQI`] rather than failing.
/// Negative or non-finite concentrations are rejected with
/// [`AirSenseError::InvalidMeasurement`]. Concentrations above the top band
/// extrapolate with the top band's slope, so extreme events are not capped
/// below their computed index.
pub fn estimate_aqi(pm25: Option<f64>) -> Result<u16, AirSenseError> {
    let Some(concentration) = pm25 else {
        return Ok(DEFAULT_AQI);
    };

    if !concentration.is_finite() {
        return Err(AirSenseError::invalid_measurement(
            "pm25 is not a finite number",
        ));
    }
    if concentration < 0.0 {
        return Err(AirSenseError::invalid_measurement(format!(
            "pm25 is negative: {concentration}"
        )));
    }

    let band = PM25_BREAKPOINTS
        .iter()
        .find(|band| concentration <= band.conc_hi)
        .unwrap_or(&PM25_BREAKPOINTS[5]);

    let slope = (band.aqi_hi - band.aqi_lo) / (band.conc_hi - band.conc_lo);
    let aqi = band.aqi_lo + slope * (concentration - band.conc_lo);

    Ok(aqi.round() as u16)
}

/// AQI severity categories, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AqiCategory {
    /// AQI 0-50
    Good,
    /// AQI 51-100
    Moderate,
    /// AQI 101-150
    UnhealthyForSensitive,
    /// AQI 151-200
    Unhealthy,
    /// AQI 201-300
    VeryUnhealthy,
    /// AQI above 300
    Hazardous,
}

impl AqiCategory {
    /// Display label for this category
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            AqiCategory::Good => "Good",
            AqiCategory::Moderate => "Moderate",
            AqiCategory::UnhealthyForSensitive => "Unhealthy for Sensitive Groups",
            AqiCategory::Unhealthy => "Unhealthy",
            AqiCategory::VeryUnhealthy => "Very Unhealthy",
            AqiCategory::Hazardous => "Hazardous",
        }
    }

    /// Short health guidance shown alongside the label
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            AqiCategory::Good => "Air quality is satisfactory",
            AqiCategory::Moderate => "Air quality is acceptable",
            AqiCategory::UnhealthyForSensitive => {
                "Sensitive groups may experience health effects"
            }
            AqiCategory::Unhealthy => "Everyone may begin to experience health effects",
            AqiCategory::VeryUnhealthy => {
                "Health alert: everyone may experience serious effects"
            }
            AqiCategory::Hazardous => "Health warning of emergency conditions",
        }
    }
}

impl fmt::Display for AqiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Classify an AQI value into its severity category
///
/// Total over the whole `u16` range; anything above 300 is `Hazardous`.
#[must_use]
pub fn classify(aqi: u16) -> AqiCategory {
    match aqi {
        0..=50 => AqiCategory::Good,
        51..=100 => AqiCategory::Moderate,
        101..=150 => AqiCategory::UnhealthyForSensitive,
        151..=200 => AqiCategory::Unhealthy,
        201..=300 => AqiCategory::VeryUnhealthy,
        _ => AqiCategory::Hazardous,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, 0)]
    #[case(12.0, 50)]
    #[case(35.4, 100)]
    #[case(55.4, 150)]
    #[case(150.4, 200)]
    #[case(250.4, 300)]
    #[case(500.4, 500)]
    fn test_breakpoint_boundaries(#[case] pm25: f64, #[case] expected: u16) {
        assert_eq!(estimate_aqi(Some(pm25)).unwrap(), expected);
    }

    #[rstest]
    #[case(6.0, 25)]
    #[case(15.0, 56)]
    #[case(45.0, 124)]
    #[case(100.0, 173)]
    #[case(200.0, 250)]
    fn test_interpolation_within_bands(#[case] pm25: f64, #[case] expected: u16) {
        assert_eq!(estimate_aqi(Some(pm25)).unwrap(), expected);
    }

    #[test]
    fn test_missing_measurement_defaults() {
        assert_eq!(estimate_aqi(None).unwrap(), DEFAULT_AQI);
    }

    #[test]
    fn test_extrapolation_above_top_band() {
        // Top band slope continues past 500.4, no hard ceiling
        let aqi = estimate_aqi(Some(600.0)).unwrap();
        assert!(aqi > 500);
    }

    #[test]
    fn test_monotonically_non_decreasing() {
        let mut previous = 0;
        let mut concentration = 0.0;
        while concentration <= 600.0 {
            let aqi = estimate_aqi(Some(concentration)).unwrap();
            assert!(
                aqi >= previous,
                "AQI decreased at pm25={concentration}: {aqi} < {previous}"
            );
            previous = aqi;
            concentration += 0.1;
        }
    }

    #[test]
    fn test_rejects_invalid_concentrations() {
        assert!(estimate_aqi(Some(-0.1)).is_err());
        assert!(estimate_aqi(Some(f64::NAN)).is_err());
        assert!(estimate_aqi(Some(f64::INFINITY)).is_err());
    }

    #[rstest]
    #[case(0, AqiCategory::Good)]
    #[case(50, AqiCategory::Good)]
    #[case(51, AqiCategory::Moderate)]
    #[case(100, AqiCategory::Moderate)]
    #[case(101, AqiCategory::UnhealthyForSensitive)]
    #[case(150, AqiCategory::UnhealthyForSensitive)]
    #[case(151, AqiCategory::Unhealthy)]
    #[case(200, AqiCategory::Unhealthy)]
    #[case(201, AqiCategory::VeryUnhealthy)]
    #[case(300, AqiCategory::VeryUnhealthy)]
    #[case(301, AqiCategory::Hazardous)]
    #[case(500, AqiCategory::Hazardous)]
    fn test_classification_boundaries(#[case] aqi: u16, #[case] expected: AqiCategory) {
        assert_eq!(classify(aqi), expected);
    }

    #[test]
    fn test_category_ordering() {
        assert!(AqiCategory::Good < AqiCategory::Moderate);
        assert!(AqiCategory::VeryUnhealthy < AqiCategory::Hazardous);
    }

    #[test]
    fn test_category_labels() {
        assert_eq!(AqiCategory::Good.label(), "Good");
        assert_eq!(
            AqiCategory::UnhealthyForSensitive.label(),
            "Unhealthy for Sensitive Groups"
        );
        assert_eq!(format!("{}", AqiCategory::Hazardous), "Hazardous");
    }
}
