use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Health advisory bands for the OpenWeather AQI scale (1-5).
///
/// Any value outside the documented scale maps to `Hazardous`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthAdvisory {
    Good,
    Moderate,
    UnhealthyForSensitiveGroups,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

impl HealthAdvisory {
    pub fn from_aqi(aqi: u8) -> Self {
        match aqi {
            1 => HealthAdvisory::Good,
            2 => HealthAdvisory::Moderate,
            3 => HealthAdvisory::UnhealthyForSensitiveGroups,
            4 => HealthAdvisory::Unhealthy,
            5 => HealthAdvisory::VeryUnhealthy,
            _ => HealthAdvisory::Hazardous,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            HealthAdvisory::Good => "Good: Air quality is satisfactory.",
            HealthAdvisory::Moderate => "Moderate: Air quality is acceptable.",
            HealthAdvisory::UnhealthyForSensitiveGroups => {
                "Unhealthy for Sensitive Groups: Some members may experience health effects."
            }
            HealthAdvisory::Unhealthy => "Unhealthy: Everyone may experience health effects.",
            HealthAdvisory::VeryUnhealthy => "Very Unhealthy: Health alert for everyone.",
            HealthAdvisory::Hazardous => "Hazardous: Health warning of emergency conditions.",
        }
    }
}

impl std::fmt::Display for HealthAdvisory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

// Advisories travel over the wire as their full sentence.
impl Serialize for HealthAdvisory {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.message())
    }
}

/// Pollutant concentrations in μg/m³ as reported by the air pollution API.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PollutantConcentrations {
    #[serde(default)]
    pub co: f64,
    #[serde(default)]
    pub no: f64,
    #[serde(default)]
    pub no2: f64,
    #[serde(default)]
    pub o3: f64,
    #[serde(default)]
    pub so2: f64,
    #[serde(default)]
    pub pm2_5: f64,
    #[serde(default)]
    pub pm10: f64,
    #[serde(default)]
    pub nh3: f64,
}

/// A single AQI measurement for a set of coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AqiSample {
    pub aqi: u8,
    pub components: PollutantConcentrations,
}

/// The report returned to callers: the queried location, the raw AQI value
/// and the advisory derived from it.
#[derive(Debug, Clone, Serialize)]
pub struct AirQualityReport {
    pub location: String,
    pub coordinates: Coordinates,
    pub aqi: u8,
    pub advisory: HealthAdvisory,
    pub components: PollutantConcentrations,
    pub checked_at: DateTime<Utc>,
}
