use crate::core::{AirQualityApi, AirQualityReport, HealthAdvisory, Result};
use crate::utils::validation::validate_non_empty_string;
use chrono::Utc;

/// Orchestrates a single air quality check: resolve the location to
/// coordinates, fetch the AQI sample, derive the advisory.
pub struct AirQualityService<A: AirQualityApi> {
    api: A,
}

impl<A: AirQualityApi> AirQualityService<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    pub async fn check(&self, location: &str) -> Result<AirQualityReport> {
        validate_non_empty_string("location", location)?;
        let location = location.trim();

        tracing::debug!("Resolving coordinates for '{}'", location);
        let coords = self.api.geocode(location).await?;
        tracing::debug!(
            "Resolved '{}' to ({}, {})",
            location,
            coords.lat,
            coords.lon
        );

        let sample = self.api.air_quality(coords).await?;
        let advisory = HealthAdvisory::from_aqi(sample.aqi);

        tracing::info!("🌍 {}: AQI {} - {}", location, sample.aqi, advisory);

        Ok(AirQualityReport {
            location: location.to_string(),
            coordinates: coords,
            aqi: sample.aqi,
            advisory,
            components: sample.components,
            checked_at: Utc::now(),
        })
    }
}
