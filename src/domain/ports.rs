use crate::domain::model::{AqiSample, Coordinates};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Upstream air quality data source. Implemented by the OpenWeather adapter;
/// tests substitute their own implementations.
#[async_trait]
pub trait AirQualityApi: Send + Sync {
    /// Resolves a free-text location name to coordinates.
    async fn geocode(&self, location: &str) -> Result<Coordinates>;

    /// Fetches the current AQI sample for the given coordinates.
    async fn air_quality(&self, coords: Coordinates) -> Result<AqiSample>;
}

pub trait ConfigProvider: Send + Sync {
    fn api_key(&self) -> &str;
    fn base_url(&self) -> &str;
    fn port(&self) -> u16;
    fn request_timeout(&self) -> Duration;
    fn retry_attempts(&self) -> u32;
}
