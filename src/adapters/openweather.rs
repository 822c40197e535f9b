use crate::domain::model::{AqiSample, Coordinates, PollutantConcentrations};
use crate::domain::ports::{AirQualityApi, ConfigProvider};
use crate::utils::error::{MonitorError, Result};
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

const WEATHER_PATH: &str = "/data/2.5/weather";
const AIR_POLLUTION_PATH: &str = "/data/2.5/air_pollution";

/// Fallback wait when a 429 response carries no usable Retry-After header.
const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(10);

// Wire payloads. Only the fields the monitor consumes are modeled.

#[derive(Debug, Deserialize)]
struct WeatherResponse {
    coord: CoordPayload,
}

#[derive(Debug, Deserialize)]
struct CoordPayload {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct AirPollutionResponse {
    list: Vec<AirPollutionEntry>,
}

#[derive(Debug, Deserialize)]
struct AirPollutionEntry {
    main: AqiPayload,
    #[serde(default)]
    components: PollutantConcentrations,
}

#[derive(Debug, Deserialize)]
struct AqiPayload {
    aqi: u8,
}

/// Client for the OpenWeather geocoding and air pollution endpoints.
///
/// Geocoding goes through the current-weather endpoint and reads its `coord`
/// field; the air pollution endpoint supplies the AQI and pollutant
/// concentrations.
pub struct OpenWeatherClient {
    client: Client,
    base_url: Url,
    api_key: String,
    retry_attempts: u32,
}

impl OpenWeatherClient {
    pub fn new(config: &impl ConfigProvider) -> Result<Self> {
        let base_url =
            Url::parse(config.base_url()).map_err(|e| MonitorError::InvalidConfigValue {
                field: "base_url".to_string(),
                value: config.base_url().to_string(),
                reason: format!("Invalid URL: {}", e),
            })?;

        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key().to_string(),
            retry_attempts: config.retry_attempts(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| MonitorError::InvalidConfigValue {
                field: "base_url".to_string(),
                value: self.base_url.to_string(),
                reason: format!("Cannot join endpoint path '{}': {}", path, e),
            })
    }

    /// Sends a GET request, waiting out 429 responses up to the configured
    /// number of attempts. The Retry-After header is honored when present.
    async fn send_with_retry(&self, url: Url) -> Result<Response> {
        let mut attempt = 0u32;
        loop {
            let response = self.client.get(url.clone()).send().await?;

            if response.status() != StatusCode::TOO_MANY_REQUESTS {
                return Ok(response);
            }

            let retry_after = parse_retry_after(response.headers());
            if attempt >= self.retry_attempts {
                return Err(MonitorError::RateLimited {
                    retry_after_secs: retry_after.as_secs(),
                });
            }

            attempt += 1;
            tracing::warn!(
                "📡 Rate limit reached, retrying in {}s (attempt {}/{})",
                retry_after.as_secs(),
                attempt,
                self.retry_attempts
            );
            tokio::time::sleep(retry_after).await;
        }
    }
}

fn parse_retry_after(headers: &HeaderMap) -> Duration {
    headers
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_RETRY_AFTER)
}

#[async_trait]
impl AirQualityApi for OpenWeatherClient {
    async fn geocode(&self, location: &str) -> Result<Coordinates> {
        let mut url = self.endpoint(WEATHER_PATH)?;
        url.query_pairs_mut()
            .append_pair("q", location)
            .append_pair("appid", &self.api_key);

        tracing::debug!("📡 Geocoding request for '{}'", location);
        let response = self.send_with_retry(url).await?;

        if !response.status().is_success() {
            tracing::debug!(
                "Geocoding failed for '{}' with status {}",
                location,
                response.status()
            );
            return Err(MonitorError::LocationNotFound {
                location: location.to_string(),
            });
        }

        let payload: WeatherResponse = response.json().await?;
        Ok(Coordinates {
            lat: payload.coord.lat,
            lon: payload.coord.lon,
        })
    }

    async fn air_quality(&self, coords: Coordinates) -> Result<AqiSample> {
        let mut url = self.endpoint(AIR_POLLUTION_PATH)?;
        url.query_pairs_mut()
            .append_pair("lat", &coords.lat.to_string())
            .append_pair("lon", &coords.lon.to_string())
            .append_pair("appid", &self.api_key);

        tracing::debug!(
            "📡 Air pollution request for ({}, {})",
            coords.lat,
            coords.lon
        );
        let response = self.send_with_retry(url).await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("Air pollution request failed with status {}", status);
            return Err(MonitorError::AirQualityUnavailable {
                status: Some(status.as_u16()),
            });
        }

        let payload: AirPollutionResponse = response.json().await?;
        let entry = payload
            .list
            .into_iter()
            .next()
            .ok_or(MonitorError::AirQualityUnavailable { status: None })?;

        Ok(AqiSample {
            aqi: entry.main.aqi,
            components: entry.components,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    struct TestConfig {
        base_url: String,
        retry_attempts: u32,
    }

    impl TestConfig {
        fn new(base_url: String) -> Self {
            Self {
                base_url,
                retry_attempts: 1,
            }
        }
    }

    impl ConfigProvider for TestConfig {
        fn api_key(&self) -> &str {
            "test-key"
        }

        fn base_url(&self) -> &str {
            &self.base_url
        }

        fn port(&self) -> u16 {
            8000
        }

        fn request_timeout(&self) -> Duration {
            Duration::from_secs(5)
        }

        fn retry_attempts(&self) -> u32 {
            self.retry_attempts
        }
    }

    fn client_for(server: &MockServer) -> OpenWeatherClient {
        OpenWeatherClient::new(&TestConfig::new(server.base_url())).unwrap()
    }

    #[tokio::test]
    async fn test_geocode_extracts_coordinates() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/data/2.5/weather")
                .query_param("q", "Kigali")
                .query_param("appid", "test-key");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "coord": {"lat": -1.9441, "lon": 30.0619},
                    "name": "Kigali"
                }));
        });

        let client = client_for(&server);
        let coords = client.geocode("Kigali").await.unwrap();

        api_mock.assert();
        assert_eq!(coords.lat, -1.9441);
        assert_eq!(coords.lon, 30.0619);
    }

    #[tokio::test]
    async fn test_geocode_unknown_location() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/data/2.5/weather");
            then.status(404)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"cod": "404", "message": "city not found"}));
        });

        let client = client_for(&server);
        let err = client.geocode("Atlantis").await.unwrap_err();

        api_mock.assert();
        assert!(matches!(
            err,
            MonitorError::LocationNotFound { location } if location == "Atlantis"
        ));
    }

    #[tokio::test]
    async fn test_geocode_encodes_location_names() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/data/2.5/weather")
                .query_param("q", "New York");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"coord": {"lat": 40.71, "lon": -74.01}}));
        });

        let client = client_for(&server);
        let coords = client.geocode("New York").await.unwrap();

        api_mock.assert();
        assert_eq!(coords.lat, 40.71);
    }

    #[tokio::test]
    async fn test_air_quality_extracts_first_entry() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/data/2.5/air_pollution")
                .query_param("lat", "-1.9441")
                .query_param("lon", "30.0619")
                .query_param("appid", "test-key");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "list": [{
                        "main": {"aqi": 2},
                        "components": {
                            "co": 201.94, "no": 0.02, "no2": 0.77, "o3": 68.66,
                            "so2": 0.64, "pm2_5": 0.5, "pm10": 0.54, "nh3": 0.12
                        }
                    }]
                }));
        });

        let client = client_for(&server);
        let sample = client
            .air_quality(Coordinates {
                lat: -1.9441,
                lon: 30.0619,
            })
            .await
            .unwrap();

        api_mock.assert();
        assert_eq!(sample.aqi, 2);
        assert_eq!(sample.components.co, 201.94);
        assert_eq!(sample.components.pm2_5, 0.5);
    }

    #[tokio::test]
    async fn test_air_quality_upstream_failure() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/data/2.5/air_pollution");
            then.status(500);
        });

        let client = client_for(&server);
        let err = client
            .air_quality(Coordinates { lat: 0.0, lon: 0.0 })
            .await
            .unwrap_err();

        api_mock.assert();
        assert!(matches!(
            err,
            MonitorError::AirQualityUnavailable { status: Some(500) }
        ));
    }

    #[tokio::test]
    async fn test_air_quality_empty_list() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/data/2.5/air_pollution");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"list": []}));
        });

        let client = client_for(&server);
        let err = client
            .air_quality(Coordinates { lat: 0.0, lon: 0.0 })
            .await
            .unwrap_err();

        api_mock.assert();
        assert!(matches!(
            err,
            MonitorError::AirQualityUnavailable { status: None }
        ));
    }

    #[tokio::test]
    async fn test_rate_limit_exhausts_retries() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/data/2.5/weather");
            then.status(429).header("Retry-After", "1");
        });

        let client = client_for(&server);
        let err = client.geocode("Kigali").await.unwrap_err();

        // One initial attempt plus one retry
        assert_eq!(api_mock.hits(), 2);
        assert!(matches!(
            err,
            MonitorError::RateLimited { retry_after_secs: 1 }
        ));
    }

    #[tokio::test]
    async fn test_rate_limit_with_zero_retries_fails_fast() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/data/2.5/weather");
            then.status(429);
        });

        let mut config = TestConfig::new(server.base_url());
        config.retry_attempts = 0;
        let client = OpenWeatherClient::new(&config).unwrap();

        let err = client.geocode("Kigali").await.unwrap_err();

        assert_eq!(api_mock.hits(), 1);
        // Missing Retry-After falls back to the default wait
        assert!(matches!(
            err,
            MonitorError::RateLimited {
                retry_after_secs: 10
            }
        ));
    }

    #[test]
    fn test_parse_retry_after() {
        let mut headers = HeaderMap::new();
        headers.insert(reqwest::header::RETRY_AFTER, "30".parse().unwrap());
        assert_eq!(parse_retry_after(&headers), Duration::from_secs(30));

        let mut headers = HeaderMap::new();
        headers.insert(reqwest::header::RETRY_AFTER, "soon".parse().unwrap());
        assert_eq!(parse_retry_after(&headers), DEFAULT_RETRY_AFTER);

        assert_eq!(parse_retry_after(&HeaderMap::new()), DEFAULT_RETRY_AFTER);
    }

    #[tokio::test]
    async fn test_malformed_geocode_payload() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/data/2.5/weather");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"unexpected": true}));
        });

        let client = client_for(&server);
        let err = client.geocode("Kigali").await.unwrap_err();

        api_mock.assert();
        assert!(matches!(err, MonitorError::Http(_)));
    }
}
