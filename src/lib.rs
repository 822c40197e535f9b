pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::Settings;

pub use adapters::openweather::OpenWeatherClient;
pub use core::monitor::AirQualityService;
pub use domain::model::{AirQualityReport, HealthAdvisory};
pub use utils::error::{MonitorError, Result};
