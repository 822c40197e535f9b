pub mod monitor;

pub use crate::domain::model::{
    AirQualityReport, AqiSample, Coordinates, HealthAdvisory, PollutantConcentrations,
};
pub use crate::domain::ports::{AirQualityApi, ConfigProvider};
pub use crate::utils::error::Result;
