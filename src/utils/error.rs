use thiserror::Error;

#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Could not resolve coordinates for location: {location}")]
    LocationNotFound { location: String },

    #[error("Air quality data unavailable (upstream status: {status:?})")]
    AirQualityUnavailable { status: Option<u16> },

    #[error("Rate limit reached, retry after {retry_after_secs} seconds")]
    RateLimited { retry_after_secs: u64 },

    #[error("Invalid configuration value for {field}: '{value}' ({reason})")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfig { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Upstream,
    Configuration,
    Data,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl MonitorError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            MonitorError::Http(_) => ErrorCategory::Network,
            MonitorError::Io(_) => ErrorCategory::System,
            MonitorError::Serialization(_) => ErrorCategory::Data,
            MonitorError::LocationNotFound { .. }
            | MonitorError::AirQualityUnavailable { .. }
            | MonitorError::RateLimited { .. } => ErrorCategory::Upstream,
            MonitorError::InvalidConfigValue { .. } | MonitorError::MissingConfig { .. } => {
                ErrorCategory::Configuration
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            MonitorError::RateLimited { .. } | MonitorError::LocationNotFound { .. } => {
                ErrorSeverity::Medium
            }
            MonitorError::Http(_)
            | MonitorError::AirQualityUnavailable { .. }
            | MonitorError::Serialization(_) => ErrorSeverity::High,
            MonitorError::InvalidConfigValue { .. }
            | MonitorError::MissingConfig { .. }
            | MonitorError::Io(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            MonitorError::Http(_) => "Check network connectivity and the configured base URL",
            MonitorError::Io(_) => "Check file permissions and available disk space",
            MonitorError::Serialization(_) => {
                "The upstream API returned an unexpected payload; retry later"
            }
            MonitorError::LocationNotFound { .. } => {
                "Verify the spelling of the location name and try again"
            }
            MonitorError::AirQualityUnavailable { .. } => {
                "The OpenWeather air pollution API is unreachable; retry later"
            }
            MonitorError::RateLimited { .. } => {
                "Wait for the rate limit window to pass before retrying"
            }
            MonitorError::InvalidConfigValue { .. } => {
                "Fix the configuration value and restart the service"
            }
            MonitorError::MissingConfig { .. } => {
                "Set the missing value via CLI flag, environment variable or config file"
            }
        }
    }

    /// Message safe to show to end users and in API error bodies. Upstream
    /// failures keep the wording the service has always reported.
    pub fn user_friendly_message(&self) -> String {
        match self {
            MonitorError::LocationNotFound { .. } => {
                "Could not fetch location coordinates. Please check the location name.".to_string()
            }
            MonitorError::AirQualityUnavailable { .. } | MonitorError::Http(_) => {
                "Could not fetch air quality data.".to_string()
            }
            MonitorError::RateLimited { retry_after_secs } => {
                format!(
                    "Rate limit reached. Please retry in {} seconds.",
                    retry_after_secs
                )
            }
            MonitorError::InvalidConfigValue { field, reason, .. } => {
                format!("Configuration error in '{}': {}", field, reason)
            }
            MonitorError::MissingConfig { field } => {
                format!("Missing required configuration: {}", field)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MonitorError>;
