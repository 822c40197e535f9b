pub mod toml_config;

use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use std::time::Duration;

#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "http://api.openweathermap.org";
pub const DEFAULT_PORT: u16 = 8000;
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_RETRY_ATTEMPTS: u32 = 2;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "airq-monitor")]
#[command(about = "Air quality monitoring service backed by the OpenWeather API")]
pub struct CliConfig {
    #[arg(
        long,
        env = "OPENWEATHER_API_KEY",
        hide_env_values = true,
        help = "OpenWeather API key"
    )]
    pub api_key: Option<String>,

    #[arg(
        long,
        default_value = DEFAULT_BASE_URL,
        help = "Base URL of the OpenWeather API"
    )]
    pub base_url: String,

    #[arg(
        long,
        short = 'p',
        default_value_t = DEFAULT_PORT,
        help = "Port for the HTTP server"
    )]
    pub port: u16,

    #[arg(long, help = "Query a single location and exit instead of serving")]
    pub location: Option<String>,

    #[arg(
        long,
        default_value = "10s",
        value_parser = humantime::parse_duration,
        help = "Timeout for outgoing requests"
    )]
    pub request_timeout: Duration,

    #[arg(
        long,
        default_value_t = DEFAULT_RETRY_ATTEMPTS,
        help = "Retry attempts when the API rate limit is hit"
    )]
    pub retry_attempts: u32,

    #[arg(long, help = "Path to a TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Enable system resource monitoring")]
    pub monitor: bool,
}

/// Resolved runtime settings: CLI flags and environment, optionally
/// overridden by a TOML config file.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_key: String,
    pub base_url: String,
    pub port: u16,
    pub request_timeout: Duration,
    pub retry_attempts: u32,
}

#[cfg(feature = "cli")]
impl Settings {
    pub fn from_cli(cli: &CliConfig) -> Result<Self> {
        let mut api_key = cli.api_key.clone();
        let mut base_url = cli.base_url.clone();
        let mut port = cli.port;
        let mut request_timeout = cli.request_timeout;
        let mut retry_attempts = cli.retry_attempts;

        if let Some(path) = &cli.config {
            let file = toml_config::TomlConfig::from_file(path)?;
            file.validate()?;

            if let Some(key) = file.api.key {
                api_key = Some(key);
            }
            if let Some(url) = file.api.base_url {
                base_url = url;
            }
            if let Some(file_port) = file.service.port {
                port = file_port;
            }
            if let Some(secs) = file.api.timeout_seconds {
                request_timeout = Duration::from_secs(secs);
            }
            if let Some(attempts) = file.api.retry_attempts {
                retry_attempts = attempts;
            }
        }

        let api_key = validation::validate_required_field("api_key", &api_key)?.clone();

        Ok(Self {
            api_key,
            base_url,
            port,
            request_timeout,
            retry_attempts,
        })
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validation::validate_url("base_url", &self.base_url)?;
        validation::validate_non_empty_string("api_key", &self.api_key)?;
        validation::validate_range("retry_attempts", self.retry_attempts, 0, 10)?;
        Ok(())
    }
}

impl ConfigProvider for Settings {
    fn api_key(&self) -> &str {
        &self.api_key
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn port(&self) -> u16 {
        self.port
    }

    fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    fn retry_attempts(&self) -> u32 {
        self.retry_attempts
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            port: DEFAULT_PORT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
        }
    }
}
