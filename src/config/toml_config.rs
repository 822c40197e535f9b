use crate::utils::error::{MonitorError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub service: ServiceConfig,
    pub api: ApiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub description: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ApiConfig {
    pub key: Option<String>,
    pub base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub retry_attempts: Option<u32>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(MonitorError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Parses configuration from a TOML string, substituting `${VAR}`
    /// placeholders from the environment first.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| MonitorError::InvalidConfigValue {
            field: "config_file".to_string(),
            value: String::new(),
            reason: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR_NAME}` placeholders with environment values. Unset
    /// variables keep the placeholder so validation can flag them.
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("service.name", &self.service.name)?;

        if let Some(base_url) = &self.api.base_url {
            validation::validate_url("api.base_url", base_url)?;
        }

        if let Some(key) = &self.api.key {
            validation::validate_non_empty_string("api.key", key)?;
            if key.contains("${") {
                return Err(MonitorError::InvalidConfigValue {
                    field: "api.key".to_string(),
                    value: key.clone(),
                    reason: "Unresolved environment variable".to_string(),
                });
            }
        }

        if let Some(attempts) = self.api.retry_attempts {
            validation::validate_range("api.retry_attempts", attempts, 0, 10)?;
        }

        Ok(())
    }
}
