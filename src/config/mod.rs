//! Application configuration.
//!
//! Aggregates configuration for the AWS backends, the profile table and the
//! issue tracker into a single [`AppConfig`] that can be loaded from YAML
//! files or environment variables.

use serde::Deserialize;

use crate::ticketing::JiraConfig;

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "solar-support.yaml";
/// Environment variable for configuration file path.
pub const CONFIG_ENV_VAR: &str = "SOLAR_SUPPORT_CONFIG";
/// Prefix for configuration environment variables.
pub const CONFIG_ENV_PREFIX: &str = "SOLAR_SUPPORT";
/// Environment variable for logging configuration.
pub const LOG_ENV_VAR: &str = "SOLAR_SUPPORT_LOG";

/// Table used when the table-name parameter is absent.
pub const DEFAULT_TABLE_NAME: &str = "SolarCustomerProfiles";

/// Configuration loading errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Load(#[from] ::config::ConfigError),
}

/// Main application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// AWS client configuration.
    pub aws: AwsConfig,
    /// Profile table configuration.
    pub profiles: ProfilesConfig,
    /// Issue tracker configuration.
    pub jira: JiraConfig,
}

impl AppConfig {
    /// Load configuration from file and environment.
    ///
    /// Configuration sources (in order of priority, later overrides earlier):
    /// 1. `solar-support.yaml` in current directory (if exists)
    /// 2. File specified by `path` argument (if provided)
    /// 3. File specified by `CONFIG_ENV_VAR` environment variable (if set)
    /// 4. Environment variables with `CONFIG_ENV_PREFIX` prefix
    /// 5. Legacy `JIRA_*` / `PROJECT_NAME` variables for the issue tracker
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        use ::config::{Config as ConfigLib, Environment, File, FileFormat};

        let mut builder = ConfigLib::builder()
            .add_source(File::new(DEFAULT_CONFIG_FILE, FileFormat::Yaml).required(false));

        if let Some(config_path) = path {
            builder = builder.add_source(File::new(config_path, FileFormat::Yaml).required(true));
        }

        if let Ok(config_path) = std::env::var(CONFIG_ENV_VAR) {
            builder = builder.add_source(File::new(&config_path, FileFormat::Yaml).required(true));
        }

        let config = builder
            .add_source(
                Environment::with_prefix(CONFIG_ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut config: AppConfig = config.try_deserialize()?;
        config.jira.apply_env_overrides();
        Ok(config)
    }
}

/// AWS client configuration shared by the DynamoDB and SSM backends.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AwsConfig {
    /// AWS region (e.g., "us-east-1"). Uses default provider chain if not set.
    pub region: Option<String>,
    /// Custom endpoint URL (for DynamoDB Local or LocalStack).
    pub endpoint_url: Option<String>,
}

impl AwsConfig {
    /// Set AWS region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set custom endpoint URL.
    pub fn with_endpoint(mut self, url: impl Into<String>) -> Self {
        self.endpoint_url = Some(url.into());
        self
    }

    /// Load the SDK configuration from the environment plus overrides.
    #[cfg(any(feature = "dynamo", feature = "ssm"))]
    pub async fn load_sdk_config(&self) -> aws_config::SdkConfig {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());

        if let Some(ref region) = self.region {
            loader = loader.region(aws_config::Region::new(region.clone()));
        }

        if let Some(ref endpoint) = self.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }

        loader.load().await
    }
}

/// Profile table configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProfilesConfig {
    /// Table used when the table-name parameter is absent.
    pub default_table_name: String,
    /// Name of the parameter holding the active table name.
    pub table_name_parameter: String,
}

impl Default for ProfilesConfig {
    fn default() -> Self {
        Self {
            default_table_name: DEFAULT_TABLE_NAME.to_string(),
            table_name_parameter: crate::parameters::TABLE_NAME_PARAMETER.to_string(),
        }
    }
}
