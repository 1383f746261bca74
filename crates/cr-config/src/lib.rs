//! Cloud Roles Configuration
//!
//! TOML-based configuration with environment variable overrides.

use cr_common::{DEFAULT_AWS_REGION, MAX_PAGE_SIZE};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

mod loader;

pub use loader::ConfigLoader;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Root application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub aws: AwsConfig,
    pub listing: ListingConfig,
}

/// AWS client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AwsConfig {
    /// Region every IAM client is bound to
    pub region: String,
    /// Endpoint override (LocalStack, VPC endpoint). Empty means SDK default.
    pub endpoint_url: String,
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_AWS_REGION.to_string(),
            endpoint_url: String::new(),
        }
    }
}

impl AwsConfig {
    pub fn endpoint_url(&self) -> Option<&str> {
        if self.endpoint_url.is_empty() {
            None
        } else {
            Some(&self.endpoint_url)
        }
    }
}

/// Role listing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    /// `MaxItems` sent with each page request (1..=1000)
    pub page_size: i32,
    /// Only list roles under this IAM path. Empty lists every role.
    pub path_prefix: String,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            page_size: MAX_PAGE_SIZE,
            path_prefix: String::new(),
        }
    }
}

impl ListingConfig {
    pub fn path_prefix(&self) -> Option<&str> {
        if self.path_prefix.is_empty() {
            None
        } else {
            Some(&self.path_prefix)
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with environment variable override
    pub fn load() -> Result<Self, ConfigError> {
        ConfigLoader::new().load()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_PAGE_SIZE).contains(&self.listing.page_size) {
            return Err(ConfigError::ValidationError(format!(
                "listing.page_size must be between 1 and {}, got {}",
                MAX_PAGE_SIZE, self.listing.page_size
            )));
        }
        if self.aws.region.trim().is_empty() {
            return Err(ConfigError::ValidationError("aws.region must not be empty".to_string()));
        }
        Ok(())
    }

    /// Generate an example TOML configuration
    pub fn example_toml() -> String {
        r#"# Cloud Roles Configuration
# Environment variables override these settings

[aws]
region = "us-east-1"
endpoint_url = ""  # e.g. "http://localhost:4566" for LocalStack

[listing]
page_size = 1000
path_prefix = ""  # e.g. "/service-role/"
"#
        .to_string()
    }
}
