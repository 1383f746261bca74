//! Configuration loader with file and environment variable support

use crate::{AppConfig, ConfigError};
use std::env;
use std::path::PathBuf;
use tracing::info;

/// Standard config file search paths
const CONFIG_PATHS: &[&str] = &[
    "cloud-roles.toml",
    "config.toml",
    "./config/cloud-roles.toml",
    "/etc/cloud-roles/config.toml",
];

/// Env var naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "CLOUD_ROLES_CONFIG";

/// Configuration loader
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self { config_path: None }
    }

    /// Create a loader with a specific config file path
    pub fn with_path<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            config_path: Some(path.into()),
        }
    }

    /// Load configuration from file (if found) with environment variable overrides
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        let mut config = AppConfig::default();

        if let Some(path) = self.find_config_file()? {
            info!(?path, "Loading configuration from file");
            config = AppConfig::from_file(&path)?;
        }

        apply_overrides(&mut config, |key| env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Find the configuration file to use.
    ///
    /// An explicitly requested file that does not exist is an error; the
    /// standard search paths are optional.
    fn find_config_file(&self) -> Result<Option<PathBuf>, ConfigError> {
        if let Some(path) = &self.config_path {
            if path.exists() {
                return Ok(Some(path.clone()));
            }
            return Err(ConfigError::ValidationError(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        if let Ok(path) = env::var(CONFIG_PATH_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Ok(Some(path));
            }
        }

        Ok(CONFIG_PATHS
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists()))
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply `CLOUD_ROLES_*` overrides read through `lookup`.
pub(crate) fn apply_overrides<F>(config: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    // AWS
    if let Some(val) = lookup("CLOUD_ROLES_AWS_REGION") {
        config.aws.region = val;
    }
    if let Some(val) = lookup("CLOUD_ROLES_AWS_ENDPOINT_URL") {
        config.aws.endpoint_url = val;
    }

    // Listing
    if let Some(val) = lookup("CLOUD_ROLES_PAGE_SIZE") {
        if let Ok(size) = val.parse() {
            config.listing.page_size = size;
        }
    }
    if let Some(val) = lookup("CLOUD_ROLES_PATH_PREFIX") {
        config.listing.path_prefix = val;
    }
}
