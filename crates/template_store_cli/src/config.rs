//! Configuration management for the template store CLI.
//!
//! The configuration is stored in TOML format and is loaded from a path given
//! on the command line or from `template-store.toml` in the current directory.
//! When no file was requested explicitly and the default file does not exist,
//! built-in defaults are used.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use template_store::StoreConfig;
use tracing::{debug, info};

use crate::errors::Error;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "template-store.toml";

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// Main configuration structure for the template store CLI.
///
/// # Example TOML Configuration
///
/// ```toml
/// [store]
/// endpoint = "http://127.0.0.1:2379"
/// key_prefix = "/plugin_templates"
/// list_limit = 1000
/// request_timeout_secs = 5
/// ```
#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Connection and key-space settings of the template store.
    #[serde(default)]
    pub store: StoreConfig,
}

impl AppConfig {
    /// Loads configuration from a TOML file at the specified path.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the file does not exist, cannot be read or
    /// does not contain a valid configuration.
    pub fn load(path: &Path) -> Result<Self, Error> {
        debug!("Loading configuration from {:?}", path);

        if !path.exists() {
            return Err(Error::Config(format!(
                "Configuration file not found: {:?}",
                path
            )));
        }

        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read configuration file: {}", e)))?;

        let config: AppConfig = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse configuration file: {}", e)))?;

        Ok(config)
    }

    /// Loads the configuration for a command invocation.
    ///
    /// An explicitly requested file must exist. Without one, the default file
    /// is used if present and built-in defaults otherwise.
    pub fn resolve(config_path: Option<&str>) -> Result<Self, Error> {
        let path = get_config_path(config_path);
        if config_path.is_none() && !path.exists() {
            debug!("No configuration file found, using defaults");
            return Ok(Self::default());
        }
        Self::load(&path)
    }

    /// Saves the configuration to a TOML file, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), Error> {
        debug!("Saving configuration to {:?}", path);

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize configuration: {}", e)))?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("Failed to create directory: {}", e)))?;
        }

        fs::write(path, content)
            .map_err(|e| Error::Config(format!("Failed to write configuration file: {}", e)))?;

        info!("Configuration saved to {:?}", path);
        Ok(())
    }

    /// Returns the store configuration with command-line overrides applied.
    pub fn store_config(&self, endpoint_override: Option<&str>) -> StoreConfig {
        match endpoint_override {
            Some(endpoint) => StoreConfig {
                endpoint: endpoint.to_string(),
                ..self.store.clone()
            },
            None => self.store.clone(),
        }
    }
}

/// Resolves the path to the configuration file.
///
/// Uses `config_path` when given and `./template-store.toml` otherwise.
pub fn get_config_path(config_path: Option<&str>) -> PathBuf {
    if let Some(path) = config_path {
        PathBuf::from(path)
    } else {
        let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        current_dir.join(DEFAULT_CONFIG_FILENAME)
    }
}
