//! Asset configuration (assets.toml)
//!
//! ```toml
//! dev_dir = "rsc"
//! temp_prefix = "nobrain_"
//! payload = true
//! ```
//!
//! Every field is optional.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default file name of the asset configuration.
pub const CONFIG_FILE: &str = "assets.toml";

/// Errors that can occur while loading the asset configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("Failed to read asset config: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse asset config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Validation error
    #[error("Invalid asset config: {0}")]
    ValidationError(String),
}

/// Where assets come from and where embedded ones are extracted to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct AssetsConfig {
    /// Folder holding loose asset files when no payload is attached
    pub dev_dir: PathBuf,

    /// Name prefix of the temporary folder embedded assets are extracted to
    pub temp_prefix: String,

    /// Look for a payload appended to the executable
    pub payload: bool,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            dev_dir: PathBuf::from("rsc"),
            temp_prefix: "nobrain_".to_string(),
            payload: true,
        }
    }
}

impl AssetsConfig {
    /// Parse a configuration file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parse `assets.toml` in `dir`, or fall back to the defaults when the
    /// file does not exist.
    pub fn load_or_default(dir: &Path) -> Result<Self, ConfigError> {
        let path = dir.join(CONFIG_FILE);
        if path.is_file() {
            Self::from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse a configuration from a string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: AssetsConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dev_dir.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "dev_dir cannot be empty".to_string(),
            ));
        }

        if self.temp_prefix.contains(['/', '\\']) {
            return Err(ConfigError::ValidationError(format!(
                "temp_prefix must not contain path separators: {}",
                self.temp_prefix
            )));
        }

        Ok(())
    }

    /// Write the configuration to a file
    pub fn to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::ValidationError(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
