//! Configuration management for GamesInfo
//!
//! Settings live in a TOML file in the user's config directory. Any value can
//! be overridden with `GAMESINFO__<SECTION>__<KEY>` environment variables, and
//! `RAWG_API_KEY` fills in the catalog key when the file leaves it empty.

pub mod paths;
mod settings;

pub use settings::{CatalogSettings, StorageBackend, StorageConfig};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Prefix of override environment variables
pub const ENV_PREFIX: &str = "GAMESINFO";

/// Environment variable read for the catalog API key
pub const API_KEY_ENV: &str = "RAWG_API_KEY";

/// Largest page the catalog serves
pub const MAX_PAGE_SIZE: u32 = 40;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Environment override error: {0}")]
    Override(#[from] config::ConfigError),
}

/// Main GamesInfo configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GamesInfoConfig {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub catalog: CatalogSettings,
}

impl GamesInfoConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from the default location
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = paths::config_file();
        if path.exists() {
            return Self::load(&path);
        }

        tracing::debug!("No configuration file at {}, using defaults", path.display());
        Ok(Self::default())
    }

    /// Load from `path` or the default location, apply environment overrides
    /// and validate
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::load(path)?,
            None => Self::load_default()?,
        };

        let config = config.with_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from the process environment
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        let env = config::Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true);

        let mut config = self.apply_overrides(env)?;
        config.fill_api_key(std::env::var(API_KEY_ENV).ok());
        Ok(config)
    }

    /// Layer an environment source over this configuration
    pub fn apply_overrides(self, env: config::Environment) -> Result<Self, ConfigError> {
        let layered = config::Config::builder()
            .add_source(config::Config::try_from(&self)?)
            .add_source(env)
            .build()?;

        Ok(layered.try_deserialize()?)
    }

    /// Use `key` when no catalog API key is configured
    pub fn fill_api_key(&mut self, key: Option<String>) {
        if self.catalog.api_key.is_empty()
            && let Some(key) = key.filter(|k| !k.trim().is_empty())
        {
            self.catalog.api_key = key.trim().to_string();
        }
    }

    /// Check values are usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.namespace_key.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "storage.namespace_key must not be empty".to_string(),
            ));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&self.catalog.page_size) {
            return Err(ConfigError::Invalid(format!(
                "catalog.page_size must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }
        if !self.catalog.base_url.starts_with("http://")
            && !self.catalog.base_url.starts_with("https://")
        {
            return Err(ConfigError::Invalid(format!(
                "catalog.base_url is not an HTTP URL: {}",
                self.catalog.base_url
            )));
        }
        Ok(())
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, contents)?;
        tracing::info!("Configuration saved to {}", path.display());
        Ok(())
    }
}
