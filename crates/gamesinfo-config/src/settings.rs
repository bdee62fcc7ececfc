//! Configuration sections

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where the collection snapshot is kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// One JSON file per slot
    #[default]
    File,
    /// SQLite database
    Sqlite,
    /// Nothing is written; state is lost on exit
    Memory,
}

/// Collection storage settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Data directory; platform default when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// Storage slot holding the collection
    #[serde(default = "default_namespace_key")]
    pub namespace_key: String,
}

fn default_namespace_key() -> String {
    "gamesinfo-storage".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            data_dir: None,
            namespace_key: default_namespace_key(),
        }
    }
}

impl StorageConfig {
    /// Configured data directory, or the platform default
    pub fn resolved_data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(crate::paths::data_dir)
    }

    /// SQLite database file for the sqlite backend
    pub fn database_path(&self) -> PathBuf {
        self.resolved_data_dir().join("collection.db")
    }
}

/// Catalog API settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_page_size")]
    pub page_size: u32,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Zero disables response caching
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

fn default_base_url() -> String {
    "https://api.rawg.io/api".to_string()
}

fn default_page_size() -> u32 {
    12
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_max_retries() -> u32 {
    2
}

fn default_cache_ttl_secs() -> u64 {
    300
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            page_size: default_page_size(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            cache_ttl_secs: default_cache_ttl_secs(),
        }
    }
}
