//! Games catalog client for GamesInfo
//!
//! Reads paginated game listings and per-game details from the RAWG games
//! database. Responses are cached in memory for a configurable time and
//! transient failures (timeouts, connection errors, 5xx) are retried.
//!
//! # Example
//!
//! ```no_run
//! use gamesinfo_catalog::{CatalogClient, CatalogConfig, GameFilters, SortField, SortOrder};
//!
//! # async fn run() -> Result<(), gamesinfo_catalog::CatalogError> {
//! let client = CatalogClient::new(CatalogConfig::with_api_key("my-key"))?;
//! let page = client
//!     .games(&GameFilters::new().search("zelda").ordering(SortOrder::descending(SortField::Rating)))
//!     .await?;
//! for game in &page.results {
//!     println!("{} ({})", game.name, game.rating);
//! }
//! # Ok(())
//! # }
//! ```

mod cache;
mod client;
mod filters;
mod models;

pub use cache::{CacheKey, ResponseCache};
pub use client::CatalogClient;
pub use filters::{GameFilters, SortField, SortOrder};
pub use models::{GameDetails, GamesPage, Screenshot, Tag, Trailer, TrailerVideos};

use std::time::Duration;
use thiserror::Error;

/// Public RAWG API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.rawg.io/api";

/// Results per listing page unless a filter asks otherwise
pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// Responses held in memory at most
pub const DEFAULT_CACHE_CAPACITY: usize = 128;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Game not found: {0}")]
    NotFound(String),

    #[error("Catalog API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    #[error("Failed to decode catalog response: {0}")]
    Decode(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Catalog client configuration
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// API base URL
    pub base_url: String,

    /// API key sent with every request
    pub api_key: String,

    /// Default results per page
    pub page_size: u32,

    /// Per-request timeout
    pub timeout: Duration,

    /// Retries after the first attempt
    pub max_retries: u32,

    /// Delay before the first retry, grows linearly
    pub retry_backoff: Duration,

    /// How long responses stay fresh; zero disables caching
    pub cache_ttl: Duration,

    /// Most responses kept; least recently used go first
    pub cache_capacity: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            page_size: DEFAULT_PAGE_SIZE,
            timeout: Duration::from_secs(15),
            max_retries: 2,
            retry_backoff: Duration::from_millis(500),
            cache_ttl: Duration::from_secs(300),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl CatalogConfig {
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CatalogConfig::default();
        assert_eq!(config.base_url, "https://api.rawg.io/api");
        assert_eq!(config.page_size, 12);
        assert!(config.api_key.is_empty());
    }

    #[test]
    fn test_error_display() {
        let err = CatalogError::Api {
            status: 401,
            message: "Invalid key".to_string(),
        };
        assert_eq!(format!("{}", err), "Catalog API error (401): Invalid key");
    }
}
