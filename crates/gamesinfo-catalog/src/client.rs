//! HTTP client for the games catalog

use crate::cache::{CacheKey, ResponseCache};
use crate::models::{ScreenshotsPage, TrailersPage};
use crate::{
    CatalogConfig, CatalogError, GameDetails, GameFilters, GamesPage, Screenshot, Trailer,
};
use gamesinfo_collection::GameId;
use serde::de::DeserializeOwned;

/// Catalog API client with response caching and retry
pub struct CatalogClient {
    config: CatalogConfig,
    client: reqwest::Client,
    cache: ResponseCache,
}

impl CatalogClient {
    /// Create a new catalog client
    pub fn new(config: CatalogConfig) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(format!("GamesInfo/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        if config.api_key.is_empty() {
            tracing::warn!("No catalog API key configured, requests may be rejected");
        }

        Ok(Self {
            cache: ResponseCache::new(config.cache_ttl, config.cache_capacity),
            config,
            client,
        })
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// List games matching the filters
    pub async fn games(&self, filters: &GameFilters) -> Result<GamesPage, CatalogError> {
        let query = filters.to_query(self.config.page_size);
        self.get_json("/games", query).await
    }

    /// Free-text search
    pub async fn search(&self, query: &str, page: u32) -> Result<GamesPage, CatalogError> {
        self.games(&GameFilters::new().search(query).page(page)).await
    }

    /// Extended record for one game
    pub async fn game_details(&self, id: GameId) -> Result<GameDetails, CatalogError> {
        self.get_json(&format!("/games/{}", id), Vec::new()).await
    }

    /// Screenshot references for one game
    pub async fn game_screenshots(&self, id: GameId) -> Result<Vec<Screenshot>, CatalogError> {
        let page: ScreenshotsPage = self
            .get_json(&format!("/games/{}/screenshots", id), Vec::new())
            .await?;
        Ok(page.results)
    }

    /// Trailer references for one game
    pub async fn game_trailers(&self, id: GameId) -> Result<Vec<Trailer>, CatalogError> {
        let page: TrailersPage = self
            .get_json(&format!("/games/{}/movies", id), Vec::new())
            .await?;
        Ok(page.results)
    }

    /// Drop all cached responses
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Vec<(String, String)>,
    ) -> Result<T, CatalogError> {
        let key = CacheKey::new(path, &query);

        if let Some(body) = self.cache.get(&key) {
            tracing::debug!("Catalog cache hit for {}", path);
            return decode(&body);
        }

        let body = self.fetch(path, &query).await?;
        let value = decode(&body)?;
        self.cache.insert(key, body);

        Ok(value)
    }

    async fn fetch(&self, path: &str, query: &[(String, String)]) -> Result<String, CatalogError> {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), path);
        let mut attempt = 0;

        loop {
            attempt += 1;
            tracing::debug!("GET {} (attempt {})", url, attempt);

            let mut request = self.client.get(&url).query(query);
            if !self.config.api_key.is_empty() {
                request = request.query(&[("key", self.config.api_key.as_str())]);
            }

            let retries_left = attempt <= self.config.max_retries;

            match request.send().await {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        return Ok(response.text().await?);
                    }

                    if status == reqwest::StatusCode::NOT_FOUND {
                        return Err(CatalogError::NotFound(path.to_string()));
                    }

                    if status.is_server_error() && retries_left {
                        tracing::warn!("Catalog returned {} for {}, retrying", status, path);
                        self.backoff(attempt).await;
                        continue;
                    }

                    let message = response.text().await.unwrap_or_default();
                    return Err(CatalogError::Api {
                        status: status.as_u16(),
                        message,
                    });
                }
                Err(e) if retries_left && (e.is_timeout() || e.is_connect()) => {
                    tracing::warn!("Catalog request failed: {}, retrying", e);
                    self.backoff(attempt).await;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    async fn backoff(&self, attempt: u32) {
        tokio::time::sleep(self.config.retry_backoff * attempt).await;
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, CatalogError> {
    serde_json::from_str(body).map_err(|e| CatalogError::Decode(e.to_string()))
}
