//! Search result cache policy
//!
//! Wraps a [`CacheBackend`] with the key scheme, JSON encoding and expiry used
//! for external search results.

use crate::ports::{CacheBackend, CacheStats};
use crate::CacheError;
use recipe_types::Recipe;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Lifetime of a cached search, measured from write time
pub const SEARCH_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

const KEY_PREFIX: &str = "mealdb_search";

/// Cache key for a query. Case and surrounding whitespace are ignored.
pub fn cache_key(query: &str) -> String {
    format!("{}:{}", KEY_PREFIX, query.trim().to_lowercase())
}

#[derive(Clone)]
pub struct ResultCache {
    backend: Arc<dyn CacheBackend>,
    ttl: Duration,
}

impl ResultCache {
    pub fn new(backend: Arc<dyn CacheBackend>) -> Self {
        Self {
            backend,
            ttl: SEARCH_CACHE_TTL,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    #[cfg(test)]
    pub(crate) fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached results for `query`, `None` if absent or expired
    pub async fn get(&self, query: &str) -> Result<Option<Vec<Recipe>>, CacheError> {
        let key = cache_key(query);
        match self.backend.get(&key).await? {
            Some(data) => {
                let recipes = serde_json::from_str(&data)?;
                Ok(Some(recipes))
            }
            None => Ok(None),
        }
    }

    pub async fn put(&self, query: &str, results: &[Recipe]) -> Result<(), CacheError> {
        let key = cache_key(query);
        let data = serde_json::to_string(results)?;
        debug!("Caching {} results under {}", results.len(), key);
        self.backend.set_with_ttl(&key, data, self.ttl).await
    }

    /// Wipe the entire backing store.
    pub async fn clear(&self) -> Result<(), CacheError> {
        self.backend.flush().await
    }

    /// Backend counters, `None` when the backend cannot be reached
    pub async fn stats(&self) -> Option<CacheStats> {
        match self.backend.stats().await {
            Ok(stats) => Some(stats),
            Err(e) => {
                warn!("Cache stats unavailable: {}", e);
                None
            }
        }
    }
}
