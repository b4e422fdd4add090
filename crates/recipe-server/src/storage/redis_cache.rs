//! Redis cache backend

use async_trait::async_trait;
use recipe_core::ports::{CacheBackend, CacheStats};
use recipe_core::CacheError;
use redis::aio::ConnectionManager;
use std::future::Future;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::info;

/// Redis-backed cache. The connection is opened on first use and re-attempted
/// on later calls if that fails, so a Redis outage at startup only degrades
/// caching.
///
/// Connecting and every command are bounded by `timeout`; a server that
/// accepts but never answers reads as unavailable.
pub struct RedisCache {
    client: redis::Client,
    conn: OnceCell<ConnectionManager>,
    timeout: Duration,
}

impl RedisCache {
    /// Parse the connection string. Does not connect.
    pub fn new(url: &str, timeout: Duration) -> Result<Self, CacheError> {
        let client = redis::Client::open(url)
            .map_err(|e| CacheError::Unavailable(format!("Invalid Redis URL {}: {}", url, e)))?;

        Ok(Self {
            client,
            conn: OnceCell::new(),
            timeout,
        })
    }

    async fn bounded<T, F>(&self, op: &str, fut: F) -> Result<T, CacheError>
    where
        F: Future<Output = Result<T, CacheError>>,
    {
        tokio::time::timeout(self.timeout, fut)
            .await
            .map_err(|_| {
                CacheError::Unavailable(format!("Redis {} timed out after {:?}", op, self.timeout))
            })?
    }

    async fn connection(&self) -> Result<ConnectionManager, CacheError> {
        let conn = self
            .conn
            .get_or_try_init(|| {
                self.bounded("connect", async {
                    info!("Connecting to Redis");
                    ConnectionManager::new(self.client.clone())
                        .await
                        .map_err(|e| CacheError::Unavailable(e.to_string()))
                })
            })
            .await?;

        Ok(conn.clone())
    }
}

fn backend_error(e: redis::RedisError) -> CacheError {
    CacheError::Backend(e.to_string())
}

#[async_trait]
impl CacheBackend for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.connection().await?;
        self.bounded("GET", async {
            redis::cmd("GET")
                .arg(key)
                .query_async::<_, Option<String>>(&mut conn)
                .await
                .map_err(backend_error)
        })
        .await
    }

    async fn set_with_ttl(
        &self,
        key: &str,
        value: String,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let mut conn = self.connection().await?;
        self.bounded("SET", async {
            redis::cmd("SET")
                .arg(key)
                .arg(value)
                .arg("EX")
                .arg(ttl.as_secs().max(1))
                .query_async::<_, ()>(&mut conn)
                .await
                .map_err(backend_error)
        })
        .await
    }

    async fn flush(&self) -> Result<(), CacheError> {
        let mut conn = self.connection().await?;
        self.bounded("FLUSHDB", async {
            redis::cmd("FLUSHDB")
                .query_async::<_, ()>(&mut conn)
                .await
                .map_err(backend_error)
        })
        .await
    }

    async fn stats(&self) -> Result<CacheStats, CacheError> {
        let mut conn = self.connection().await?;
        let info: redis::InfoDict = self
            .bounded("INFO", async {
                redis::cmd("INFO")
                    .query_async(&mut conn)
                    .await
                    .map_err(backend_error)
            })
            .await?;

        Ok(CacheStats {
            connected_clients: info.get("connected_clients").unwrap_or(0),
            used_memory_human: info
                .get("used_memory_human")
                .unwrap_or_else(|| "0B".to_string()),
            keyspace_hits: info.get("keyspace_hits").unwrap_or(0),
            keyspace_misses: info.get("keyspace_misses").unwrap_or(0),
        })
    }
}
