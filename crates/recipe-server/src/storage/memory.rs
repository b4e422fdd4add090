//! In-memory cache backend using DashMap (stands in for Redis)

use async_trait::async_trait;
use dashmap::DashMap;
use recipe_core::ports::{CacheBackend, CacheStats};
use recipe_core::CacheError;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Simple in-memory cache with TTL support
pub struct MemoryCache {
    data: Arc<DashMap<String, CacheEntry>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

struct CacheEntry {
    value: String,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

impl MemoryCache {
    pub fn new() -> Self {
        let cache = Self {
            data: Arc::new(DashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        };

        // Start cleanup task
        cache.start_cleanup_task();

        cache
    }

    fn lookup(&self, key: &str) -> Option<String> {
        let now = Instant::now();
        let entry = self.data.get(key)?;
        if entry.is_expired(now) {
            drop(entry);
            self.evict_if_expired(key, now);
            return None;
        }
        Some(entry.value.clone())
    }

    /// Re-checks under the shard lock, a writer may have replaced the entry
    fn evict_if_expired(&self, key: &str, now: Instant) {
        self.data.remove_if(key, |_, entry| entry.is_expired(now));
    }

    fn insert(&self, key: &str, value: String, ttl: Duration) {
        self.data.insert(
            key.to_string(),
            CacheEntry {
                value,
                expires_at: Instant::now() + ttl,
            },
        );
    }

    fn used_bytes(&self) -> usize {
        self.data
            .iter()
            .map(|entry| entry.key().len() + entry.value.len())
            .sum()
    }

    fn start_cleanup_task(&self) {
        let data = self.data.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(60));
            loop {
                interval.tick().await;

                let now = Instant::now();
                data.retain(|_, entry| !entry.is_expired(now));
            }
        });
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheBackend for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let value = self.lookup(key);
        let counter = if value.is_some() {
            &self.hits
        } else {
            &self.misses
        };
        counter.fetch_add(1, Ordering::Relaxed);
        Ok(value)
    }

    async fn set_with_ttl(
        &self,
        key: &str,
        value: String,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        self.insert(key, value, ttl);
        Ok(())
    }

    async fn flush(&self) -> Result<(), CacheError> {
        self.data.clear();
        Ok(())
    }

    async fn stats(&self) -> Result<CacheStats, CacheError> {
        Ok(CacheStats {
            // the service itself is the only client
            connected_clients: 1,
            used_memory_human: human_bytes(self.used_bytes()),
            keyspace_hits: self.hits.load(Ordering::Relaxed),
            keyspace_misses: self.misses.load(Ordering::Relaxed),
        })
    }
}

/// Format a byte count the way Redis reports `used_memory_human`
fn human_bytes(bytes: usize) -> String {
    const UNITS: [&str; 3] = ["K", "M", "G"];

    if bytes < 1024 {
        return format!("{}B", bytes);
    }
    let mut value = bytes as f64;
    let mut unit = UNITS[0];
    for u in UNITS {
        value /= 1024.0;
        unit = u;
        if value < 1024.0 {
            break;
        }
    }
    format!("{:.2}{}", value, unit)
}
