//! Key-value cache backend

use crate::CacheError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Counters reported by the cache backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheStats {
    pub connected_clients: u64,
    pub used_memory_human: String,
    pub keyspace_hits: u64,
    pub keyspace_misses: u64,
}

/// Text key-value store with per-entry expiration
#[async_trait]
pub trait CacheBackend: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;
    async fn set_with_ttl(&self, key: &str, value: String, ttl: Duration)
        -> Result<(), CacheError>;
    /// Drop every entry in the backing store, not only ours.
    async fn flush(&self) -> Result<(), CacheError>;
    async fn stats(&self) -> Result<CacheStats, CacheError>;
}
