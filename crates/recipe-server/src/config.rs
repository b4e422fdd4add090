//! Server configuration
//!
//! Layered: built-in defaults, then an optional `recipe-server.toml` (path
//! overridable with `RECIPE_CONFIG`), then `RECIPE_*` environment variables.

use anyhow::{Context, Result};
use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File};
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_CONFIG_FILE: &str = "recipe-server";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    Memory,
    Sqlite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheKind {
    Memory,
    Redis,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub bind_address: String,
    pub store: StoreKind,
    pub database_path: String,
    pub cache: CacheKind,
    pub redis_url: String,
    /// Bound on connecting to Redis and on each command
    pub redis_timeout_ms: u64,
    pub mealdb_base_url: String,
    pub mealdb_timeout_secs: u64,
    pub cache_ttl_secs: u64,
    /// Insert starter recipes into an empty store
    pub seed: bool,
}

impl Config {
    pub fn load() -> Result<Self> {
        let file = std::env::var("RECIPE_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

        let builder = Self::defaults()?
            .add_source(File::with_name(&file).required(false))
            .add_source(Environment::with_prefix("RECIPE").try_parsing(true));

        Self::build(builder)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>> {
        let builder = config::Config::builder()
            .set_default("bind_address", "0.0.0.0:8000")?
            .set_default("store", "sqlite")?
            .set_default("database_path", "recipes.db")?
            .set_default("cache", "memory")?
            .set_default("redis_url", "redis://localhost:6379")?
            .set_default("redis_timeout_ms", 1000)?
            .set_default("mealdb_base_url", crate::services::mealdb::DEFAULT_BASE_URL)?
            .set_default("mealdb_timeout_secs", 10)?
            .set_default("cache_ttl_secs", 24 * 60 * 60)?
            .set_default("seed", true)?;
        Ok(builder)
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        builder
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")
    }

    pub fn mealdb_timeout(&self) -> Duration {
        Duration::from_secs(self.mealdb_timeout_secs)
    }

    pub fn redis_timeout(&self) -> Duration {
        Duration::from_millis(self.redis_timeout_ms)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}
