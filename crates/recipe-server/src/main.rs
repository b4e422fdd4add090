//! Recipe Catalog Server
//!
//! CRUD over locally owned recipes plus a search endpoint that merges local
//! title matches with TheMealDB results, caching the external leg.
//!
//! Uses SQLite (embedded) for recipes and DashMap or Redis for the cache.

mod config;
mod handlers;
mod services;
mod storage;
#[cfg(test)]
mod testing;

use anyhow::{Context, Result};
use axum::{
    routing::{delete, get},
    Router,
};
use recipe_core::ports::{CacheBackend, RecipeSource, RecipeStore};
use recipe_core::seed::seed_if_empty;
use recipe_core::{ResultCache, SearchService};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::config::{CacheKind, Config, StoreKind};
use services::MealDbClient;
use storage::{Database, MemoryCache, MemoryRecipeStore, RedisCache};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecipeStore>,
    pub search: Arc<SearchService>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn RecipeStore>,
        source: Arc<dyn RecipeSource>,
        cache: ResultCache,
    ) -> Self {
        let search = Arc::new(SearchService::new(store.clone(), source, cache));
        Self { store, search }
    }
}

#[tokio::main]
async fn main() {
    // Set up panic hook to log crashes
    std::panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()));
        let payload = if let Some(s) = info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        eprintln!("[PANIC] at {:?}: {}", location, payload);
        tracing::error!("PANIC at {:?}: {}", location, payload);
    }));

    // Initialize tracing, RUST_LOG overrides the default level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("[FATAL] Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    info!("Starting Recipe Catalog Server v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run_server().await {
        error!("Server failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run_server() -> Result<()> {
    info!("Loading configuration...");
    let config = Config::load().context("Failed to load configuration")?;
    info!(
        "Config loaded: bind={}, store={:?}, cache={:?}",
        config.bind_address, config.store, config.cache
    );

    let store: Arc<dyn RecipeStore> = match config.store {
        StoreKind::Sqlite => Arc::new(
            Database::new(&config.database_path)
                .await
                .context("Failed to initialize database")?,
        ),
        StoreKind::Memory => {
            info!("Using in-memory recipe store");
            Arc::new(MemoryRecipeStore::new())
        }
    };

    if config.seed {
        seed_if_empty(store.as_ref())
            .await
            .context("Failed to seed recipe store")?;
    }

    let backend: Arc<dyn CacheBackend> = match config.cache {
        CacheKind::Redis => {
            info!("Using Redis cache at {}", config.redis_url);
            Arc::new(
                RedisCache::new(&config.redis_url, config.redis_timeout())
                    .context("Failed to configure Redis cache")?,
            )
        }
        CacheKind::Memory => {
            info!("Using in-memory cache");
            Arc::new(MemoryCache::new())
        }
    };
    let cache = ResultCache::new(backend).with_ttl(config.cache_ttl());

    let source = Arc::new(
        MealDbClient::new(&config.mealdb_base_url, config.mealdb_timeout())
            .context("Failed to initialize TheMealDB client")?,
    );

    let state = AppState::new(store, source, cache);
    let app = build_router(state);

    let addr: SocketAddr = config
        .bind_address
        .parse()
        .context("Failed to parse bind address")?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/ping", get(handlers::ping))
        .route("/health", get(handlers::health))
        .merge(recipe_routes())
        .merge(cache_routes())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn recipe_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/recipes",
            get(handlers::recipes::list).post(handlers::recipes::create),
        )
        .route("/recipes/search", get(handlers::recipes::search))
        .route(
            "/recipes/:id",
            get(handlers::recipes::get)
                .put(handlers::recipes::update)
                .delete(handlers::recipes::delete),
        )
}

fn cache_routes() -> Router<AppState> {
    Router::new()
        .route("/cache/stats", get(handlers::cache::stats))
        .route("/cache/clear", delete(handlers::cache::clear))
}
